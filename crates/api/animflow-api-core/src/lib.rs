//! animflow-api-core: payload model shared by the animation and graph crates.

pub mod kind;
pub mod object;
pub mod path;

pub use kind::PortKind;
pub use object::{Item, SceneObject};
pub use path::{deep_merge, PathError, PropertyPath};
