//! animflow animation core (engine-agnostic)
//!
//! Authored animation tracks, absolute-time scene animations, easing curves, and the
//! scene assembler that layers assignment and batch overrides onto authored values.
//! Renderers consume [`AssembledScene`] partitions and build typed transforms through a
//! [`TransformFactory`].

pub mod assembler;
pub mod easing;
pub mod error;
pub mod overrides;
pub mod scene;
pub mod track;
pub mod transform;

pub use assembler::{
    apply_batch_layer, convert_tracks_to_scene_animations, supersede_overlapping,
    BatchOverrideContext,
};
pub use easing::Easing;
pub use error::AssemblyError;
pub use overrides::{
    merge_batch_overrides, BatchOverrides, BoundFields, ObjectAssignments, TrackAssignment,
    DEFAULT_BATCH_KEY,
};
pub use scene::{partition_by_batch_key, AssembledScene, ScenePartition};
pub use track::{AnimationTrack, SceneAnimationTrack, TrackType};
pub use transform::{
    ColorProperty, DefaultTransformFactory, Point, SampledValue, SceneTransform, TimedTransform,
    TransformFactory,
};
