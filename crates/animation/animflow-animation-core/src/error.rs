use animflow_api_core::PathError;
use thiserror::Error;

/// Errors raised while assembling or interpreting scene animations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("track '{track}' has non-object properties")]
    InvalidProperties { track: String },

    #[error(transparent)]
    InvalidPath(#[from] PathError),

    #[error("track '{track}' ({kind}) is missing property '{property}'")]
    MissingProperty {
        track: String,
        kind: &'static str,
        property: &'static str,
    },

    #[error("track '{track}' property '{property}' must be {expected}")]
    InvalidPropertyType {
        track: String,
        property: &'static str,
        expected: &'static str,
    },
}
