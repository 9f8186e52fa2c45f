use thiserror::Error;

/// Top-level error type returned by the codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The resolver has no contract for the given wire type name.
    #[error("unknown resource type: {0}")]
    UnknownWireType(String),

    /// The resolver has no contract for the given Rust type.
    #[error("unknown resource type: {0}")]
    UnknownRuntimeType(String),

    /// `data` was an array where a single resource was required, or vice versa,
    /// or a relationship saw the wrong shape for its kind.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A null/absent entity was passed to a singular-serialize entry point.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The scalar JSON codec (serde_json) failed to serialize or deserialize a leaf value.
    #[error("scalar codec error: {0}")]
    Scalar(#[from] serde_json::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;
