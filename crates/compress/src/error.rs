//! Codec error taxonomy.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised by [`Deflater`](crate::Deflater) and [`Inflater`](crate::Inflater).
///
/// Buffer underflow is not an error: a transform that cannot make progress
/// reports [`Status::BufferUnderflow`](crate::Status::BufferUnderflow) instead.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An allocation needed by the codec could not be satisfied.
    #[error("out of memory")]
    OutOfMemory,
    /// A parameter, or the moment it was supplied, was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The underlying codec failed; carries its diagnostic text.
    #[error("codec failure: {0}")]
    Internal(String),
}

impl CodecError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn internal(error: impl ToString) -> Self {
        Self::Internal(error.to_string())
    }
}
