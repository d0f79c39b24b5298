//! Workspace-level error type.

use compress::CodecError;
use file_buffer::FileBufferError;
use thiserror::Error;

/// Result alias for operations mixing storage and codec work.
pub type Result<T> = std::result::Result<T, Error>;

/// Either a storage or a codec failure.
#[derive(Debug, Error)]
pub enum Error {
    /// A file handle, mapping or buffer operation failed.
    #[error(transparent)]
    FileBuffer(#[from] FileBufferError),
    /// A compression or decompression step failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Coarse classification shared by both error families.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The operating system reported a failure.
    Io,
    /// The buffer or handle was already closed.
    HandleClosed,
    /// An allocation could not be satisfied.
    OutOfMemory,
    /// A caller-supplied value was rejected.
    InvalidArgument,
    /// The codec backend failed or the stream was corrupt.
    Internal,
}

impl Error {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileBuffer(error) => match error {
                FileBufferError::Io { .. } => ErrorKind::Io,
                FileBufferError::HandleClosed => ErrorKind::HandleClosed,
                FileBufferError::OutOfMemory => ErrorKind::OutOfMemory,
                FileBufferError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            },
            Self::Codec(error) => match error {
                CodecError::OutOfMemory => ErrorKind::OutOfMemory,
                CodecError::InvalidArgument(_) => ErrorKind::InvalidArgument,
                CodecError::Internal(_) => ErrorKind::Internal,
            },
        }
    }

    /// Native error code, when the operating system supplied one.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::FileBuffer(error) => error.code(),
            Self::Codec(_) => None,
        }
    }
}
