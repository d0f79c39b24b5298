//! crates/file_buffer/src/error.rs
//!
//! Error taxonomy shared by positional handles, mappings and file buffers.

use std::io;

use thiserror::Error;

use crate::sys;

/// Result type for file buffer operations.
pub type FileBufferResult<T> = Result<T, FileBufferError>;

/// Errors surfaced by every file buffer operation.
///
/// Platform error codes never escape as raw integers to be matched by callers;
/// they are translated once by [`translate_io_error`] into one of these kinds.
#[derive(Debug, Error)]
pub enum FileBufferError {
    /// Platform I/O failure carrying the native error code when one exists.
    #[error("{}", describe_io(.code, .message))]
    Io {
        /// Native error identifier (`errno` on Unix, `GetLastError` on Windows).
        code: Option<i32>,
        /// Portable classification, kept so conversion back to [`io::Error`] is lossless.
        kind: io::ErrorKind,
        /// Human readable description with trailing line breaks removed.
        message: String,
    },
    /// The handle was closed or the platform reported it as stale.
    #[error("FileBuffer closed")]
    HandleClosed,
    /// An allocation needed by the operation could not be satisfied.
    #[error("out of memory")]
    OutOfMemory,
    /// The caller supplied an argument the operation cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl FileBufferError {
    /// Builds an [`FileBufferError::Io`] from a native error code.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        translate_io_error(io::Error::from_raw_os_error(code))
    }

    /// Returns the native error code for I/O failures.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Io { code, .. } => *code,
            _ => None,
        }
    }

    /// Returns the portable [`io::ErrorKind`] this error converts to.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Io { kind, .. } => *kind,
            Self::HandleClosed => io::ErrorKind::Other,
            Self::OutOfMemory => io::ErrorKind::OutOfMemory,
            Self::InvalidArgument(_) => io::ErrorKind::InvalidInput,
        }
    }

    /// Returns `true` when the error reports a closed or stale handle.
    #[must_use]
    pub fn is_handle_closed(&self) -> bool {
        matches!(self, Self::HandleClosed)
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// An I/O failure without a native code, used for logical end-of-file conditions.
    pub(crate) fn unexpected_eof(message: impl Into<String>) -> Self {
        Self::Io {
            code: None,
            kind: io::ErrorKind::UnexpectedEof,
            message: message.into(),
        }
    }

    pub(crate) fn access_denied() -> Self {
        Self::from_code(sys::ACCESS_DENIED)
    }

    pub(crate) fn invalid_parameter() -> Self {
        Self::from_code(sys::INVALID_PARAMETER)
    }
}

fn describe_io(code: &Option<i32>, message: &str) -> String {
    match code {
        Some(code) => format!("{message} (os error {code})"),
        None => message.to_owned(),
    }
}

/// Translates a platform I/O error into the file buffer taxonomy.
///
/// Stale-handle codes map to [`FileBufferError::HandleClosed`] regardless of
/// the message the platform would attach; every other native code becomes
/// [`FileBufferError::Io`] with the platform description. Errors without a
/// native code keep their [`io::ErrorKind`].
#[must_use]
pub fn translate_io_error(error: io::Error) -> FileBufferError {
    match error.raw_os_error() {
        Some(code) if sys::is_stale_handle(code) => FileBufferError::HandleClosed,
        Some(code) => FileBufferError::Io {
            code: Some(code),
            kind: error.kind(),
            message: native_description(&error, code),
        },
        None if error.kind() == io::ErrorKind::OutOfMemory => FileBufferError::OutOfMemory,
        None => FileBufferError::Io {
            code: None,
            kind: error.kind(),
            message: strip_line_breaks(&error.to_string()).to_owned(),
        },
    }
}

/// Platform description without the `(os error N)` suffix std appends.
fn native_description(error: &io::Error, code: i32) -> String {
    let rendered = error.to_string();
    let suffix = format!(" (os error {code})");
    let text = rendered.strip_suffix(&suffix).unwrap_or(&rendered);
    strip_line_breaks(text).to_owned()
}

/// Removes trailing `\r` and `\n` characters from system messages.
pub(crate) fn strip_line_breaks(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}

impl From<io::Error> for FileBufferError {
    fn from(error: io::Error) -> Self {
        translate_io_error(error)
    }
}

impl From<FileBufferError> for io::Error {
    fn from(error: FileBufferError) -> Self {
        match error {
            FileBufferError::Io {
                code: Some(code), ..
            } => Self::from_raw_os_error(code),
            FileBufferError::Io {
                code: None,
                kind,
                message,
            } => Self::new(kind, message),
            FileBufferError::HandleClosed => Self::other("FileBuffer closed"),
            FileBufferError::OutOfMemory => io::ErrorKind::OutOfMemory.into(),
            FileBufferError::InvalidArgument(message) => {
                Self::new(io::ErrorKind::InvalidInput, message)
            }
        }
    }
}
