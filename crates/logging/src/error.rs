//! crates/logging/src/error.rs
//! Errors raised while configuring diagnostics.

use thiserror::Error;

/// Failure to configure or install logging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// A level name was not recognised.
    #[error("unknown log level '{0}'")]
    InvalidLevel(String),
    /// A filter directive could not be parsed.
    #[error("invalid log directive '{directive}': {reason}")]
    InvalidDirective {
        /// The directive as supplied.
        directive: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber was already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
