#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` turns a numeric verbosity and optional per-target overrides into
//! a `tracing` filter directive, and installs a formatting subscriber for it.
//! The `file_buffer` and `compress` crates emit their events on the
//! `filebuf::io`, `filebuf::map` and `filebuf::codec` targets; this crate
//! decides which of them reach the terminal.
//!
//! # Design
//!
//! [`LogConfig`] is plain data: a verbosity in `0..=4` mapped to a
//! [`LogLevel`] plus a list of `(target, level)` overrides. It renders to an
//! `EnvFilter` directive string via [`LogConfig::directive`]. When the
//! `tracing` feature is enabled, [`init_tracing`] parses that directive
//! (or the [`ENV_VAR`] override) and installs a global subscriber writing to
//! standard error.
//!
//! # Invariants
//!
//! - Verbosity values above `4` saturate at [`LogLevel::Trace`].
//! - Later overrides for the same target replace earlier ones.
//! - A non-empty [`ENV_VAR`] always wins over the configured directive.
//!
//! # Errors
//!
//! [`LoggingError`] reports invalid directives and a second global
//! installation.
//!
//! # Examples
//!
//! ```
//! use logging::{LogConfig, LogLevel};
//!
//! let config = LogConfig::from_verbosity(1).with_target("filebuf::codec", LogLevel::Trace);
//! assert_eq!(config.directive(), "warn,filebuf::codec=trace");
//! ```

mod config;
mod error;
mod level;
#[cfg(feature = "tracing")]
mod subscriber;

pub use config::{ENV_VAR, LogConfig};
pub use error::LoggingError;
pub use level::LogLevel;
#[cfg(feature = "tracing")]
pub use subscriber::{build_filter, init_tracing, resolve_directive};
