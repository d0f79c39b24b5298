//! crates/logging/src/level.rs
//! Severity thresholds and the verbosity mapping.

use std::fmt;
use std::str::FromStr;

use crate::error::LoggingError;

/// Minimum severity an event needs to be recorded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogLevel {
    /// Record nothing.
    Off,
    /// Failures only.
    #[default]
    Error,
    /// Failures and recoverable anomalies.
    Warn,
    /// Lifecycle events such as opens and closes.
    Info,
    /// Per-operation events.
    Debug,
    /// Everything, including per-transform counters.
    Trace,
}

impl LogLevel {
    /// Highest verbosity with a distinct level.
    pub const MAX_VERBOSITY: u8 = 4;

    /// Maps a verbosity count to a level.
    ///
    /// `0` is errors only, each step adds one level, and anything past
    /// [`Self::MAX_VERBOSITY`] saturates at [`LogLevel::Trace`].
    #[must_use]
    pub const fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => Self::Error,
            1 => Self::Warn,
            2 => Self::Info,
            3 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Directive spelling understood by `EnvFilter`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(LoggingError::InvalidLevel(other.to_owned())),
        }
    }
}

#[cfg(feature = "tracing")]
impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::OFF,
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
