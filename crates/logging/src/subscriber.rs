//! crates/logging/src/subscriber.rs
//! Global subscriber installation driven by [`LogConfig`].

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{ENV_VAR, LogConfig};
use crate::error::LoggingError;

/// Picks the directive to use: a non-empty `env_override` wins over `config`.
#[must_use]
pub fn resolve_directive(config: &LogConfig, env_override: Option<&str>) -> String {
    match env_override.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_owned(),
        _ => config.directive(),
    }
}

/// Parses `directive` into a filter.
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|error| LoggingError::InvalidDirective {
        directive: directive.to_owned(),
        reason: error.to_string(),
    })
}

/// Installs a formatting subscriber on standard error for `config`.
///
/// The [`ENV_VAR`] environment variable, when set and non-empty, replaces the
/// configured directive.
///
/// # Example
///
/// ```no_run
/// use logging::{LogConfig, init_tracing};
///
/// init_tracing(&LogConfig::from_verbosity(3))?;
/// tracing::debug!(target: "filebuf::io", "ready");
/// # Ok::<(), logging::LoggingError>(())
/// ```
pub fn init_tracing(config: &LogConfig) -> Result<(), LoggingError> {
    let env_override = std::env::var(ENV_VAR).ok();
    let directive = resolve_directive(config, env_override.as_deref());
    let filter = build_filter(&directive)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish()
        .try_init()
        .map_err(|error| LoggingError::AlreadyInitialized(error.to_string()))
}
