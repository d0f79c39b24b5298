//! crates/logging/src/config.rs
//! Verbosity configuration and directive rendering.

use crate::level::LogLevel;

/// Environment variable whose value replaces the configured directive.
pub const ENV_VAR: &str = "FILEBUF_LOG";

/// Default level plus per-target overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogConfig {
    /// Level applied to targets without an override.
    pub level: LogLevel,
    /// `(target, level)` pairs, most specific use first.
    pub targets: Vec<(String, LogLevel)>,
}

impl LogConfig {
    /// Creates a configuration from a verbosity count.
    ///
    /// See [`LogLevel::from_verbosity`] for the mapping.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        Self {
            level: LogLevel::from_verbosity(verbosity),
            targets: Vec::new(),
        }
    }

    /// Overrides the level for one target, replacing an earlier override.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>, level: LogLevel) -> Self {
        let target = target.into();
        match self.targets.iter_mut().find(|(name, _)| *name == target) {
            Some(entry) => entry.1 = level,
            None => self.targets.push((target, level)),
        }
        self
    }

    /// Level that applies to `target`.
    ///
    /// The longest override that is `target` itself or a `::`-separated
    /// prefix of it wins.
    #[must_use]
    pub fn level_for(&self, target: &str) -> LogLevel {
        self.targets
            .iter()
            .filter(|(name, _)| {
                target == name
                    || target
                        .strip_prefix(name.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
            .max_by_key(|(name, _)| name.len())
            .map_or(self.level, |(_, level)| *level)
    }

    /// Renders the configuration as an `EnvFilter` directive.
    #[must_use]
    pub fn directive(&self) -> String {
        let mut directive = self.level.as_str().to_owned();
        for (target, level) in &self.targets {
            directive.push(',');
            directive.push_str(target);
            directive.push('=');
            directive.push_str(level.as_str());
        }
        directive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_records_errors_only() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.directive(), "error");
    }

    #[test]
    fn overrides_render_in_insertion_order() {
        let config = LogConfig::from_verbosity(2)
            .with_target("filebuf::io", LogLevel::Debug)
            .with_target("filebuf::map", LogLevel::Off);
        assert_eq!(config.directive(), "info,filebuf::io=debug,filebuf::map=off");
    }

    #[test]
    fn repeated_override_replaces_previous() {
        let config = LogConfig::default()
            .with_target("filebuf::codec", LogLevel::Info)
            .with_target("filebuf::codec", LogLevel::Trace);
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.level_for("filebuf::codec"), LogLevel::Trace);
    }

    #[test]
    fn level_for_uses_longest_module_prefix() {
        let config = LogConfig::from_verbosity(0)
            .with_target("filebuf", LogLevel::Info)
            .with_target("filebuf::map", LogLevel::Trace);
        assert_eq!(config.level_for("filebuf::map"), LogLevel::Trace);
        assert_eq!(config.level_for("filebuf::io"), LogLevel::Info);
        assert_eq!(config.level_for("filebufx"), LogLevel::Error);
        assert_eq!(config.level_for("other"), LogLevel::Error);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let config = LogConfig::from_verbosity(3).with_target("filebuf::io", LogLevel::Trace);
        let json = serde_json::to_string(&config).unwrap();
        let back: LogConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
