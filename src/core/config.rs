//! Loadable dispatcher configuration
//!
//! ```
//! use tagged_logger::{DispatcherConfig, Severity};
//!
//! let config = DispatcherConfig::from_json(r#"{ "min_severity": "Warning" }"#).unwrap();
//! assert_eq!(config.min_severity, Severity::Warning);
//! ```

use super::error::{LoggerError, Result};
use super::platform::{NullChannel, PlatformChannel, StderrChannel};
use super::severity::Severity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Environment variable holding the minimum severity name
pub const LEVEL_ENV_VAR: &str = "TAGGED_LOGGER_LEVEL";

/// Which built-in platform channel to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformChannelKind {
    #[default]
    Stderr,
    Null,
}

impl PlatformChannelKind {
    pub fn channel(self, show_debug: bool) -> Arc<dyn PlatformChannel> {
        match self {
            PlatformChannelKind::Stderr => Arc::new(StderrChannel::new().with_debug(show_debug)),
            PlatformChannelKind::Null => Arc::new(NullChannel),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub min_severity: Severity,
    /// Process default subsystem for tags built with [`crate::LogTag::new`]
    pub subsystem: Option<String>,
    pub platform: PlatformChannelKind,
    /// Show `debug` platform lines on channels that hide them by default
    pub platform_debug: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            min_severity: Severity::Info,
            subsystem: None,
            platform: PlatformChannelKind::default(),
            platform_debug: false,
        }
    }
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `TAGGED_LOGGER_LEVEL`, if set
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(level) = std::env::var(LEVEL_ENV_VAR) {
            config.min_severity = level.parse().map_err(|_| {
                LoggerError::config(LEVEL_ENV_VAR, format!("unknown severity '{}'", level))
            })?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    #[must_use]
    pub fn with_subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = Some(subsystem.into());
        self
    }

    fn validate(&self) -> Result<()> {
        match self.subsystem {
            Some(ref subsystem) if subsystem.trim().is_empty() => Err(LoggerError::config(
                "DispatcherConfig",
                "subsystem must not be empty",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatcherConfig::default();
        assert_eq!(config.min_severity, Severity::Info);
        assert_eq!(config.subsystem, None);
        assert_eq!(config.platform, PlatformChannelKind::Stderr);
        assert!(!config.platform_debug);
    }

    #[test]
    fn test_from_json_full() {
        let config = DispatcherConfig::from_json(
            r#"{
                "min_severity": "Debug",
                "subsystem": "com.example.app",
                "platform": "null",
                "platform_debug": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.min_severity, Severity::Debug);
        assert_eq!(config.subsystem.as_deref(), Some("com.example.app"));
        assert_eq!(config.platform, PlatformChannelKind::Null);
        assert!(config.platform_debug);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            DispatcherConfig::from_json(r#"{ "min_severity": "Loud" }"#),
            Err(LoggerError::JsonError(_))
        ));
        assert!(matches!(
            DispatcherConfig::from_json(r#"{ "subsystem": "  " }"#),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_roundtrip_through_json() {
        let config = DispatcherConfig::new()
            .with_min_severity(Severity::Error)
            .with_subsystem("com.example");
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(DispatcherConfig::from_json(&json).unwrap(), config);
    }
}
