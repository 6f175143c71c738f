//! Configuration error types.
//!
//! The simulation itself never fails: numeric edge cases are guarded in place.
//! Errors only surface while loading or validating a [`crate::SimConfig`].

use std::fmt;

/// Everything that can go wrong before a simulation exists.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing a config file failed.
    Io(std::io::Error),

    /// The config file is not valid JSON for [`crate::SimConfig`].
    Parse(serde_json::Error),

    /// A value parsed fine but is outside its usable range.
    Invalid {
        /// Dotted path of the offending field, e.g. `zones[2].threshold`.
        field: String,
        /// Human-readable description of the accepted range.
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config file i/o failed: {}", err),
            ConfigError::Parse(err) => write!(f, "config is not valid JSON: {}", err),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid config value '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;
