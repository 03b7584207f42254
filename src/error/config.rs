//! Configuration errors.

use thiserror::Error;

/// Errors raised while resolving runtime configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A command-line flag expected a value but none followed it.
    #[error("Missing value for {flag}")]
    MissingValue { flag: String },

    /// A value could not be parsed.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MissingValue { .. } => "E_CFG_MISSING",
            ConfigError::InvalidValue { .. } => "E_CFG_INVALID",
        }
    }
}
