//! Unified error handling for m3-office.
//!
//! Errors fall into three groups that are handled differently:
//!
//! | Group | Type | Handling |
//! |-------|------|----------|
//! | Transport | [`NetworkError`] | Recorded as a visible message, last snapshot kept, retried next poll |
//! | Construction | [`RenderError`] | Fatal for one workstation, never retried |
//! | Configuration | [`ConfigError`] | Reported at startup |
//!
//! Data anomalies (out-of-range progress, unknown phases or agents) are not
//! errors at all; they are normalized when the snapshot is built.

mod config;
mod network;
mod render;
mod result;

use thiserror::Error;

pub use config::ConfigError;
pub use network::NetworkError;
pub use render::RenderError;
pub use result::M3Result;

/// Unified error type for the crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum M3Error {
    /// Snapshot transport errors.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Surface construction and export errors.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl M3Error {
    /// Check if the failed operation will succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            M3Error::Network(err) => err.is_retryable(),
            M3Error::Render(_) => false,
            M3Error::Config(_) => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            M3Error::Network(err) => err.user_message(),
            M3Error::Render(err) => err.user_message(),
            M3Error::Config(err) => err.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            M3Error::Network(err) => err.error_code(),
            M3Error::Render(err) => err.error_code(),
            M3Error::Config(err) => err.error_code(),
        }
    }
}
