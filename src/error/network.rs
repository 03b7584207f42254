//! Network-related error types.
//!
//! This module defines errors that occur while fetching the state snapshot:
//! transport failures, non-success responses and malformed payloads.

use std::fmt;

use crate::traits::HttpError;

/// Network-specific error variants.
///
/// Every variant is a transport error in the sense of the synchronizer:
/// the last good snapshot stays published and the next poll retries.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the snapshot source failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    Timeout { url: String },

    /// HTTP status error (non-2xx response).
    HttpStatus { status: u16, message: String },

    /// The payload could not be parsed as a state document.
    InvalidResponse { message: String },

    /// Request was cancelled.
    Cancelled,

    /// Generic network error.
    Other { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient.
    ///
    /// The synchronizer retries every failure on the next tick regardless;
    /// this is only used to pick a log level.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408 || *status == 404
            }
            NetworkError::InvalidResponse { .. } => true,
            NetworkError::Cancelled => false,
            NetworkError::Other { .. } => true,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { url, .. } => {
                format!("Unable to reach the state source at {}.", url)
            }
            NetworkError::Timeout { url } => {
                format!("The state source at {} timed out.", url)
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                404 => "The state file was not found.".to_string(),
                500..=599 => "The state source is failing (server error).".to_string(),
                _ => format!("HTTP error! status: {}", status),
            },
            NetworkError::InvalidResponse { message } => {
                format!("The state file is malformed: {}", message)
            }
            NetworkError::Cancelled => "The state request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }

    /// Build a NetworkError from a transport-level [`HttpError`].
    pub fn from_http(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(_) => NetworkError::Timeout {
                url: url.to_string(),
            },
            HttpError::Cancelled => NetworkError::Cancelled,
            HttpError::InvalidUrl(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Other(message) => NetworkError::Other { message },
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { url } => write!(f, "Request to '{}' timed out", url),
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::InvalidResponse { message } => {
                write!(f, "Invalid response: {}", message)
            }
            NetworkError::Cancelled => write!(f, "Request cancelled"),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::InvalidResponse {
            message: err.to_string(),
        }
    }
}
