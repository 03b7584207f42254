//! The seam between the synchronizer and the network.
//!
//! Only a GET is needed to read the state file. Status codes are reported,
//! not judged: turning a non-2xx answer into an error is the caller's job.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

/// Request or response headers, keyed by name as sent.
pub type Headers = HashMap<String, String>;

/// A fully buffered HTTP answer.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self::with_headers(status, Headers::new(), body)
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header ignoring the case of its name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

/// Failures below the HTTP layer: no status line was received.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("HTTP error: {0}")]
    Other(String),
}

/// Fetches a URL.
///
/// Production code uses the reqwest adapter; tests script responses with
/// the mock.
///
/// # Example
///
/// ```ignore
/// use m3_office::traits::{no_cache_headers, HttpClient, HttpError};
///
/// async fn fetch_state<C: HttpClient>(client: &C) -> Result<String, HttpError> {
///     let response = client.get("http://localhost:3000/m3-state.json", &no_cache_headers()).await?;
///     response.text().map_err(|e| HttpError::Other(e.to_string()))
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// A non-2xx status is not an error at this level; callers inspect
    /// [`Response::is_success`].
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;
}

/// Headers that disable every cache between us and the state source.
pub fn no_cache_headers() -> Headers {
    Headers::from([
        ("Accept".to_string(), "application/json".to_string()),
        ("Cache-Control".to_string(), "no-store".to_string()),
        ("Pragma".to_string(), "no-cache".to_string()),
    ])
}
