//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from `m3_office::adapters::mock`
//! and provides a builder for scripted state sources.

pub use m3_office::adapters::mock::{MockHttpClient, MockResponse};
pub use m3_office::traits::HttpError;

use std::time::Duration;

use super::STATE_URL;

/// Scripts the responses a [`MockHttpClient`] gives for [`STATE_URL`].
///
/// Responses are served in order; the last one keeps answering.
#[allow(dead_code)]
pub struct MockStateSource {
    client: MockHttpClient,
}

#[allow(dead_code)]
impl MockStateSource {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Queue a 200 response with `json` as the body.
    pub fn then_json(self, json: &str) -> Self {
        self.client.push_response(STATE_URL, MockResponse::json(json));
        self
    }

    /// Queue a response with the given status.
    pub fn then_status(self, status: u16) -> Self {
        self.client
            .push_response(STATE_URL, MockResponse::status(status, "error"));
        self
    }

    /// Queue a refused connection.
    pub fn then_connection_refused(self) -> Self {
        self.client.push_response(
            STATE_URL,
            MockResponse::Error(HttpError::ConnectionFailed("connection refused".to_string())),
        );
        self
    }

    /// Queue a 200 response that arrives after `delay`.
    pub fn then_slow_json(self, json: &str, delay: Duration) -> Self {
        self.client
            .push_response(STATE_URL, MockResponse::json(json).delayed(delay));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockStateSource {
    fn default() -> Self {
        Self::new()
    }
}
