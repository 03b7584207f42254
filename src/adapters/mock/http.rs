//! Mock HTTP client for testing.
//!
//! Responses are scripted per URL as a queue: each request consumes the
//! front of the queue, and the last scripted response keeps answering once
//! the queue is down to one entry.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
    /// Wait, then answer with the inner response
    Delayed {
        delay: Duration,
        response: Box<MockResponse>,
    },
}

impl MockResponse {
    /// A 200 response carrying `body` as JSON text.
    pub fn json(body: impl Into<String>) -> Self {
        MockResponse::Success(Response::new(200, Bytes::from(body.into())))
    }

    /// A response with the given status and body.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.into())))
    }

    /// Delay this response by `delay`.
    pub fn delayed(self, delay: Duration) -> Self {
        MockResponse::Delayed {
            delay,
            response: Box::new(self),
        }
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use m3_office::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.push_response(URL, MockResponse::json(r#"{"status":"coding"}"#));
/// client.push_response(URL, MockResponse::status(500, "boom"));
///
/// // first GET -> coding, every later GET -> 500
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scripted responses for `url` with a single response.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), VecDeque::from([response]));
    }

    /// Append a response to the queue for `url`.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Set a default response for URLs without scripted responses.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_response(&self, url: &str) -> Option<MockResponse> {
        let mut responses = self.responses.lock().unwrap();
        if let Some(queue) = responses.get_mut(url) {
            if queue.len() > 1 {
                return queue.pop_front();
            }
            if let Some(last) = queue.front() {
                return Some(last.clone());
            }
        }
        self.default_response.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
        });

        let mut next = self.next_response(url);
        loop {
            match next {
                Some(MockResponse::Success(response)) => return Ok(response),
                Some(MockResponse::Error(err)) => return Err(err),
                Some(MockResponse::Delayed { delay, response }) => {
                    tokio::time::sleep(delay).await;
                    next = Some(*response);
                }
                None => {
                    return Err(HttpError::Other(format!("No mock response for URL: {}", url)))
                }
            }
        }
    }
}
