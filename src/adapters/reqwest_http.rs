//! [`HttpClient`] over reqwest.

use async_trait::async_trait;
use std::time::Duration;

use crate::cli::VERSION;
use crate::traits::{Headers, HttpClient, HttpError, Response};

/// The production state fetcher.
///
/// # Example
///
/// ```ignore
/// use m3_office::adapters::ReqwestHttpClient;
/// use m3_office::traits::{no_cache_headers, HttpClient};
///
/// let client = ReqwestHttpClient::with_timeout(Duration::from_secs(5));
/// let response = client.get("http://localhost:3000/m3-state.json", &no_cache_headers()).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::from_builder(reqwest::Client::builder())
    }

    /// Requests give up after `timeout`, connect phase included.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::from_builder(reqwest::Client::builder().timeout(timeout))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn from_builder(builder: reqwest::ClientBuilder) -> Self {
        let client = builder
            .user_agent(format!("m3-office/{}", VERSION))
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("Falling back to default HTTP client: {}", err);
                reqwest::Client::new()
            });
        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn transport_error(err: reqwest::Error) -> HttpError {
    let message = err.to_string();
    if err.is_timeout() {
        HttpError::Timeout(message)
    } else if err.is_connect() {
        HttpError::ConnectionFailed(message)
    } else if err.is_builder() {
        HttpError::InvalidUrl(message)
    } else {
        HttpError::Other(message)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let request = headers
            .iter()
            .fold(self.client.get(url), |request, (name, value)| {
                request.header(name.as_str(), value.as_str())
            });

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let response_headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }
}
