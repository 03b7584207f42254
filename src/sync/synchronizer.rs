//! Periodic state file poller.
//!
//! The synchronizer owns at most one poll task. Each tick performs a GET
//! with caching disabled; a good response replaces the published snapshot,
//! any failure leaves it in place and records a readable message in the
//! store's error flag. Failures are retried on the next tick, there is no
//! backoff.
//!
//! # Dependency Injection
//!
//! The HTTP client is injected as `Arc<dyn HttpClient>`:
//! - production passes [`ReqwestHttpClient`](crate::adapters::ReqwestHttpClient)
//! - tests pass [`MockHttpClient`](crate::adapters::mock::MockHttpClient)

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::payload::snapshot_from_body;
use crate::error::NetworkError;
use crate::models::{truncate_chars, Snapshot};
use crate::store::StateStore;
use crate::traits::{no_cache_headers, HttpClient};

/// Default polling interval (1 second).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Longest response body echoed into an error message.
const MAX_ERROR_BODY_CHARS: usize = 120;

/// One fetch-and-publish cycle, shared by the poll task and `refresh_now`.
#[derive(Clone)]
struct Fetcher {
    client: Arc<dyn HttpClient>,
    store: Arc<StateStore>,
    url: Arc<str>,
}

impl Fetcher {
    async fn fetch_once(&self) -> Result<Arc<Snapshot>, NetworkError> {
        let _loading = self.store.begin_fetch();
        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                tracing::debug!(
                    phase = %snapshot.phase,
                    progress = snapshot.progress,
                    logs = snapshot.log_entries.len(),
                    "State snapshot received"
                );
                let published = self.store.publish(snapshot);
                self.store.set_error(None);
                Ok(published)
            }
            Err(err) => {
                tracing::warn!(
                    url = %self.url,
                    code = err.error_code(),
                    "State poll failed: {}",
                    err
                );
                self.store.set_error(Some(err.user_message()));
                Err(err)
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, NetworkError> {
        let response = self
            .client
            .get(&self.url, &no_cache_headers())
            .await
            .map_err(|err| NetworkError::from_http(err, &self.url))?;

        if !response.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NetworkError::HttpStatus {
                status: response.status,
                message: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
            });
        }

        snapshot_from_body(&response.body, Utc::now())
    }
}

/// Polls the state file and publishes snapshots into a [`StateStore`].
pub struct StateSynchronizer {
    fetcher: Fetcher,
    poll_task: Option<JoinHandle<()>>,
}

impl StateSynchronizer {
    pub fn new(
        client: Arc<dyn HttpClient>,
        store: Arc<StateStore>,
        url: impl Into<String>,
    ) -> Self {
        let url: String = url.into();
        Self {
            fetcher: Fetcher {
                client,
                store,
                url: Arc::from(url),
            },
            poll_task: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.fetcher.url
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.fetcher.store
    }

    /// Begin polling: one fetch right away, then one every `interval`.
    ///
    /// Calling `start` again replaces the running poll task. A zero
    /// interval is raised to one millisecond.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, interval: Duration) {
        self.stop();

        let period = interval.max(Duration::from_millis(1));
        let fetcher = self.fetcher.clone();

        tracing::info!(
            url = %fetcher.url,
            "State synchronizer started (interval: {}ms)",
            period.as_millis()
        );

        self.poll_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                // Errors are already recorded in the store.
                let _ = fetcher.fetch_once().await;
            }
        }));
    }

    /// Cancel the poll task. An in-flight `refresh_now` still completes.
    pub fn stop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
            tracing::info!("State synchronizer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.poll_task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Fetch once, outside the poll schedule, and wait for the outcome.
    pub async fn refresh_now(&self) -> Result<Arc<Snapshot>, NetworkError> {
        self.fetcher.fetch_once().await
    }
}

impl Drop for StateSynchronizer {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::models::{AgentId, Phase};
    use crate::traits::HttpError;

    const URL: &str = "http://localhost:3000/m3-state.json";

    fn synchronizer(client: &MockHttpClient) -> StateSynchronizer {
        StateSynchronizer::new(Arc::new(client.clone()), Arc::new(StateStore::new()), URL)
    }

    #[tokio::test]
    async fn test_refresh_now_publishes_snapshot() {
        let client = MockHttpClient::new();
        client.set_response(
            URL,
            MockResponse::json(r#"{"status":"coding","current_agent":"coder","progress":42}"#),
        );
        let sync = synchronizer(&client);
        let mut rx = sync.store().subscribe();

        let snapshot = sync.refresh_now().await.unwrap();

        assert_eq!(snapshot.phase, Phase::Coding);
        assert_eq!(snapshot.current_agent, Some(AgentId::Coder));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().progress, 42.0);
        assert!(!sync.store().flags().is_loading);
        assert!(sync.store().flags().error.is_none());
    }

    #[tokio::test]
    async fn test_requests_disable_caching() {
        let client = MockHttpClient::new();
        client.set_response(URL, MockResponse::json("{}"));
        let sync = synchronizer(&client);

        sync.refresh_now().await.unwrap();

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, URL);
        assert_eq!(
            requests[0].headers.get("Cache-Control").map(String::as_str),
            Some("no-store")
        );
        assert_eq!(
            requests[0].headers.get("Pragma").map(String::as_str),
            Some("no-cache")
        );
    }

    #[tokio::test]
    async fn test_http_status_keeps_previous_snapshot() {
        let client = MockHttpClient::new();
        client.push_response(URL, MockResponse::json(r#"{"status":"verifying"}"#));
        client.push_response(URL, MockResponse::status(503, "unavailable"));
        let sync = synchronizer(&client);

        sync.refresh_now().await.unwrap();
        let before = sync.store().snapshot();

        let err = sync.refresh_now().await.unwrap_err();
        assert!(matches!(err, NetworkError::HttpStatus { status: 503, .. }));
        assert_eq!(*sync.store().snapshot(), *before);
        assert!(sync.store().flags().error.is_some());
        assert!(!sync.store().flags().is_loading);
    }

    #[tokio::test]
    async fn test_transport_and_parse_errors_set_flag() {
        let client = MockHttpClient::new();
        client.push_response(
            URL,
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );
        client.push_response(URL, MockResponse::json("not json"));
        client.push_response(URL, MockResponse::json(r#"{"status":"completed"}"#));
        let sync = synchronizer(&client);

        let err = sync.refresh_now().await.unwrap_err();
        assert!(matches!(err, NetworkError::ConnectionFailed { .. }));
        assert_eq!(sync.store().phase(), Phase::Idle);

        let err = sync.refresh_now().await.unwrap_err();
        assert!(matches!(err, NetworkError::InvalidResponse { .. }));

        sync.refresh_now().await.unwrap();
        assert_eq!(sync.store().phase(), Phase::Completed);
        assert!(sync.store().flags().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_fetches_immediately_then_every_interval() {
        let client = MockHttpClient::new();
        client.set_response(URL, MockResponse::json(r#"{"status":"organizing"}"#));
        let mut sync = synchronizer(&client);

        sync.start(Duration::from_millis(1000));
        assert!(sync.is_running());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(client.request_count(), 1);
        assert_eq!(sync.store().phase(), Phase::Organizing);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(client.request_count(), 2);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(client.request_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_polling() {
        let client = MockHttpClient::new();
        client.set_response(URL, MockResponse::json("{}"));
        let mut sync = synchronizer(&client);

        sync.start(Duration::from_millis(500));
        tokio::time::sleep(Duration::from_millis(10)).await;
        sync.stop();
        assert!(!sync.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_poll_task() {
        let client = MockHttpClient::new();
        client.set_response(URL, MockResponse::json("{}"));
        let mut sync = synchronizer(&client);

        sync.start(Duration::from_millis(1000));
        sync.start(Duration::from_millis(1000));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_fetches_keep_loading_until_both_finish() {
        let client = MockHttpClient::new();
        client.push_response(
            URL,
            MockResponse::json(r#"{"status":"coding"}"#).delayed(Duration::from_millis(100)),
        );
        client.push_response(
            URL,
            MockResponse::json(r#"{"status":"verifying"}"#).delayed(Duration::from_millis(1000)),
        );
        let sync = synchronizer(&client);

        let (first, second, loading_midway) = tokio::join!(
            sync.refresh_now(),
            sync.refresh_now(),
            async {
                tokio::time::sleep(Duration::from_millis(210)).await;
                (sync.store().flags().is_loading, client.request_count())
            }
        );

        assert_eq!(loading_midway, (true, 2));
        assert!(!sync.store().flags().is_loading);
        assert_eq!(first.unwrap().phase, Phase::Coding);
        let second = second.unwrap();
        assert_eq!(second.phase, Phase::Verifying);
        assert!(Arc::ptr_eq(&second, &sync.store().snapshot()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_poll_releases_loading_flag() {
        let client = MockHttpClient::new();
        client.set_response(
            URL,
            MockResponse::json("{}").delayed(Duration::from_millis(5000)),
        );
        let mut sync = synchronizer(&client);

        sync.start(Duration::from_millis(1000));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(sync.store().flags().is_loading);

        sync.stop();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!sync.store().flags().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_delays_ticks_without_overlap() {
        let client = MockHttpClient::new();
        client.set_response(
            URL,
            MockResponse::json("{}").delayed(Duration::from_millis(2500)),
        );
        let mut sync = synchronizer(&client);

        sync.start(Duration::from_millis(1000));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(client.request_count(), 1);
        assert!(sync.store().flags().is_loading);

        // first fetch ends at 2500ms; the delayed tick fires right after it
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(client.request_count(), 2);
    }
}
