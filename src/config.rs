//! Runtime configuration.
//!
//! Values come from three layers, later ones winning: built-in defaults,
//! `M3_*` environment variables, then command-line flags. An environment
//! value that does not parse is logged and ignored.
//!
//! # Example
//!
//! ```ignore
//! use m3_office::config::OfficeConfig;
//! use std::time::Duration;
//!
//! let config = OfficeConfig::default()
//!     .with_state_url("http://127.0.0.1:8080/state.json")
//!     .with_poll_interval(Duration::from_millis(500));
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::RunOptions;
use crate::compositor::{DEFAULT_SURFACE_SIZE, MAX_SURFACE_SIZE};
use crate::error::ConfigError;
use crate::sync::DEFAULT_POLL_INTERVAL;

pub const ENV_STATE_URL: &str = "M3_STATE_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "M3_POLL_INTERVAL_MS";
pub const ENV_SURFACE_SIZE: &str = "M3_SURFACE_SIZE";

pub const DEFAULT_STATE_URL: &str = "http://localhost:3000/m3-state.json";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct OfficeConfig {
    /// Where the state file is fetched from.
    pub state_url: String,
    pub poll_interval: Duration,
    /// Per-request timeout for the HTTP client.
    pub request_timeout: Duration,
    pub surface_width: u32,
    pub surface_height: u32,
    /// Directory that receives PNG dumps of redrawn monitors.
    pub dump_dir: Option<PathBuf>,
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            state_url: DEFAULT_STATE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            surface_width: DEFAULT_SURFACE_SIZE,
            surface_height: DEFAULT_SURFACE_SIZE,
            dump_dir: None,
        }
    }
}

impl OfficeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state_url(mut self, url: impl Into<String>) -> Self {
        self.state_url = url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set a square surface size.
    pub fn with_surface_size(mut self, size: u32) -> Self {
        self.surface_width = size;
        self.surface_height = size;
        self
    }

    pub fn with_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `M3_*` key.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_STATE_URL).filter(|url| !url.trim().is_empty()) {
            config.state_url = url.trim().to_string();
        }

        if let Some(value) = lookup(ENV_POLL_INTERVAL_MS) {
            match parse_interval_ms(ENV_POLL_INTERVAL_MS, &value) {
                Ok(interval) => config.poll_interval = interval,
                Err(err) => tracing::warn!("{}; using default", err),
            }
        }

        if let Some(value) = lookup(ENV_SURFACE_SIZE) {
            match parse_surface_size(ENV_SURFACE_SIZE, &value) {
                Ok(size) => config = config.with_surface_size(size),
                Err(err) => tracing::warn!("{}; using default", err),
            }
        }

        config
    }

    /// Apply command-line overrides.
    pub fn apply_options(mut self, options: &RunOptions) -> Self {
        if let Some(url) = &options.url {
            self.state_url = url.clone();
        }
        if let Some(interval) = options.interval {
            self.poll_interval = interval;
        }
        if let Some(dir) = &options.dump_dir {
            self.dump_dir = Some(dir.clone());
        }
        self
    }
}

/// Parse a positive millisecond count.
pub fn parse_interval_ms(key: &str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let millis: u64 = value
        .trim()
        .parse()
        .map_err(|_| invalid("expected a whole number of milliseconds"))?;
    if millis == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(Duration::from_millis(millis))
}

/// Parse a surface edge length.
pub fn parse_surface_size(key: &str, value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };
    let size: u32 = value
        .trim()
        .parse()
        .map_err(|_| invalid("expected a pixel count".to_string()))?;
    if size == 0 || size > MAX_SURFACE_SIZE {
        return Err(invalid(format!("must be between 1 and {}", MAX_SURFACE_SIZE)));
    }
    Ok(size)
}
