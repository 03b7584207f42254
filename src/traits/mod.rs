//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP GET used by the state synchronizer

pub mod http;

pub use http::{no_cache_headers, Headers, HttpClient, HttpError, Response};
