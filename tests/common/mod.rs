//! Common test utilities for integration tests.
//!
//! This module provides state file fixtures, mock configurations,
//! and helper functions shared by the integration tests.
//!
//! # Example
//!
//! ```ignore
//! use common::{state_json, MockStateSource, STATE_URL};
//!
//! let client = MockStateSource::new()
//!     .then_json(&state_json("coding", Some("coder"), 42.0))
//!     .build();
//! ```

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;

use m3_office::store::StateStore;

/// URL every mock-backed test polls.
#[allow(dead_code)]
pub const STATE_URL: &str = "http://localhost:3000/m3-state.json";

/// Minimal state file for `phase`, optionally naming the current agent.
#[allow(dead_code)]
pub fn state_json(phase: &str, agent: Option<&str>, progress: f64) -> String {
    match agent {
        Some(agent) => format!(
            r#"{{"status":"{}","task":"Implement login","progress":{},"current_agent":"{}"}}"#,
            phase, progress, agent
        ),
        None => format!(
            r#"{{"status":"{}","task":"Implement login","progress":{}}}"#,
            phase, progress
        ),
    }
}

/// A complete state file with attempts and a short log history.
#[allow(dead_code)]
pub fn full_state_json() -> String {
    r#"{
        "status": "verifying",
        "task": "Add password reset",
        "progress": 75,
        "current_agent": "verifier",
        "attempts": {"organizer": 1, "coder": 2, "verifier": 1, "maestro": 0},
        "logs": [
            {"time": 1767225600000, "agent": "organizer", "message": "Plano criado", "level": "success"},
            {"time": 1767225660000, "agent": "coder", "message": "Testes falharam", "level": "error"},
            {"time": 1767225720000, "agent": "coder", "message": "Correção aplicada"},
            {"time": 1767225780000, "agent": "verifier", "message": "Verificando", "level": "info"}
        ]
    }"#
    .to_string()
}

/// An isolated store, so tests never share the global one.
#[allow(dead_code)]
pub fn new_store() -> Arc<StateStore> {
    Arc::new(StateStore::new())
}
