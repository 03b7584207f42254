//! Content shown on a workstation monitor.

use super::agent::{AgentId, AgentStatus};

/// Everything the compositor needs to draw one screen.
///
/// Rebuilt on every update and never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenContent {
    pub title: String,
    pub subtitle: Option<String>,
    pub status: AgentStatus,
    pub progress: f64,
    pub terminal_lines: Vec<String>,
}

impl ScreenContent {
    pub fn new(title: impl Into<String>, status: AgentStatus, progress: f64) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            status,
            progress,
            terminal_lines: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.terminal_lines = lines;
        self
    }

    /// What a freshly mounted monitor shows before any snapshot arrives.
    pub fn ready(agent: AgentId) -> Self {
        Self::new(
            format!("{} READY", agent.as_str().to_uppercase()),
            AgentStatus::Idle,
            0.0,
        )
        .with_lines(vec!["Waiting for task...".to_string()])
    }
}
