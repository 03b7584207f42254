//! Canonical pipeline snapshot.
//!
//! A [`Snapshot`] is what subscribers see: every field is present and
//! normalized, whatever the state file contained.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::agent::AgentId;
use super::phase::Phase;

/// Maximum number of log entries retained in a published snapshot.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Task shown before the first snapshot arrives.
pub const DEFAULT_TASK: &str = "Aguardando tarefa...";

/// Task shown when a fetched state file carries no task.
pub const FALLBACK_TASK: &str = "Tarefa em andamento";

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Parse a wire value; unrecognized values are `Info`.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "success" => LogLevel::Success,
            "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// One line of pipeline history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    /// `None` when the state file named an agent outside the known set.
    pub agent: Option<AgentId>,
    pub message: String,
    pub level: LogLevel,
}

impl LogEntry {
    pub fn new(agent: AgentId, message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            timestamp: Utc::now(),
            agent: Some(agent),
            message: message.into(),
            level,
        }
    }
}

/// Attempt counters, one per known agent.
///
/// Backed by a fixed array so every agent always has an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Attempts([u32; 4]);

impl Attempts {
    pub fn get(&self, agent: AgentId) -> u32 {
        self.0[agent.index()]
    }

    pub fn set(&mut self, agent: AgentId, count: u32) {
        self.0[agent.index()] = count;
    }

    pub fn with(mut self, agent: AgentId, count: u32) -> Self {
        self.set(agent, count);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, u32)> + '_ {
        AgentId::ALL.iter().map(move |agent| (*agent, self.get(*agent)))
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// Clamp a progress value to [0, 100]. Non-finite values become 0.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Drop the oldest entries until at most [`MAX_LOG_ENTRIES`] remain.
pub fn retain_recent_logs(logs: &mut Vec<LogEntry>) {
    if logs.len() > MAX_LOG_ENTRIES {
        let excess = logs.len() - MAX_LOG_ENTRIES;
        logs.drain(..excess);
    }
}

/// One immutable reading of the pipeline state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub task: String,
    pub phase: Phase,
    pub current_agent: Option<AgentId>,
    pub progress: f64,
    pub attempts: Attempts,
    pub log_entries: Vec<LogEntry>,
    pub received_at: DateTime<Utc>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            task: DEFAULT_TASK.to_string(),
            phase: Phase::Idle,
            current_agent: None,
            progress: 0.0,
            attempts: Attempts::default(),
            log_entries: Vec::new(),
            received_at: Utc::now(),
        }
    }
}

impl Snapshot {
    /// Whether `agent` is the one the pipeline reports as current.
    pub fn is_active(&self, agent: AgentId) -> bool {
        self.current_agent == Some(agent)
    }

    /// The last `limit` log entries (all of them when `limit` is `None`).
    pub fn recent_logs(&self, limit: Option<usize>) -> &[LogEntry] {
        match limit {
            Some(limit) if limit < self.log_entries.len() => {
                &self.log_entries[self.log_entries.len() - limit..]
            }
            _ => &self.log_entries,
        }
    }

    /// Log entries attributed to `agent`, oldest first.
    pub fn logs_for(&self, agent: AgentId) -> impl Iterator<Item = &LogEntry> {
        self.log_entries
            .iter()
            .filter(move |entry| entry.agent == Some(agent))
    }

    /// Progress rounded for display.
    pub fn progress_percent(&self) -> u8 {
        clamp_progress(self.progress).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(i: usize) -> LogEntry {
        LogEntry::new(AgentId::Coder, format!("line {}", i), LogLevel::Info)
    }

    #[test]
    fn test_clamp_progress() {
        assert_eq!(clamp_progress(150.0), 100.0);
        assert_eq!(clamp_progress(-5.0), 0.0);
        assert_eq!(clamp_progress(42.5), 42.5);
        assert_eq!(clamp_progress(f64::NAN), 0.0);
        assert_eq!(clamp_progress(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_retain_recent_logs_keeps_newest_in_order() {
        let mut logs: Vec<LogEntry> = (0..130).map(entry).collect();
        retain_recent_logs(&mut logs);

        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs.first().unwrap().message, "line 30");
        assert_eq!(logs.last().unwrap().message, "line 129");
        for (i, log) in logs.iter().enumerate() {
            assert_eq!(log.message, format!("line {}", i + 30));
        }
    }

    #[test]
    fn test_retain_recent_logs_short_history_untouched() {
        let mut logs: Vec<LogEntry> = (0..5).map(entry).collect();
        retain_recent_logs(&mut logs);
        assert_eq!(logs.len(), 5);
    }

    #[test]
    fn test_attempts_cover_every_agent() {
        let attempts = Attempts::default().with(AgentId::Verifier, 3);
        assert_eq!(attempts.get(AgentId::Verifier), 3);
        assert_eq!(attempts.get(AgentId::Organizer), 0);
        assert_eq!(attempts.iter().count(), 4);
        assert_eq!(attempts.total(), 3);
    }

    #[test]
    fn test_default_snapshot() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.task, DEFAULT_TASK);
        assert_eq!(snapshot.phase, Phase::Idle);
        assert!(snapshot.current_agent.is_none());
        assert_eq!(snapshot.progress_percent(), 0);
    }

    #[test]
    fn test_recent_logs_and_filter() {
        let mut snapshot = Snapshot::default();
        snapshot.log_entries = (0..10).map(entry).collect();
        snapshot
            .log_entries
            .push(LogEntry::new(AgentId::Maestro, "review", LogLevel::Success));

        assert_eq!(snapshot.recent_logs(Some(3)).len(), 3);
        assert_eq!(snapshot.recent_logs(Some(3))[2].message, "review");
        assert_eq!(snapshot.recent_logs(None).len(), 11);
        assert_eq!(snapshot.recent_logs(Some(50)).len(), 11);
        assert_eq!(snapshot.logs_for(AgentId::Maestro).count(), 1);
    }

    #[test]
    fn test_log_level_parse_defaults_to_info() {
        assert_eq!(LogLevel::parse("warning"), LogLevel::Warning);
        assert_eq!(LogLevel::parse("fatal"), LogLevel::Info);
        assert_eq!(LogLevel::parse(""), LogLevel::Info);
    }
}
