//! Wire format of the state file and its normalization into a [`Snapshot`].
//!
//! Parsing is lenient field by field: a missing or oddly-typed attribute is
//! replaced by its default instead of failing the whole document. Only a
//! body that is not a JSON object is rejected.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::NetworkError;
use crate::models::{
    clamp_progress, retain_recent_logs, AgentId, Attempts, LogEntry, LogLevel, Phase, Snapshot,
    FALLBACK_TASK,
};

/// The state document as written by the pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateFile {
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub task: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub progress: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_agent: Option<String>,
    #[serde(deserialize_with = "lenient_attempts")]
    pub attempts: Option<HashMap<String, Value>>,
    #[serde(deserialize_with = "lenient_logs")]
    pub logs: Option<Vec<RawLogEntry>>,
}

/// One log line as written by the pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLogEntry {
    pub time: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub agent: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub level: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    })
}

/// Anything but an object is treated as absent.
fn lenient_attempts<'de, D>(deserializer: D) -> Result<Option<HashMap<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    })
}

/// Anything but an array is treated as absent; elements that are not
/// objects are skipped.
fn lenient_logs<'de, D>(deserializer: D) -> Result<Option<Vec<RawLogEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from_value(&Value::deserialize(deserializer)?))
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parse a response body into a [`StateFile`].
pub fn parse_state_file(body: &[u8]) -> Result<StateFile, NetworkError> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(NetworkError::InvalidResponse {
            message: "expected a JSON object".to_string(),
        });
    }
    Ok(serde_json::from_value(value)?)
}

fn timestamp_from_value(value: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    match value {
        Some(Value::String(text)) => DateTime::parse_from_rfc3339(text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok()
            .or_else(|| text.trim().parse::<f64>().ok().and_then(from_millis))
            .unwrap_or(now),
        Some(other) => number_from_value(other).and_then(from_millis).unwrap_or(now),
        None => now,
    }
}

fn from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis <= 0.0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

fn attempts_from_map(map: Option<HashMap<String, Value>>) -> Attempts {
    let mut attempts = Attempts::default();
    for (key, value) in map.unwrap_or_default() {
        let Some(agent) = AgentId::parse(&key) else {
            continue;
        };
        let count = number_from_value(&value)
            .filter(|n| n.is_finite() && *n > 0.0)
            .map(|n| n.min(u32::MAX as f64) as u32)
            .unwrap_or(0);
        attempts.set(agent, count);
    }
    attempts
}

impl RawLogEntry {
    fn into_entry(self, now: DateTime<Utc>) -> LogEntry {
        LogEntry {
            timestamp: timestamp_from_value(self.time.as_ref(), now),
            agent: self.agent.as_deref().and_then(AgentId::parse),
            message: self.message.unwrap_or_default(),
            level: self
                .level
                .as_deref()
                .map(LogLevel::parse)
                .unwrap_or_default(),
        }
    }
}

impl StateFile {
    /// Apply field defaults, clamp progress, keep the newest 100 log lines,
    /// and stamp the result with `received_at`.
    pub fn into_snapshot(self, received_at: DateTime<Utc>) -> Snapshot {
        let task = self
            .task
            .filter(|task| !task.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_TASK.to_string());

        let phase = self
            .status
            .as_deref()
            .map(Phase::parse)
            .unwrap_or_default();

        let mut log_entries: Vec<LogEntry> = self
            .logs
            .unwrap_or_default()
            .into_iter()
            .map(|raw| raw.into_entry(received_at))
            .collect();
        retain_recent_logs(&mut log_entries);

        Snapshot {
            task,
            phase,
            current_agent: self.current_agent.as_deref().and_then(AgentId::parse),
            progress: clamp_progress(self.progress.unwrap_or(0.0)),
            attempts: attempts_from_map(self.attempts),
            log_entries,
            received_at,
        }
    }
}

/// Parse and normalize in one step.
pub fn snapshot_from_body(body: &[u8], received_at: DateTime<Utc>) -> Result<Snapshot, NetworkError> {
    Ok(parse_state_file(body)?.into_snapshot(received_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_LOG_ENTRIES;

    fn snapshot(json: &str) -> Snapshot {
        snapshot_from_body(json.as_bytes(), Utc::now()).unwrap()
    }

    #[test]
    fn test_full_document() {
        let snap = snapshot(
            r#"{
                "status": "coding",
                "task": "Implement login",
                "progress": 42,
                "current_agent": "coder",
                "attempts": {"organizer": 1, "coder": 2, "verifier": 0, "maestro": 0},
                "logs": [
                    {"time": 1700000000000, "agent": "organizer", "message": "plan ready", "level": "success"},
                    {"time": 1700000001000, "agent": "coder", "message": "writing code"}
                ]
            }"#,
        );

        assert_eq!(snap.phase, Phase::Coding);
        assert_eq!(snap.task, "Implement login");
        assert_eq!(snap.progress, 42.0);
        assert_eq!(snap.current_agent, Some(AgentId::Coder));
        assert_eq!(snap.attempts.get(AgentId::Coder), 2);
        assert_eq!(snap.log_entries.len(), 2);
        assert_eq!(snap.log_entries[0].level, LogLevel::Success);
        assert_eq!(snap.log_entries[1].level, LogLevel::Info);
        assert_eq!(
            snap.log_entries[0].timestamp.timestamp_millis(),
            1_700_000_000_000
        );
    }

    #[test]
    fn test_empty_object_gets_defaults() {
        let snap = snapshot("{}");
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.task, FALLBACK_TASK);
        assert_eq!(snap.progress, 0.0);
        assert_eq!(snap.attempts, Attempts::default());
        assert!(snap.log_entries.is_empty());
        assert!(snap.current_agent.is_none());
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(snapshot(r#"{"progress": 150}"#).progress, 100.0);
        assert_eq!(snapshot(r#"{"progress": -5}"#).progress, 0.0);
        assert_eq!(snapshot(r#"{"progress": "37.5"}"#).progress, 37.5);
        assert_eq!(snapshot(r#"{"progress": null}"#).progress, 0.0);
    }

    #[test]
    fn test_partial_attempts_fill_missing_agents() {
        let snap = snapshot(r#"{"attempts": {"verifier": 3, "designer": 9, "coder": -1}}"#);
        assert_eq!(snap.attempts.get(AgentId::Verifier), 3);
        assert_eq!(snap.attempts.get(AgentId::Coder), 0);
        assert_eq!(snap.attempts.get(AgentId::Organizer), 0);
        assert_eq!(snap.attempts.total(), 3);
    }

    #[test]
    fn test_unknown_values_are_normalized() {
        let snap = snapshot(
            r#"{"status": "deploying", "current_agent": "designer",
                "logs": [{"agent": "designer", "message": "hi", "level": "fatal"}]}"#,
        );
        assert_eq!(snap.phase, Phase::Other("deploying".to_string()));
        assert!(snap.current_agent.is_none());
        assert!(snap.log_entries[0].agent.is_none());
        assert_eq!(snap.log_entries[0].level, LogLevel::Info);
    }

    #[test]
    fn test_wrongly_typed_collections_are_defaulted() {
        let snap = snapshot(r#"{"status": "coding", "logs": "oops", "attempts": [1, 2]}"#);
        assert_eq!(snap.phase, Phase::Coding);
        assert!(snap.log_entries.is_empty());
        assert_eq!(snap.attempts, Attempts::default());

        let snap = snapshot(r#"{"attempts": "three", "logs": null}"#);
        assert_eq!(snap.attempts, Attempts::default());
        assert!(snap.log_entries.is_empty());
    }

    #[test]
    fn test_non_object_log_entries_are_skipped() {
        let snap = snapshot(
            r#"{"logs": ["plain text", 7, null,
                {"agent": ["coder"], "message": {"x": 1}, "level": 3, "time": true},
                {"agent": "coder", "message": "kept"}]}"#,
        );
        assert_eq!(snap.log_entries.len(), 2);
        assert!(snap.log_entries[0].agent.is_none());
        assert_eq!(snap.log_entries[0].message, "");
        assert_eq!(snap.log_entries[0].level, LogLevel::Info);
        assert_eq!(snap.log_entries[1].agent, Some(AgentId::Coder));
        assert_eq!(snap.log_entries[1].message, "kept");
    }

    #[test]
    fn test_log_history_truncated_to_newest() {
        let logs: Vec<String> = (0..150)
            .map(|i| format!(r#"{{"time": {}, "agent": "coder", "message": "m{}"}}"#, 1000 + i, i))
            .collect();
        let json = format!(r#"{{"status": "coding", "logs": [{}]}}"#, logs.join(","));
        let snap = snapshot(&json);

        assert_eq!(snap.log_entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(snap.log_entries[0].message, "m50");
        assert_eq!(snap.log_entries[99].message, "m149");
    }

    #[test]
    fn test_missing_time_uses_receive_time() {
        let now = Utc::now();
        let snap = snapshot_from_body(br#"{"logs": [{"agent": "coder", "message": "x"}]}"#, now)
            .unwrap();
        assert_eq!(snap.log_entries[0].timestamp, now);
        assert_eq!(snap.received_at, now);
    }

    #[test]
    fn test_rfc3339_time_accepted() {
        let snap = snapshot(r#"{"logs": [{"time": "2026-01-02T03:04:05Z", "message": "x"}]}"#);
        assert_eq!(
            snap.log_entries[0].timestamp.to_rfc3339(),
            "2026-01-02T03:04:05+00:00"
        );
    }

    #[test]
    fn test_blank_task_uses_fallback() {
        assert_eq!(snapshot(r#"{"task": "   "}"#).task, FALLBACK_TASK);
    }

    #[test]
    fn test_non_object_bodies_rejected() {
        assert!(snapshot_from_body(b"[]", Utc::now()).is_err());
        assert!(snapshot_from_body(b"null", Utc::now()).is_err());
        assert!(snapshot_from_body(b"<html>", Utc::now()).is_err());
        assert!(snapshot_from_body(b"", Utc::now()).is_err());
    }
}
