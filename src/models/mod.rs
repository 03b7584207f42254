//! Domain types shared by every stage of the pipeline.

mod agent;
pub mod palette;
mod phase;
mod screen;
mod snapshot;
mod text_utils;

pub use agent::{AgentColor, AgentId, AgentStatus};
pub use palette::Color;
pub use phase::Phase;
pub use screen::ScreenContent;
pub use snapshot::{
    clamp_progress, retain_recent_logs, Attempts, LogEntry, LogLevel, Snapshot, DEFAULT_TASK,
    FALLBACK_TASK, MAX_LOG_ENTRIES,
};
pub use text_utils::{format_duration, truncate_chars};
