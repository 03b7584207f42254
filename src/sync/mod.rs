//! State synchronization: fetch the pipeline state file and publish it.

pub mod payload;
mod synchronizer;

pub use payload::{parse_state_file, snapshot_from_body, StateFile};
pub use synchronizer::{StateSynchronizer, DEFAULT_POLL_INTERVAL};
