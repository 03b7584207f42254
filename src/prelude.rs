//! Prelude module for convenient imports.
//!
//! ```ignore
//! use m3_office::prelude::*;
//! ```
//!
//! This will import:
//! - Domain types (AgentId, AgentStatus, Phase, Snapshot, ScreenContent)
//! - The store and synchronizer
//! - Status derivation
//! - The office and its workstations
//! - Error types

pub use crate::models::{AgentId, AgentStatus, LogEntry, LogLevel, Phase, ScreenContent, Snapshot};

pub use crate::store::{StateStore, SyncFlags};
pub use crate::sync::StateSynchronizer;

pub use crate::derive::{derive_status, AnimationState};

pub use crate::animation::AgentAnimator;
pub use crate::compositor::{create_surface, ScreenCompositor, Surface};
pub use crate::workstation::{Office, Workstation};

pub use crate::config::OfficeConfig;
pub use crate::error::{M3Error, M3Result};
