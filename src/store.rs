//! Process-wide state container.
//!
//! The store holds the canonical [`Snapshot`] plus the synchronizer's
//! loading and error flags. It is single-writer (the synchronizer, or the
//! store actions below) and multi-reader: consumers subscribe and receive
//! whole `Arc<Snapshot>` values, so a reader can never observe a
//! half-updated snapshot.
//!
//! The global instance is created lazily on first use via
//! [`StateStore::global`] and lives until process exit. Tests and embedded
//! users can create independent stores with [`StateStore::new`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use tokio::sync::watch;

use crate::models::{
    clamp_progress, retain_recent_logs, AgentId, LogEntry, Phase, Snapshot,
};

static GLOBAL_STORE: Lazy<Arc<StateStore>> = Lazy::new(|| Arc::new(StateStore::new()));

/// Loading and error flags owned by the synchronizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncFlags {
    /// True while a fetch is in flight.
    pub is_loading: bool,
    /// Message of the last failed fetch; cleared by the next success.
    pub error: Option<String>,
}

/// Snapshot container with subscribe/publish semantics.
#[derive(Debug)]
pub struct StateStore {
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    flags_tx: watch::Sender<SyncFlags>,
    in_flight: AtomicUsize,
}

/// Marks one fetch as in flight until dropped.
///
/// Dropping also covers a fetch whose task was aborted mid-request.
#[derive(Debug)]
pub struct FetchGuard<'a> {
    store: &'a StateStore,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.store.end_fetch();
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Create a store holding the default (waiting) snapshot.
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::default())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(snapshot));
        let (flags_tx, _) = watch::channel(SyncFlags::default());
        Self {
            snapshot_tx,
            flags_tx,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// The process-wide store.
    pub fn global() -> Arc<StateStore> {
        Arc::clone(&GLOBAL_STORE)
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// Receive loading/error flag changes.
    pub fn subscribe_flags(&self) -> watch::Receiver<SyncFlags> {
        self.flags_tx.subscribe()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot_tx.borrow().clone()
    }

    pub fn flags(&self) -> SyncFlags {
        self.flags_tx.borrow().clone()
    }

    /// Replace the snapshot wholesale and notify subscribers.
    ///
    /// Returns the published value, which may already be superseded by the
    /// time the caller reads [`snapshot`](Self::snapshot) again.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.snapshot_tx.send_replace(Arc::clone(&snapshot));
        snapshot
    }

    /// Set progress (clamped) on a copy of the current snapshot and publish it.
    pub fn update_progress(&self, progress: f64) {
        self.modify(|snapshot| snapshot.progress = clamp_progress(progress));
    }

    pub fn set_phase(&self, phase: Phase) {
        self.modify(|snapshot| snapshot.phase = phase);
    }

    /// Append a log entry, evicting the oldest past the retention limit.
    pub fn add_log(&self, entry: LogEntry) {
        self.modify(|snapshot| {
            snapshot.log_entries.push(entry);
            retain_recent_logs(&mut snapshot.log_entries);
        });
    }

    pub fn set_loading(&self, is_loading: bool) {
        self.flags_tx.send_if_modified(|flags| {
            let changed = flags.is_loading != is_loading;
            flags.is_loading = is_loading;
            changed
        });
    }

    /// Count a fetch as started. `is_loading` stays true until every
    /// outstanding guard is dropped.
    pub fn begin_fetch(&self) -> FetchGuard<'_> {
        self.flags_tx.send_if_modified(|flags| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            let changed = !flags.is_loading;
            flags.is_loading = true;
            changed
        });
        FetchGuard { store: self }
    }

    fn end_fetch(&self) {
        self.flags_tx.send_if_modified(|flags| {
            let previous = self
                .in_flight
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
                .unwrap_or_else(|n| n);
            let is_loading = previous > 1;
            let changed = flags.is_loading != is_loading;
            flags.is_loading = is_loading;
            changed
        });
    }

    pub fn set_error(&self, error: Option<String>) {
        self.flags_tx.send_if_modified(|flags| {
            let changed = flags.error != error;
            flags.error = error;
            changed
        });
    }

    pub fn current_agent(&self) -> Option<AgentId> {
        self.snapshot_tx.borrow().current_agent
    }

    pub fn phase(&self) -> Phase {
        self.snapshot_tx.borrow().phase.clone()
    }

    pub fn progress(&self) -> f64 {
        self.snapshot_tx.borrow().progress
    }

    /// The last `limit` log entries, oldest first.
    pub fn logs(&self, limit: Option<usize>) -> Vec<LogEntry> {
        self.snapshot_tx.borrow().recent_logs(limit).to_vec()
    }

    fn modify(&self, apply: impl FnOnce(&mut Snapshot)) {
        self.snapshot_tx.send_modify(|current| {
            let mut next = Snapshot::clone(current);
            apply(&mut next);
            next.received_at = Utc::now();
            *current = Arc::new(next);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogLevel, MAX_LOG_ENTRIES};

    #[test]
    fn test_new_store_holds_default_snapshot() {
        let store = StateStore::new();
        assert_eq!(store.phase(), Phase::Idle);
        assert_eq!(store.progress(), 0.0);
        assert_eq!(store.flags(), SyncFlags::default());
    }

    #[test]
    fn test_publish_notifies_subscribers() {
        let store = StateStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.publish(Snapshot {
            phase: Phase::Coding,
            current_agent: Some(AgentId::Coder),
            ..Snapshot::default()
        });

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.phase, Phase::Coding);
        assert_eq!(store.current_agent(), Some(AgentId::Coder));
    }

    #[test]
    fn test_update_progress_clamps() {
        let store = StateStore::new();
        store.update_progress(150.0);
        assert_eq!(store.progress(), 100.0);
        store.update_progress(-5.0);
        assert_eq!(store.progress(), 0.0);
    }

    #[test]
    fn test_add_log_evicts_oldest() {
        let store = StateStore::new();
        for i in 0..(MAX_LOG_ENTRIES + 20) {
            store.add_log(LogEntry::new(
                AgentId::Organizer,
                format!("entry {}", i),
                LogLevel::Info,
            ));
        }

        let logs = store.logs(None);
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 20");
        assert_eq!(logs[MAX_LOG_ENTRIES - 1].message, "entry 119");
        assert_eq!(store.logs(Some(2)).len(), 2);
    }

    #[test]
    fn test_old_arcs_are_not_mutated() {
        let store = StateStore::new();
        let before = store.snapshot();
        store.set_phase(Phase::Verifying);
        assert_eq!(before.phase, Phase::Idle);
        assert_eq!(store.snapshot().phase, Phase::Verifying);
    }

    #[test]
    fn test_flags_only_notify_on_change() {
        let store = StateStore::new();
        let mut rx = store.subscribe_flags();

        store.set_loading(false);
        assert!(!rx.has_changed().unwrap());

        store.set_loading(true);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_loading);

        store.set_error(Some("HTTP error! status: 500".to_string()));
        assert_eq!(
            store.flags().error.as_deref(),
            Some("HTTP error! status: 500")
        );
    }

    #[test]
    fn test_loading_stays_set_until_last_fetch_ends() {
        let store = StateStore::new();
        let first = store.begin_fetch();
        let second = store.begin_fetch();
        assert!(store.flags().is_loading);

        drop(first);
        assert!(store.flags().is_loading);

        drop(second);
        assert!(!store.flags().is_loading);
    }

    #[test]
    fn test_publish_returns_the_published_arc() {
        let store = StateStore::new();
        let published = store.publish(Snapshot {
            phase: Phase::Maestro,
            ..Snapshot::default()
        });
        assert!(Arc::ptr_eq(&published, &store.snapshot()));

        store.set_phase(Phase::Completed);
        assert_eq!(published.phase, Phase::Maestro);
    }

    #[test]
    fn test_global_is_a_single_instance() {
        assert!(Arc::ptr_eq(&StateStore::global(), &StateStore::global()));
    }
}
