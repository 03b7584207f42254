//! The office: every workstation, driven by the store and frame timers.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;

use super::station::{Workstation, WorkstationView};
use crate::animation::{tick_channel, FrameTick, TickReceiver};
use crate::error::RenderError;
use crate::models::{AgentId, Snapshot};
use crate::store::StateStore;

/// A workstation that could not be mounted.
#[derive(Debug, Clone, PartialEq)]
pub struct MountFailure {
    pub agent: AgentId,
    pub error: RenderError,
}

/// Receivers the run loop drains. Held from mount on, so nothing
/// published before the loop starts is missed.
#[derive(Debug)]
struct Inbox {
    snapshots: watch::Receiver<Arc<Snapshot>>,
    ticks: TickReceiver,
}

/// All mounted workstations plus the frame-tick channel they share.
#[derive(Debug)]
pub struct Office {
    store: Arc<StateStore>,
    stations: Vec<Workstation>,
    failures: Vec<MountFailure>,
    inbox: Option<Inbox>,
}

impl Office {
    /// Mount one workstation per agent and draw the current snapshot.
    ///
    /// A workstation whose surface cannot be acquired is logged and left
    /// out; the others mount normally. Must be called from within a tokio
    /// runtime.
    pub fn mount(store: Arc<StateStore>, width: u32, height: u32) -> Self {
        let (tick_tx, tick_rx) = tick_channel();
        let mut stations = Vec::with_capacity(AgentId::ALL.len());
        let mut failures = Vec::new();

        for agent in AgentId::ALL {
            match Workstation::mount(agent, width, height, tick_tx.clone()) {
                Ok(station) => stations.push(station),
                Err(error) => {
                    tracing::error!(
                        agent = %agent,
                        code = error.error_code(),
                        "Workstation failed to mount: {}",
                        error
                    );
                    failures.push(MountFailure { agent, error });
                }
            }
        }

        tracing::info!(
            mounted = stations.len(),
            failed = failures.len(),
            "Office mounted"
        );

        let mut snapshots = store.subscribe();
        let snapshot = snapshots.borrow_and_update().clone();
        let mut office = Self {
            store,
            stations,
            failures,
            inbox: Some(Inbox {
                snapshots,
                ticks: tick_rx,
            }),
        };
        office.apply_snapshot(&snapshot);
        office
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn stations(&self) -> &[Workstation] {
        &self.stations
    }

    pub fn station(&self, agent: AgentId) -> Option<&Workstation> {
        self.stations.iter().find(|station| station.agent() == agent)
    }

    pub fn failures(&self) -> &[MountFailure] {
        &self.failures
    }

    /// Push `snapshot` to every workstation. Returns how many redrew.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> usize {
        self.stations
            .iter_mut()
            .map(|station| station.apply_snapshot(snapshot))
            .filter(|redrawn| *redrawn)
            .count()
    }

    /// Route a frame tick to its workstation.
    pub fn handle_tick(&mut self, tick: FrameTick) -> bool {
        self.stations
            .iter_mut()
            .find(|station| station.agent() == tick.agent)
            .map(|station| station.handle_tick(tick))
            .unwrap_or(false)
    }

    pub fn views(&self) -> Vec<WorkstationView> {
        self.stations.iter().map(Workstation::view).collect()
    }

    /// Write every monitor to `dir/<agent>.png`.
    pub fn save_all(&self, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        let mut written = Vec::with_capacity(self.stations.len());
        for station in &self.stations {
            station.save_png(dir)?;
            written.push(dir.join(format!("{}.png", station.agent().as_str())));
        }
        Ok(written)
    }

    /// Write the monitors redrawn since the last call.
    pub fn save_dirty(&mut self, dir: &Path) -> Result<usize, RenderError> {
        let mut written = 0;
        for station in &mut self.stations {
            if station.surface_mut().take_dirty() {
                station.save_png(dir)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Follow store updates and frame timers until `shutdown` resolves.
    /// Updates published since mount or the previous run are picked up
    /// first. Redrawn monitors are written to `dump_dir` when one is given.
    pub async fn run_until<F>(&mut self, shutdown: F, dump_dir: Option<&Path>)
    where
        F: Future<Output = ()>,
    {
        let Some(mut inbox) = self.inbox.take() else {
            tracing::warn!("Office is already running");
            return;
        };
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Office shutting down");
                    break;
                }
                changed = inbox.snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = inbox.snapshots.borrow_and_update().clone();
                    let redrawn = self.apply_snapshot(&snapshot);
                    tracing::debug!(phase = %snapshot.phase, redrawn, "Snapshot applied");
                    if let Some(dir) = dump_dir {
                        if let Err(err) = self.save_dirty(dir) {
                            tracing::warn!("Failed to dump screens: {}", err);
                        }
                    }
                }
                Some(tick) = inbox.ticks.recv() => {
                    self.handle_tick(tick);
                }
            }
        }

        self.inbox = Some(inbox);
    }
}
