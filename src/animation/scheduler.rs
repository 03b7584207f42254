//! Per-agent frame scheduler.
//!
//! Each [`AgentAnimator`] owns exactly one pending timer. A timer is a
//! spawned sleep that reports back through an unbounded channel as a
//! [`FrameTick`]; the owner feeds it to [`AgentAnimator::handle_tick`],
//! which advances the frame and re-arms. Every armed timer carries a fresh
//! generation number, and a tick whose generation is not the current one is
//! dropped. A status change or teardown therefore invalidates a fire that
//! is already queued.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::cue::{cue_for, AnimationCue, LoopPolicy, FALLBACK_FRAME};
use crate::models::{AgentId, AgentStatus};

/// A frame timer fired for `agent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    pub agent: AgentId,
    pub generation: u64,
}

/// Sending half handed to every animator of one owner.
pub type TickSender = mpsc::UnboundedSender<FrameTick>;

/// Receiving half the owner drains.
pub type TickReceiver = mpsc::UnboundedReceiver<FrameTick>;

/// Create the channel that routes frame timers back to their owner.
pub fn tick_channel() -> (TickSender, TickReceiver) {
    mpsc::unbounded_channel()
}

/// Animation state machine for one agent.
#[derive(Debug)]
pub struct AgentAnimator {
    agent: AgentId,
    cue: &'static AnimationCue,
    frame_index: usize,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tick_tx: TickSender,
}

impl AgentAnimator {
    /// Start animating `agent` on the cue for `status`.
    ///
    /// Must be called from within a tokio runtime; the first frame timer is
    /// armed immediately.
    pub fn new(agent: AgentId, status: AgentStatus, tick_tx: TickSender) -> Self {
        let mut animator = Self {
            agent,
            cue: cue_for(status),
            frame_index: 0,
            generation: 0,
            pending: None,
            tick_tx,
        };
        animator.arm();
        animator
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn active_status(&self) -> AgentStatus {
        self.cue.status
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Image reference of the frame on screen.
    pub fn current_frame(&self) -> &'static str {
        self.cue
            .frames
            .get(self.frame_index)
            .map(|frame| frame.image)
            .unwrap_or(FALLBACK_FRAME)
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some()
    }

    /// Switch to the cue for `status`.
    ///
    /// The same status again is a no-op: the frame index and the running
    /// timer are left alone. Returns whether a transition happened.
    pub fn set_status(&mut self, status: AgentStatus) -> bool {
        if status == self.cue.status {
            return false;
        }

        tracing::debug!(
            agent = %self.agent,
            from = %self.cue.status,
            to = %status,
            "Animation transition"
        );

        self.cancel();
        self.cue = cue_for(status);
        self.frame_index = 0;
        self.arm();
        true
    }

    /// Advance after a timer fire. Returns whether the visible frame changed.
    pub fn handle_tick(&mut self, tick: FrameTick) -> bool {
        if tick.agent != self.agent || tick.generation != self.generation || self.pending.is_none()
        {
            tracing::trace!(agent = %self.agent, generation = tick.generation, "Stale frame tick");
            return false;
        }
        self.pending = None;

        let next = self.frame_index + 1;
        if next < self.cue.len() {
            self.frame_index = next;
            self.arm();
            return true;
        }

        match self.cue.loop_policy {
            LoopPolicy::Loop => {
                let changed = self.frame_index != 0;
                self.frame_index = 0;
                self.arm();
                changed
            }
            LoopPolicy::HoldLast => {
                tracing::trace!(agent = %self.agent, "Holding last frame");
                self.frame_index = self.cue.len().saturating_sub(1);
                false
            }
        }
    }

    /// Cancel the pending timer and invalidate any queued fire.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    fn arm(&mut self) {
        let Some(frame) = self.cue.frames.get(self.frame_index) else {
            return;
        };

        self.generation = self.generation.wrapping_add(1);
        let tick = FrameTick {
            agent: self.agent,
            generation: self.generation,
        };
        let delay = frame.duration;
        let tick_tx = self.tick_tx.clone();

        tracing::trace!(
            agent = %self.agent,
            frame = self.frame_index,
            delay_ms = delay.as_millis() as u64,
            "Frame timer armed"
        );

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The owner may already be gone.
            let _ = tick_tx.send(tick);
        }));
    }
}

impl Drop for AgentAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}
