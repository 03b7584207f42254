//! One agent's desk: animator plus monitor.

use std::path::Path;

use serde::Serialize;

use crate::animation::{AgentAnimator, FrameTick, TickSender};
use crate::compositor::{create_surface, terminal_lines, ScreenCompositor, Surface};
use crate::derive::{animation_state_for, derive_status, AnimationState};
use crate::error::RenderError;
use crate::models::{AgentId, AgentStatus, Color, ScreenContent, Snapshot};

/// Inputs that trigger a monitor redraw when they change.
#[derive(Debug, Clone, PartialEq)]
struct ScreenKey {
    status: AgentStatus,
    progress: f64,
    title: String,
    subtitle: Option<String>,
}

/// Serializable view of a workstation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkstationView {
    pub agent: AgentId,
    pub status: AgentStatus,
    pub pose: AnimationState,
    pub is_active: bool,
    pub frame: &'static str,
    pub frame_index: usize,
    pub status_color: Color,
    pub pulse_period_ms: Option<u64>,
    pub title: String,
    pub progress: f64,
}

#[derive(Debug)]
pub struct Workstation {
    agent: AgentId,
    animator: AgentAnimator,
    surface: Surface,
    compositor: ScreenCompositor,
    content: ScreenContent,
    last_key: Option<ScreenKey>,
    is_active: bool,
}

impl Workstation {
    /// Acquire the monitor surface, draw the ready screen and start the
    /// idle animation.
    ///
    /// Fails without arming any timer when the surface cannot be created.
    pub fn mount(
        agent: AgentId,
        width: u32,
        height: u32,
        tick_tx: TickSender,
    ) -> Result<Self, RenderError> {
        let mut surface = create_surface(width, height)?;
        let compositor = ScreenCompositor::for_surface(&surface);
        let content = ScreenContent::ready(agent);
        compositor.render(&mut surface, agent, &content);

        tracing::debug!(agent = %agent, width, height, "Workstation mounted");

        Ok(Self {
            agent,
            animator: AgentAnimator::new(agent, AgentStatus::Idle, tick_tx),
            surface,
            compositor,
            content,
            last_key: None,
            is_active: false,
        })
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn status(&self) -> AgentStatus {
        self.animator.active_status()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn animator(&self) -> &AgentAnimator {
        &self.animator
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn content(&self) -> &ScreenContent {
        &self.content
    }

    /// Derive this agent's status from `snapshot`, update the animation and
    /// redraw the monitor if anything it shows changed.
    ///
    /// Returns whether the monitor was redrawn.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> bool {
        let status = derive_status(&snapshot.phase, self.agent);
        self.is_active = snapshot.is_active(self.agent);
        self.animator.set_status(status);

        let attempts = snapshot.attempts.get(self.agent);
        let key = ScreenKey {
            status,
            progress: snapshot.progress,
            title: snapshot.task.clone(),
            subtitle: (attempts > 0).then(|| format!("Tentativa {}", attempts)),
        };
        if self.last_key.as_ref() == Some(&key) {
            return false;
        }

        let mut content = ScreenContent::new(key.title.clone(), status, key.progress)
            .with_lines(terminal_lines(status, self.agent));
        content.subtitle = key.subtitle.clone();

        self.compositor
            .render(&mut self.surface, self.agent, &content);
        self.content = content;
        self.last_key = Some(key);
        true
    }

    /// Forward a frame timer fire. Returns whether the frame changed.
    pub fn handle_tick(&mut self, tick: FrameTick) -> bool {
        self.animator.handle_tick(tick)
    }

    pub fn view(&self) -> WorkstationView {
        let status = self.status();
        WorkstationView {
            agent: self.agent,
            status,
            pose: animation_state_for(status),
            is_active: self.is_active,
            frame: self.animator.current_frame(),
            frame_index: self.animator.frame_index(),
            status_color: status.color(),
            pulse_period_ms: status.pulse_period_ms(),
            title: self.content.title.clone(),
            progress: self.content.progress,
        }
    }

    /// Write the monitor to `dir/<agent>.png`.
    pub fn save_png(&self, dir: &Path) -> Result<(), RenderError> {
        self.surface
            .save_png(&dir.join(format!("{}.png", self.agent.as_str())))
    }
}
