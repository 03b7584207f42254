//! Sprite cues per status.

use std::time::Duration;

use serde::Serialize;

use crate::models::AgentStatus;

/// Frame shown when a cue has no frame at the requested index.
pub const FALLBACK_FRAME: &str = "/sprites/idle-1.svg";

/// One sprite and how long it stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub image: &'static str,
    pub duration: Duration,
}

/// What happens after the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopPolicy {
    /// Wrap to the first frame and keep going.
    Loop,
    /// Stay on the last frame and stop scheduling.
    HoldLast,
}

/// Ordered frames for one status.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct AnimationCue {
    pub status: AgentStatus,
    pub frames: &'static [Frame],
    pub loop_policy: LoopPolicy,
}

impl AnimationCue {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total time of one pass through the cue.
    pub fn cycle_duration(&self) -> Duration {
        self.frames.iter().map(|frame| frame.duration).sum()
    }
}

const fn frame(image: &'static str, millis: u64) -> Frame {
    Frame {
        image,
        duration: Duration::from_millis(millis),
    }
}

static IDLE: AnimationCue = AnimationCue {
    status: AgentStatus::Idle,
    frames: &[
        frame("/sprites/idle-1.svg", 1000),
        frame("/sprites/idle-2.svg", 1000),
    ],
    loop_policy: LoopPolicy::Loop,
};

static WORKING: AnimationCue = AnimationCue {
    status: AgentStatus::Working,
    frames: &[
        frame("/sprites/typing-1.svg", 150),
        frame("/sprites/typing-2.svg", 150),
        frame("/sprites/typing-3.svg", 150),
        frame("/sprites/typing-4.svg", 150),
    ],
    loop_policy: LoopPolicy::Loop,
};

static THINKING: AnimationCue = AnimationCue {
    status: AgentStatus::Thinking,
    frames: &[
        frame("/sprites/thinking-1.svg", 800),
        frame("/sprites/thinking-2.svg", 800),
        frame("/sprites/thinking-3.svg", 800),
    ],
    loop_policy: LoopPolicy::Loop,
};

static COMPLETED: AnimationCue = AnimationCue {
    status: AgentStatus::Completed,
    frames: &[
        frame("/sprites/completed-1.svg", 200),
        frame("/sprites/completed-2.svg", 200),
        frame("/sprites/completed-3.svg", 200),
        frame("/sprites/completed-4.svg", 2000),
    ],
    loop_policy: LoopPolicy::HoldLast,
};

static ERROR: AnimationCue = AnimationCue {
    status: AgentStatus::Error,
    frames: &[
        frame("/sprites/error-1.svg", 300),
        frame("/sprites/error-2.svg", 300),
    ],
    loop_policy: LoopPolicy::Loop,
};

/// The cue played while an agent is in `status`.
pub fn cue_for(status: AgentStatus) -> &'static AnimationCue {
    match status {
        AgentStatus::Idle => &IDLE,
        AgentStatus::Working => &WORKING,
        AgentStatus::Thinking => &THINKING,
        AgentStatus::Completed => &COMPLETED,
        AgentStatus::Error => &ERROR,
    }
}
