//! Sprite animation: which frame each agent shows, and when it changes.

mod cue;
mod scheduler;

pub use cue::{cue_for, AnimationCue, Frame, LoopPolicy, FALLBACK_FRAME};
pub use scheduler::{tick_channel, AgentAnimator, FrameTick, TickReceiver, TickSender};
