//! Status derivation.
//!
//! Two mappings live here and are deliberately kept apart:
//!
//! - [`derive_status`] is the strict phase table. It never yields
//!   [`AgentStatus::Thinking`].
//! - [`animation_state_for`] maps a status to the avatar pose used by the
//!   3D avatar layer. `Thinking` only reaches it from status values that
//!   were set by something other than the phase table.

use serde::Serialize;

use crate::models::{AgentId, AgentStatus, Phase, Snapshot};

/// Map the global phase to one agent's visual status.
///
/// | phase | status |
/// |---|---|
/// | organizing / coding / verifying / maestro | `working` for the owning agent, `idle` otherwise |
/// | completed | `completed` for everyone |
/// | error | `error` for everyone |
/// | anything else | `idle` |
pub fn derive_status(phase: &Phase, agent: AgentId) -> AgentStatus {
    let working_if = |owner: AgentId| {
        if agent == owner {
            AgentStatus::Working
        } else {
            AgentStatus::Idle
        }
    };

    match phase {
        Phase::Organizing => working_if(AgentId::Organizer),
        Phase::Coding => working_if(AgentId::Coder),
        Phase::Verifying => working_if(AgentId::Verifier),
        Phase::Maestro => working_if(AgentId::Maestro),
        Phase::Completed => AgentStatus::Completed,
        Phase::Error => AgentStatus::Error,
        Phase::Idle | Phase::Other(_) => AgentStatus::Idle,
    }
}

/// [`derive_status`] for every agent of a snapshot, in workstation order.
pub fn derive_all(snapshot: &Snapshot) -> [(AgentId, AgentStatus); 4] {
    AgentId::ALL.map(|agent| (agent, derive_status(&snapshot.phase, agent)))
}

/// Avatar pose, used by the 3D avatar rather than the sprite cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    Idle,
    Typing,
    Thinking,
    Completed,
    Error,
}

/// Map a status to the avatar pose.
pub fn animation_state_for(status: AgentStatus) -> AnimationState {
    match status {
        AgentStatus::Working => AnimationState::Typing,
        AgentStatus::Thinking => AnimationState::Thinking,
        AgentStatus::Completed => AnimationState::Completed,
        AgentStatus::Error => AnimationState::Error,
        AgentStatus::Idle => AnimationState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_of(phase: &Phase) -> Option<AgentId> {
        match phase {
            Phase::Organizing => Some(AgentId::Organizer),
            Phase::Coding => Some(AgentId::Coder),
            Phase::Verifying => Some(AgentId::Verifier),
            Phase::Maestro => Some(AgentId::Maestro),
            _ => None,
        }
    }

    #[test]
    fn test_working_phases_light_up_their_owner_only() {
        for phase in [
            Phase::Organizing,
            Phase::Coding,
            Phase::Verifying,
            Phase::Maestro,
        ] {
            let owner = owner_of(&phase).unwrap();
            for agent in AgentId::ALL {
                let expected = if agent == owner {
                    AgentStatus::Working
                } else {
                    AgentStatus::Idle
                };
                assert_eq!(
                    derive_status(&phase, agent),
                    expected,
                    "phase {} agent {}",
                    phase,
                    agent
                );
            }
        }
    }

    #[test]
    fn test_terminal_phases_apply_to_everyone() {
        for agent in AgentId::ALL {
            assert_eq!(
                derive_status(&Phase::Completed, agent),
                AgentStatus::Completed
            );
            assert_eq!(derive_status(&Phase::Error, agent), AgentStatus::Error);
        }
    }

    #[test]
    fn test_idle_and_unknown_phases_are_idle() {
        for agent in AgentId::ALL {
            assert_eq!(derive_status(&Phase::Idle, agent), AgentStatus::Idle);
            assert_eq!(
                derive_status(&Phase::parse("deploying"), agent),
                AgentStatus::Idle
            );
            assert_eq!(derive_status(&Phase::parse(""), agent), AgentStatus::Idle);
        }
    }

    #[test]
    fn test_phase_table_never_yields_thinking() {
        let phases = [
            Phase::Idle,
            Phase::Organizing,
            Phase::Coding,
            Phase::Verifying,
            Phase::Maestro,
            Phase::Completed,
            Phase::Error,
            Phase::Other("planning".to_string()),
        ];
        for phase in &phases {
            for agent in AgentId::ALL {
                assert_ne!(derive_status(phase, agent), AgentStatus::Thinking);
            }
        }
    }

    #[test]
    fn test_derive_all_follows_workstation_order() {
        let snapshot = Snapshot {
            phase: Phase::Verifying,
            ..Snapshot::default()
        };
        let statuses = derive_all(&snapshot);
        assert_eq!(statuses[0], (AgentId::Organizer, AgentStatus::Idle));
        assert_eq!(statuses[2], (AgentId::Verifier, AgentStatus::Working));
    }

    #[test]
    fn test_animation_mapper_reaches_thinking() {
        assert_eq!(
            animation_state_for(AgentStatus::Working),
            AnimationState::Typing
        );
        assert_eq!(
            animation_state_for(AgentStatus::Thinking),
            AnimationState::Thinking
        );
        assert_eq!(animation_state_for(AgentStatus::Idle), AnimationState::Idle);
    }
}
