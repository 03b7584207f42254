//! Agent identities and their derived visual status.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::palette::{
    Color, STATUS_COMPLETED, STATUS_ERROR, STATUS_IDLE, STATUS_THINKING, STATUS_WORKING,
};

/// One of the four fixed pipeline agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentId {
    Organizer,
    Coder,
    Verifier,
    Maestro,
}

/// Colour triple used for an agent's desk, avatar and screen label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentColor {
    pub primary: Color,
    pub secondary: Color,
    pub glow: Color,
}

impl AgentId {
    /// Every agent, in workstation order.
    pub const ALL: [AgentId; 4] = [
        AgentId::Organizer,
        AgentId::Coder,
        AgentId::Verifier,
        AgentId::Maestro,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentId::Organizer => "organizer",
            AgentId::Coder => "coder",
            AgentId::Verifier => "verifier",
            AgentId::Maestro => "maestro",
        }
    }

    /// Parse a wire name; anything outside the closed set is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "organizer" => Some(AgentId::Organizer),
            "coder" => Some(AgentId::Coder),
            "verifier" => Some(AgentId::Verifier),
            "maestro" => Some(AgentId::Maestro),
            _ => None,
        }
    }

    /// Position in [`AgentId::ALL`].
    pub fn index(self) -> usize {
        match self {
            AgentId::Organizer => 0,
            AgentId::Coder => 1,
            AgentId::Verifier => 2,
            AgentId::Maestro => 3,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AgentId::Organizer => "Organizer",
            AgentId::Coder => "Coder",
            AgentId::Verifier => "Verifier",
            AgentId::Maestro => "Maestro",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgentId::Organizer => "Analisa requisitos e planeja a implementação",
            AgentId::Coder => "Implementa código e soluções técnicas",
            AgentId::Verifier => "Testa e verifica a qualidade do código",
            AgentId::Maestro => "Coordena e supervisiona todo o processo",
        }
    }

    pub fn colors(self) -> AgentColor {
        match self {
            AgentId::Organizer => AgentColor {
                primary: Color::hex(0x3B82F6),
                secondary: Color::hex(0x1D4ED8),
                glow: Color::hex(0x60A5FA),
            },
            AgentId::Coder => AgentColor {
                primary: Color::hex(0x10B981),
                secondary: Color::hex(0x047857),
                glow: Color::hex(0x34D399),
            },
            AgentId::Verifier => AgentColor {
                primary: Color::hex(0x8B5CF6),
                secondary: Color::hex(0x6D28D9),
                glow: Color::hex(0xA78BFA),
            },
            AgentId::Maestro => AgentColor {
                primary: Color::hex(0xF59E0B),
                secondary: Color::hex(0xB45309),
                glow: Color::hex(0xFBBF24),
            },
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-agent visual status. Never stored; always derived from the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Working,
    Thinking,
    Completed,
    Error,
}

impl AgentStatus {
    pub const ALL: [AgentStatus; 5] = [
        AgentStatus::Idle,
        AgentStatus::Working,
        AgentStatus::Thinking,
        AgentStatus::Completed,
        AgentStatus::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Working => "working",
            AgentStatus::Thinking => "thinking",
            AgentStatus::Completed => "completed",
            AgentStatus::Error => "error",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AgentStatus::Idle => "Inativo",
            AgentStatus::Working => "Trabalhando",
            AgentStatus::Thinking => "Pensando",
            AgentStatus::Completed => "Completado",
            AgentStatus::Error => "Erro",
        }
    }

    /// Colour of the status light, screen border and status dot.
    pub fn color(self) -> Color {
        match self {
            AgentStatus::Idle => STATUS_IDLE,
            AgentStatus::Working => STATUS_WORKING,
            AgentStatus::Thinking => STATUS_THINKING,
            AgentStatus::Completed => STATUS_COMPLETED,
            AgentStatus::Error => STATUS_ERROR,
        }
    }

    /// Whether the status light pulses, and at what period.
    pub fn pulse_period_ms(self) -> Option<u64> {
        match self {
            AgentStatus::Working => Some(800),
            AgentStatus::Error => Some(200),
            _ => None,
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
