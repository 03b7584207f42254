//! Global pipeline phase reported by the state file.

use serde::{Serialize, Serializer};
use std::fmt;

/// Coarse pipeline stage.
///
/// Unknown wire values are kept verbatim in [`Phase::Other`] so they can
/// still be displayed; every consumer treats them like `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Organizing,
    Coding,
    Verifying,
    Maestro,
    Completed,
    Error,
    Other(String),
}

impl Phase {
    /// Parse a wire value. Never fails.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "idle" => Phase::Idle,
            "organizing" => Phase::Organizing,
            "coding" => Phase::Coding,
            "verifying" => Phase::Verifying,
            "maestro" => Phase::Maestro,
            "completed" => Phase::Completed,
            "error" => Phase::Error,
            other => Phase::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Phase::Idle => "idle",
            Phase::Organizing => "organizing",
            Phase::Coding => "coding",
            Phase::Verifying => "verifying",
            Phase::Maestro => "maestro",
            Phase::Completed => "completed",
            Phase::Error => "error",
            Phase::Other(raw) => raw,
        }
    }

    /// Human-readable phase name; unknown phases show their raw value.
    pub fn display_name(&self) -> &str {
        match self {
            Phase::Idle => "Aguardando",
            Phase::Organizing => "Organizando",
            Phase::Coding => "Codificando",
            Phase::Verifying => "Verificando",
            Phase::Maestro => "Supervisão",
            Phase::Completed => "Concluído",
            Phase::Error => "Erro",
            Phase::Other(raw) => raw,
        }
    }

    /// True once the pipeline has stopped, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Error)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
