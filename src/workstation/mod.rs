//! Workstations: status derivation, animation and monitor per agent.

mod office;
mod station;

pub use office::{MountFailure, Office};
pub use station::{Workstation, WorkstationView};
