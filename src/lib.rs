//! m3-office - live visualization of the M3 multi-agent pipeline
//!
//! Four workstations (organizer, coder, verifier, maestro) follow a polled
//! state file: each derives its status from the pipeline phase, animates a
//! sprite cue for it and renders a monitor texture.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod animation;
pub mod cli;
pub mod compositor;
pub mod config;
pub mod derive;
pub mod error;
pub mod models;
pub mod prelude;
pub mod store;
pub mod sync;
pub mod traits;
pub mod workstation;
