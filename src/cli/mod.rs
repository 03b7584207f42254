//! CLI module for m3-office.
//!
//! Argument parsing, version and usage output. Parsing happens before
//! logging and the runtime are set up:
//!
//! ```ignore
//! use m3_office::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args())? {
//!     CliCommand::Version => handle_version_command(),
//!     CliCommand::Help => handle_help_command(),
//!     CliCommand::Run(options) => { /* start the office */ }
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, RunOptions};
pub use version::{handle_help_command, handle_version_command, USAGE, VERSION};
