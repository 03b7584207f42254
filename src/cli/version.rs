//! Version and usage output.

/// The current version of m3-office, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "\
Usage: m3-office [OPTIONS]

Options:
  --url <URL>          State file URL (env M3_STATE_URL)
  --interval <MS>      Poll interval in milliseconds (env M3_POLL_INTERVAL_MS)
  --dump-dir <DIR>     Write monitor PNGs to DIR whenever they are redrawn
  --once               Fetch once, print a JSON summary and exit
  -V, --version        Print version
  -h, --help           Print this help";

/// Handle the --version command.
///
/// Prints the version string and exits successfully.
pub fn handle_version_command() -> ! {
    println!("m3-office {}", VERSION);
    std::process::exit(0)
}

pub fn handle_help_command() {
    println!("m3-office {}\n\n{}", VERSION, USAGE);
}
