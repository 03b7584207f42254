//! Command-line argument parsing for m3-office.
//!
//! This module handles parsing command-line arguments and determining
//! which command to execute.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::parse_interval_ms;
use crate::error::ConfigError;

/// Overrides and mode switches for a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub url: Option<String>,
    pub interval: Option<Duration>,
    pub dump_dir: Option<PathBuf>,
    /// Fetch once, print a summary and exit.
    pub once: bool,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the office (default)
    Run(RunOptions),
}

/// Parse command-line arguments and return the appropriate command.
///
/// Flags taking a value accept both `--flag value` and `--flag=value`.
/// Unknown arguments are ignored.
///
/// # Examples
///
/// ```
/// use m3_office::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["m3-office".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap(), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ConfigError>
where
    I: Iterator<Item = String>,
{
    let mut options = RunOptions::default();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |flag: &str| {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| ConfigError::MissingValue {
                    flag: flag.to_string(),
                })
        };

        match flag.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--once" => options.once = true,
            "--url" => options.url = Some(value("--url")?),
            "--interval" => {
                let raw = value("--interval")?;
                options.interval = Some(parse_interval_ms("--interval", &raw)?);
            }
            "--dump-dir" => options.dump_dir = Some(PathBuf::from(value("--dump-dir")?)),
            _ => {}
        }
    }

    Ok(CliCommand::Run(options))
}
