//! deskscript: author remote desktop interactions as AutoIt scripts.
//!
//! This is the main entry point for the `deskscript` CLI. It parses
//! arguments, loads configuration, installs logging, dispatches to the
//! appropriate command handler, and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod logging;
pub mod script;
pub mod session;
pub mod shell;
pub mod store;

use cli::Cli;
use config::Config;
use error::{DeskError, Result};
use logging::LoggingOptions;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init_logging(&LoggingOptions {
        level: cli.log_level.clone(),
        verbose: cli.verbose,
        color: !cli.no_color,
    })?;

    let cwd = std::env::current_dir()
        .map_err(|e| DeskError::IoError(format!("failed to read working directory: {}", e)))?;
    let config = Config::resolve(cli.config.as_deref(), &cwd)?;
    let color = config.color && !cli.no_color;

    commands::dispatch(cli.command, config, color)
}
