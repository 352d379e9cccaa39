//! Command implementations for deskscript.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. With no subcommand the interactive shell runs.

mod compose;

use crate::cli::Command;
use crate::config::Config;
use crate::error::Result;
use crate::shell::{Console, Shell};
use std::io::{self, IsTerminal};
use tracing::warn;

/// Dispatch a command to its implementation.
///
/// `color` is the effective setting after `--no-color` and config are merged.
pub fn dispatch(command: Option<Command>, config: Config, color: bool) -> Result<()> {
    match command.unwrap_or(Command::Shell) {
        Command::Shell => cmd_shell(config, color),
        Command::Compose(args) => compose::cmd_compose(args, &config),
    }
}

/// Execute the interactive shell on the controlling terminal.
fn cmd_shell(config: Config, color: bool) -> Result<()> {
    if !io::stdin().is_terminal() {
        warn!("stdin is not a terminal; credential prompts will fail, use 'compose' instead");
    }
    let mut shell = Shell::new(Console, io::stdout(), config, color);
    shell.run()
}
