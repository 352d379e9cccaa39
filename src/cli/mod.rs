//! CLI argument parsing for deskscript.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// deskscript: author remote desktop interactions and compile them to AutoIt.
///
/// The interactive shell walks through starting a task, capturing the
/// connection credentials and attaching subtask fragments, then emits one
/// AutoIt script per completed task.
#[derive(Parser, Debug)]
#[command(name = "deskscript")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML config file (default: ./deskscript.yaml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug diagnostics on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Diagnostic filter (e.g. "info", "deskscript=debug").
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for deskscript.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the interactive authoring shell (default).
    Shell,

    /// Compile one task without prompting.
    ///
    /// Values come from a YAML profile, from flags, or both (flags win).
    Compose(ComposeArgs),
}

/// Arguments for the `compose` command.
#[derive(Parser, Debug, Default)]
pub struct ComposeArgs {
    /// YAML profile with computer, username, password, index and subtasks.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Target computer (IP address or host name).
    #[arg(long)]
    pub computer: Option<String>,

    /// Username typed into the connection dialog.
    #[arg(long)]
    pub username: Option<String>,

    /// Password typed into the connection dialog.
    #[arg(long)]
    pub password: Option<String>,

    /// Task index (default: config first_task_index).
    #[arg(long)]
    pub index: Option<u32>,

    /// Subtask fragment as ID=PATH. Repeatable; order is kept.
    #[arg(long = "subtask", value_name = "ID=PATH")]
    pub subtasks: Vec<String>,

    /// Directory of fragment files matching the config fragment_glob.
    #[arg(long)]
    pub subtask_dir: Option<PathBuf>,

    /// Write the script here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
