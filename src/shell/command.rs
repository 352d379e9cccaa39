//! Parsing of interactive shell lines.

use crate::error::{DeskError, Result};
use std::path::PathBuf;

/// One line typed at the shell prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    New,
    Credentials,
    ShowCredentials,
    Subtask { id: String, path: PathBuf },
    SubtaskDir { dir: PathBuf },
    Assigned,
    Complete,
    Discard,
    Tasks,
    Help,
    Exit,
    Unknown(String),
}

impl ShellCommand {
    /// Tokenize `line` with shell quoting rules.
    ///
    /// Blank lines parse to `None`. Arity mistakes are user errors; an
    /// unrecognized word is returned as `Unknown` so the shell can warn.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let words = shell_words::split(line)
            .map_err(|e| DeskError::UserError(format!("could not parse '{}': {}", line, e)))?;

        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match name.as_str() {
            "new" => no_args(name, args, Self::New)?,
            "credentials" => no_args(name, args, Self::Credentials)?,
            "show_credentials" => no_args(name, args, Self::ShowCredentials)?,
            "subtask" => match args {
                [id, path] => Self::Subtask {
                    id: id.clone(),
                    path: PathBuf::from(path),
                },
                _ => return Err(usage("subtask <id> <file>")),
            },
            "subtask-dir" => match args {
                [dir] => Self::SubtaskDir {
                    dir: PathBuf::from(dir),
                },
                _ => return Err(usage("subtask-dir <dir>")),
            },
            "assigned" => Self::Assigned,
            "complete" => no_args(name, args, Self::Complete)?,
            "discard" => no_args(name, args, Self::Discard)?,
            "tasks" => Self::Tasks,
            "help" | "?" => Self::Help,
            "exit" | "quit" | "back" => Self::Exit,
            other => Self::Unknown(other.to_string()),
        };
        Ok(Some(command))
    }
}

fn no_args(name: &str, args: &[String], command: ShellCommand) -> Result<ShellCommand> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(DeskError::UserError(format!(
            "'{}' takes no arguments (got {})",
            name,
            args.len()
        )))
    }
}

fn usage(text: &str) -> DeskError {
    DeskError::UserError(format!("usage: {}", text))
}

/// Text printed by `help`.
pub const HELP_TEXT: &str = "\
Commands
  new                    start a new RemoteDesktop task
  credentials            enter computer, username and password
  show_credentials       show the stored credentials
  subtask <id> <file>    attach an AutoIt fragment as a subtask
  subtask-dir <dir>      attach every matching fragment in a directory
  assigned               list attached subtasks
  complete               compile the task into a script
  discard                abandon the running task
  tasks                  list compiled scripts
  help, ?                show this help
  exit, quit, back       leave the shell
";
