//! Implementation of the `deskscript compose` command.
//!
//! Runs one complete session without a terminal: values come from a YAML
//! profile and/or flags, and the script goes to a file or stdout.
//!
//! # Profile format
//!
//! ```yaml
//! computer: 10.0.0.5
//! username: alice
//! password: s3cr3t
//! index: 3
//! subtasks:
//!   Notepad_1: fragments/notepad.au3
//!   Sub_2: fragments/sub2.au3
//! ```
//!
//! Subtask paths in a profile are relative to the profile's directory.
//! Flags override profile values; `--subtask` entries are added after the
//! profile's subtasks.

use crate::cli::ComposeArgs;
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::events::{Event, EventAction, EventLog};
use crate::fs::atomic_write_file;
use crate::script::SubtaskRegistry;
use crate::session::{CompletedTask, Operator, Session, TaskCounter};
use crate::store::ScriptStore;
use serde::Deserialize;
use serde_json::json;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::info;

/// Contents of a compose profile file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub computer: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub index: Option<u32>,
    /// Subtask id to fragment path, in document order.
    pub subtasks: serde_yaml::Mapping,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DeskError::ConfigError(format!(
                "failed to read profile '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| DeskError::ConfigError(format!("failed to parse profile YAML: {}", e)))
    }

    /// Subtask entries as `(id, path)` with paths joined onto `base`.
    pub fn subtask_paths(&self, base: &Path) -> Result<Vec<(String, PathBuf)>> {
        self.subtasks
            .iter()
            .map(|(id, path)| {
                let id = id.as_str().ok_or_else(|| {
                    DeskError::ConfigError(format!("profile subtask id must be a string: {:?}", id))
                })?;
                let path = path.as_str().ok_or_else(|| {
                    DeskError::ConfigError(format!(
                        "profile subtask '{}' must map to a file path",
                        id
                    ))
                })?;
                Ok((id.to_string(), base.join(path)))
            })
            .collect()
    }
}

/// Answers the credential prompts from values known up front.
struct PresetOperator {
    answers: VecDeque<String>,
}

impl Operator for PresetOperator {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| DeskError::PromptError(format!("no value for '{}'", prompt)))
    }
}

/// Execute the `deskscript compose` command.
pub fn cmd_compose(args: ComposeArgs, config: &Config) -> Result<()> {
    let completed = compose(&args, config)?;

    match &args.output {
        Some(path) => {
            atomic_write_file(path, &completed.script.text)?;
            println!("Wrote {} to {}", completed.script.key, path.display());
        }
        None => print!("{}", completed.script),
    }
    Ok(())
}

/// Compile one task from `args` merged over its profile.
pub fn compose(args: &ComposeArgs, config: &Config) -> Result<CompletedTask> {
    let (profile, base) = match &args.profile {
        Some(path) => {
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (Profile::load(path)?, base)
        }
        None => (Profile::default(), PathBuf::new()),
    };

    let index = args
        .index
        .or(profile.index)
        .unwrap_or(config.first_task_index);
    if index == 0 {
        return Err(DeskError::UserError(
            "task index must be greater than 0".to_string(),
        ));
    }

    let computer = args
        .computer
        .clone()
        .or_else(|| profile.computer.clone())
        .ok_or_else(|| {
            DeskError::UserError(
                "no target computer given; pass --computer or set 'computer' in the profile"
                    .to_string(),
            )
        })?;
    let username = args
        .username
        .clone()
        .or_else(|| profile.username.clone())
        .unwrap_or_default();
    let password = args
        .password
        .clone()
        .or_else(|| profile.password.clone())
        .unwrap_or_default();

    let mut subtasks = SubtaskRegistry::new();
    for (id, path) in profile.subtask_paths(&base)? {
        subtasks.load_file(&id, &path)?;
    }
    if let Some(dir) = &args.subtask_dir {
        subtasks.load_dir(dir, &config.fragment_glob)?;
    }
    for entry in &args.subtasks {
        let (id, path) = parse_subtask_arg(entry)?;
        subtasks.load_file(id, path)?;
    }

    let mut session = Session::new();
    session.start(&TaskCounter::starting_at(index))?;
    let mut operator = PresetOperator {
        answers: VecDeque::from([computer, username, password]),
    };
    session.capture_credentials(&mut operator)?;

    let mut store = ScriptStore::new();
    let completed = session.complete(&mut subtasks, &mut store, config.assemble_options())?;
    info!(key = %completed.script.key, "composed script");

    if let Some(path) = &config.events_file {
        EventLog::new(path).record(
            &Event::new(EventAction::Complete)
                .with_task(completed.script.key.as_str())
                .with_details(json!({ "subtasks": completed.subtasks, "mode": "compose" })),
        );
    }

    Ok(completed)
}

/// Split an `ID=PATH` argument.
fn parse_subtask_arg(entry: &str) -> Result<(&str, &Path)> {
    match entry.split_once('=') {
        Some((id, path)) if !id.is_empty() && !path.is_empty() => Ok((id, Path::new(path))),
        _ => Err(DeskError::UserError(format!(
            "invalid --subtask '{}': expected ID=PATH",
            entry
        ))),
    }
}
