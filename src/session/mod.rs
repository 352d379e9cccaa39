//! Lifecycle of one remote desktop authoring task.
//!
//! ```text
//! Idle ──start──▶ Started ──capture──▶ CredentialsAssigned ──complete──▶ Completed
//!                    │                    │  ▲ capture (overwrite?)
//!                    └──────discard───────┴──┴────────────────────────▶ Discarded
//! ```
//!
//! `Completed` and `Discarded` behave like `Idle`: every field is cleared and
//! a new task may be started. A rejected operation never changes the session.

mod collaborators;


pub use collaborators::{Counter, Operator, TaskCounter, TaskSink};

use crate::error::DeskError;
use crate::script::{self, AssembleOptions, CompiledScript, SubtaskRegistry};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Shown in place of a credential field that is still empty.
pub const PLACEHOLDER: &str = "None";

pub const COMPUTER_PROMPT: &str = "[>] Enter the target IP address";
pub const USERNAME_PROMPT: &str = "[>] Enter the username to connect";
pub const PASSWORD_PROMPT: &str = "[>] Enter the connection password";
pub const OVERWRITE_PROMPT: &str = "[?] Overwrite stored credentials?";

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Started,
    CredentialsAssigned,
    Completed,
    Discarded,
}

impl LifecycleState {
    /// True while a task is being authored.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Started | Self::CredentialsAssigned)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Idle => write!(f, "idle"),
            LifecycleState::Started => write!(f, "started"),
            LifecycleState::CredentialsAssigned => write!(f, "credentials_assigned"),
            LifecycleState::Completed => write!(f, "completed"),
            LifecycleState::Discarded => write!(f, "discarded"),
        }
    }
}

/// Connection details typed into the remote desktop dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub computer: String,
    pub username: String,
    pub password: String,
}

/// Credential values prepared for display, with empty fields replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialView<'a> {
    pub computer: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> CredentialView<'a> {
    fn of(credentials: &'a Credentials) -> Self {
        Self {
            computer: or_placeholder(&credentials.computer),
            username: or_placeholder(&credentials.username),
            password: or_placeholder(&credentials.password),
        }
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() { PLACEHOLDER } else { value }
}

/// Operations attempted in the wrong state, or a prompt that failed.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("task RemoteDesktop_{0} is already running; complete or discard it first")]
    AlreadyRunning(u32),

    #[error("no RemoteDesktop task is running; start one with 'new'")]
    NotStarted,

    #[error("credentials must be assigned before the task can be completed")]
    CredentialsMissing,

    #[error(transparent)]
    Prompt(#[from] DeskError),
}

/// What a credential capture did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// First capture for this task.
    Captured,
    /// Operator agreed to replace the stored values.
    Overwritten,
    /// Operator declined; stored values untouched.
    Kept,
}

/// Result of a successful `complete`.
#[derive(Debug, Clone)]
pub struct CompletedTask {
    pub index: u32,
    pub script: CompiledScript,
    /// Subtask ids folded into the script, in call order.
    pub subtasks: Vec<String>,
}

/// One remote desktop interaction being authored.
#[derive(Debug, Default)]
pub struct Session {
    state: LifecycleState,
    task_index: Option<u32>,
    credentials: Credentials,
    credentials_assigned: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn task_index(&self) -> Option<u32> {
        self.task_index
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn credentials_assigned(&self) -> bool {
        self.credentials_assigned
    }

    /// Stored credentials, once a capture has happened.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials_assigned.then_some(&self.credentials)
    }

    /// Task key of the running task, e.g. `RemoteDesktop_3`.
    pub fn task_key(&self) -> Option<String> {
        self.task_index.map(script::template::function_name)
    }

    /// Begin a new task, taking its index from `counter`.
    pub fn start(&mut self, counter: &dyn Counter) -> Result<u32, SessionError> {
        if let Some(index) = self.task_index.filter(|_| self.is_active()) {
            warn!(index, "start rejected: task already running");
            return Err(SessionError::AlreadyRunning(index));
        }

        let index = counter.current();
        self.task_index = Some(index);
        self.credentials = Credentials::default();
        self.credentials_assigned = false;
        self.state = LifecycleState::Started;
        info!(index, "started RemoteDesktop task");
        Ok(index)
    }

    /// Prompt for computer, username and password.
    ///
    /// With credentials already stored the operator must confirm the
    /// overwrite first. Values are stored only after all three prompts have
    /// answered, so a failed prompt leaves the session unchanged.
    pub fn capture_credentials(
        &mut self,
        operator: &mut dyn Operator,
    ) -> Result<CaptureOutcome, SessionError> {
        if !self.is_active() {
            warn!("credential capture rejected: no task running");
            return Err(SessionError::NotStarted);
        }

        let outcome = if self.credentials_assigned {
            if !operator.confirm(OVERWRITE_PROMPT)? {
                info!("kept stored credentials");
                return Ok(CaptureOutcome::Kept);
            }
            CaptureOutcome::Overwritten
        } else {
            CaptureOutcome::Captured
        };

        let credentials = Credentials {
            computer: operator.input(COMPUTER_PROMPT)?,
            username: operator.input(USERNAME_PROMPT)?,
            password: operator.input(PASSWORD_PROMPT)?,
        };

        info!(
            computer = %credentials.computer,
            username = %credentials.username,
            overwrite = outcome == CaptureOutcome::Overwritten,
            "credentials captured"
        );
        self.credentials = credentials;
        self.credentials_assigned = true;
        self.state = LifecycleState::CredentialsAssigned;
        Ok(outcome)
    }

    /// Credentials for display, or `None` when none are assigned.
    pub fn show_credentials(&self) -> Option<CredentialView<'_>> {
        self.credentials().map(CredentialView::of)
    }

    /// Compile the task, hand it to `sink` and consume every subtask fragment.
    pub fn complete(
        &mut self,
        subtasks: &mut SubtaskRegistry,
        sink: &mut dyn TaskSink,
        options: AssembleOptions,
    ) -> Result<CompletedTask, SessionError> {
        let index = match self.task_index {
            Some(index) if self.credentials_assigned => index,
            _ => {
                warn!("complete rejected: credentials not assigned");
                return Err(SessionError::CredentialsMissing);
            }
        };

        let consumed: Vec<String> = subtasks.ids().map(str::to_string).collect();
        let compiled = script::assemble(index, &self.credentials, subtasks.checkout(), options);
        sink.add(&compiled.key, &compiled.text);
        info!(
            index,
            subtasks = consumed.len(),
            key = %compiled.key,
            "completed RemoteDesktop task"
        );

        self.clear(LifecycleState::Completed);
        Ok(CompletedTask {
            index,
            script: compiled,
            subtasks: consumed,
        })
    }

    /// Abandon the running task without producing a script.
    ///
    /// Subtask fragments stay registered for the next task.
    pub fn discard(&mut self) -> Result<u32, SessionError> {
        let index = match self.task_index {
            Some(index) if self.is_active() => index,
            _ => return Err(SessionError::NotStarted),
        };
        info!(index, "discarded RemoteDesktop task");
        self.clear(LifecycleState::Discarded);
        Ok(index)
    }

    fn clear(&mut self, state: LifecycleState) {
        self.task_index = None;
        self.credentials = Credentials::default();
        self.credentials_assigned = false;
        self.state = state;
    }
}
