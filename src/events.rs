//! Audit event log for deskscript.
//!
//! Session transitions are appended to an NDJSON file (one JSON object per
//! line) when `events_file` is configured.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: start, credentials, complete, discard, subtask_add
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `task`: optional task key (e.g., `RemoteDesktop_3`)
//! - `details`: freeform object with action-specific details
//!
//! Passwords are never written to the log.

use crate::error::{DeskError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Task started (Idle -> Started)
    Start,
    /// Credentials captured or overwritten
    Credentials,
    /// Task compiled (-> Completed)
    Complete,
    /// Task abandoned (-> Discarded)
    Discard,
    /// Subtask fragment registered
    SubtaskAdd,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Start => write!(f, "start"),
            EventAction::Credentials => write!(f, "credentials"),
            EventAction::Complete => write!(f, "complete"),
            EventAction::Discard => write!(f, "discard"),
            EventAction::SubtaskAdd => write!(f, "subtask_add"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Optional task key for task-specific events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    ///
    /// The timestamp is set to the current time, and the actor is
    /// determined from the environment (USER@HOSTNAME).
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            task: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the task key for this event.
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| DeskError::IoError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append-only NDJSON event file.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event as one JSON line, creating the file and its parent
    /// directory if needed.
    pub fn append(&self, event: &Event) -> Result<()> {
        let json_line = event.to_ndjson_line()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                DeskError::IoError(format!(
                    "failed to create events directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                DeskError::IoError(format!(
                    "failed to open events file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", json_line).map_err(|e| {
            DeskError::IoError(format!(
                "failed to write event to '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        file.sync_all().map_err(|e| {
            DeskError::IoError(format!(
                "failed to sync events file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Append an event; a failed append is logged and otherwise ignored.
    pub fn record(&self, event: &Event) {
        if let Err(e) = self.append(event) {
            warn!(path = %self.path.display(), action = %event.action, "event not recorded: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Start);

        assert_eq!(event.action, EventAction::Start);
        assert!(!event.actor.is_empty());
        assert!(event.task.is_none());
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_with_task_and_details() {
        let event = Event::new(EventAction::Complete)
            .with_task("RemoteDesktop_3")
            .with_details(json!({"subtasks": ["Sub_1"]}));

        assert_eq!(event.task, Some("RemoteDesktop_3".to_string()));
        assert_eq!(event.details["subtasks"][0], "Sub_1");
    }

    #[test]
    fn test_event_serialization_is_single_line() {
        let event = Event::new(EventAction::SubtaskAdd)
            .with_details(json!({"subtask": "Notepad_2", "source": "a\nb"}));

        let json_line = event.to_ndjson_line().unwrap();
        assert!(!json_line.contains('\n'));
        assert!(json_line.contains("\"subtask_add\""));

        let parsed: Event = serde_json::from_str(&json_line).unwrap();
        assert_eq!(parsed.action, EventAction::SubtaskAdd);
    }

    #[test]
    fn test_event_without_task_omits_field() {
        let json_line = Event::new(EventAction::Discard).to_ndjson_line().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json_line).unwrap();
        assert!(parsed.get("task").is_none());
    }

    #[test]
    fn test_append_creates_file_and_parent_dir() {
        let temp = TempDir::new().unwrap();
        let log = EventLog::new(temp.path().join("audit").join("events.ndjson"));
        assert!(!log.path().exists());

        log.append(&Event::new(EventAction::Start).with_task("RemoteDesktop_1"))
            .unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.ends_with('\n'));
        let parsed: Event = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(parsed.action, EventAction::Start);
    }

    #[test]
    fn test_append_multiple_lines_in_order() {
        let temp = TempDir::new().unwrap();
        let log = EventLog::new(temp.path().join("events.ndjson"));

        log.append(&Event::new(EventAction::Start)).unwrap();
        log.append(&Event::new(EventAction::Credentials)).unwrap();
        log.append(&Event::new(EventAction::Complete)).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let actions: Vec<EventAction> = content
            .lines()
            .map(|l| serde_json::from_str::<Event>(l).unwrap().action)
            .collect();
        assert_eq!(
            actions,
            vec![
                EventAction::Start,
                EventAction::Credentials,
                EventAction::Complete
            ]
        );
    }

    #[test]
    fn test_record_swallows_failures() {
        let temp = TempDir::new().unwrap();
        // A directory cannot be opened for appending.
        let log = EventLog::new(temp.path());
        log.record(&Event::new(EventAction::Discard));
        assert!(temp.path().is_dir());
    }

    #[test]
    fn test_event_action_display() {
        assert_eq!(format!("{}", EventAction::Start), "start");
        assert_eq!(format!("{}", EventAction::Credentials), "credentials");
        assert_eq!(format!("{}", EventAction::Complete), "complete");
        assert_eq!(format!("{}", EventAction::Discard), "discard");
        assert_eq!(format!("{}", EventAction::SubtaskAdd), "subtask_add");
    }

    #[test]
    fn test_get_actor_string() {
        let actor = get_actor_string();
        assert!(actor.contains('@'));
    }
}
