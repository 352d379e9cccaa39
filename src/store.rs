//! In-memory registry of compiled task scripts.

use crate::error::Result;
use crate::fs::atomic_write_file;
use crate::session::TaskSink;
use std::path::{Path, PathBuf};
use tracing::info;

/// Compiled scripts keyed by task name (`RemoteDesktop_<n>`), in the order
/// they were first added.
#[derive(Debug, Default)]
pub struct ScriptStore {
    scripts: Vec<(String, String)>,
}

impl ScriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.scripts
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, script)| script.as_str())
    }

    /// Task keys in completion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Write one stored script to `dir/<key>.<extension>`.
    ///
    /// Returns `None` when no script is stored under `key`.
    pub fn write_one(&self, key: &str, dir: &Path, extension: &str) -> Result<Option<PathBuf>> {
        let Some(script) = self.get(key) else {
            return Ok(None);
        };
        let path = script_path(dir, key, extension);
        atomic_write_file(&path, script)?;
        info!(path = %path.display(), "wrote script");
        Ok(Some(path))
    }
}

impl TaskSink for ScriptStore {
    /// An existing key keeps its position and takes the new script.
    fn add(&mut self, key: &str, script: &str) {
        match self.scripts.iter_mut().find(|(existing, _)| existing == key) {
            Some(slot) => slot.1 = script.to_string(),
            None => self.scripts.push((key.to_string(), script.to_string())),
        }
    }
}

/// File a task script is written to.
pub fn script_path(dir: &Path, key: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", key, extension))
}
