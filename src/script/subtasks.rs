//! Shared registry of subtask fragments and its two text projections.
//!
//! Fragments are produced by unrelated tasks and consumed by exactly one
//! parent script. Consumption goes through [`SubtaskRegistry::checkout`]:
//! the returned [`SubtaskLease`] can be rendered any number of times and is
//! then consumed by [`SubtaskLease::drain`], which empties the registry.
//! Dropping a lease without draining leaves every fragment in place.

use crate::error::{DeskError, Result};
use globset::Glob;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Subtask ids are emitted as `Id()` calls, so they must be valid function names.
static SUBTASK_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid subtask id regex")
});

const SEPARATOR: &str = "; ############################################\n";
const HEADER: &str = "; [!] Assigned Subtask Interaction >> ";
const PARENT: &str = "; [!] Parent : RemoteDesktop \n";
const FUNCTION_NOTE: &str = "; [>] Assigned subtask function\n";

/// Insertion-ordered map from subtask id to fragment text.
#[derive(Debug, Default, Clone)]
pub struct SubtaskRegistry {
    entries: Vec<(String, String)>,
}

impl SubtaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment. An existing id keeps its position and takes the new text.
    pub fn insert(&mut self, id: impl Into<String>, fragment: impl Into<String>) -> Result<()> {
        let id = id.into();
        validate_subtask_id(&id)?;
        let fragment = fragment.into();

        if let Some(slot) = self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            debug!(subtask = %id, "replacing subtask fragment");
            slot.1 = fragment;
        } else {
            debug!(subtask = %id, "registering subtask fragment");
            self.entries.push((id, fragment));
        }
        Ok(())
    }

    /// Read a fragment from a file and register it under `id`.
    pub fn load_file<P: AsRef<Path>>(&mut self, id: &str, path: P) -> Result<()> {
        let path = path.as_ref();
        let fragment = fs::read_to_string(path).map_err(|e| {
            DeskError::UserError(format!(
                "failed to read subtask fragment '{}': {}",
                path.display(),
                e
            ))
        })?;
        self.insert(id, fragment)
    }

    /// Register every file in `dir` whose name matches `pattern`.
    ///
    /// Files are taken in file-name order and registered under their stem.
    /// Returns the ids that were loaded.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P, pattern: &str) -> Result<Vec<String>> {
        let dir = dir.as_ref();
        let matcher = Glob::new(pattern)
            .map_err(|e| {
                DeskError::ConfigError(format!("invalid fragment pattern '{}': {}", pattern, e))
            })?
            .compile_matcher();

        let entries = fs::read_dir(dir).map_err(|e| {
            DeskError::UserError(format!(
                "failed to read subtask directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                DeskError::UserError(format!("failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name()
                && matcher.is_match(name)
            {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| {
                    DeskError::UserError(format!("invalid fragment file name: {}", path.display()))
                })?
                .to_string();
            self.load_file(&id, &path)?;
            loaded.push(id);
        }
        Ok(loaded)
    }

    /// Entries in insertion order.
    pub fn items(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Subtask ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every fragment.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Borrow the registry for a render-then-drain pass.
    pub fn checkout(&mut self) -> SubtaskLease<'_> {
        SubtaskLease { registry: self }
    }
}

/// Exclusive read access to the registry, consumed by draining it.
#[derive(Debug)]
pub struct SubtaskLease<'a> {
    registry: &'a mut SubtaskRegistry,
}

impl SubtaskLease<'_> {
    pub fn items(&self) -> &[(String, String)] {
        self.registry.items()
    }

    pub fn render_call_sites(&self) -> String {
        render_call_sites(self.items())
    }

    pub fn render_bodies(&self) -> String {
        render_bodies(self.items())
    }

    /// Empty the registry. Returns how many fragments were consumed.
    pub fn drain(self) -> usize {
        let consumed = self.registry.len();
        self.registry.reset();
        debug!(consumed, "drained subtask registry");
        consumed
    }
}

/// Check that `id` can be emitted as a function call.
pub fn validate_subtask_id(id: &str) -> Result<()> {
    if SUBTASK_ID_REGEX.is_match(id) {
        Ok(())
    } else {
        Err(DeskError::UserError(format!(
            "invalid subtask id '{}': must start with a letter or '_' and contain only letters, digits and '_'",
            id
        )))
    }
}

/// One commented call per fragment, in order. Empty input renders nothing.
pub fn render_call_sites(entries: &[(String, String)]) -> String {
    let mut out = String::new();
    for (id, _) in entries {
        out.push('\n');
        out.push_str(SEPARATOR);
        push_header(&mut out, id);
        out.push_str(id);
        out.push_str("()\n");
        out.push_str(FUNCTION_NOTE);
    }
    out
}

/// One commented header plus the verbatim fragment per entry, in order.
pub fn render_bodies(entries: &[(String, String)]) -> String {
    let mut out = String::new();
    for (id, fragment) in entries {
        out.push('\n');
        out.push_str(SEPARATOR);
        push_header(&mut out, id);
        out.push_str(PARENT);
        out.push('\n');
        out.push_str(FUNCTION_NOTE);
        out.push_str(fragment);
    }
    out
}

fn push_header(out: &mut String, id: &str) {
    out.push_str(HEADER);
    out.push_str(id);
    out.push('\n');
}

#[cfg(test)]
mod tests;
