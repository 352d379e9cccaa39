//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for deskscript.
///
/// This struct represents the contents of `deskscript.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Shell settings
    // =========================================================================
    /// Name shown at the start of the shell prompt.
    #[serde(default = "default_operator_name")]
    pub operator_name: String,

    /// Index given to the first task of a run. Later tasks count up from it.
    #[serde(default = "default_first_task_index")]
    pub first_task_index: u32,

    /// Whether operator output is colored.
    #[serde(default = "default_true")]
    pub color: bool,

    // =========================================================================
    // Output settings
    // =========================================================================
    /// Directory completed scripts are written to. When unset, scripts are
    /// printed to stdout when the shell exits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// File extension for written scripts (no leading dot).
    #[serde(default = "default_script_extension")]
    pub script_extension: String,

    /// Glob for fragment files picked up by `subtask-dir`.
    #[serde(default = "default_fragment_glob")]
    pub fragment_glob: String,

    /// Append-only NDJSON audit log. Disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_file: Option<PathBuf>,

    // =========================================================================
    // Script settings
    // =========================================================================
    /// Escape `Send` modifiers and quotes in typed credentials.
    #[serde(default)]
    pub escape_credentials: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operator_name: default_operator_name(),
            first_task_index: default_first_task_index(),
            color: default_true(),
            output_dir: None,
            script_extension: default_script_extension(),
            fragment_glob: default_fragment_glob(),
            events_file: None,
            escape_credentials: false,
        }
    }
}
