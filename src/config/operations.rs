//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::DEFAULT_CONFIG_FILE;
use crate::error::{DeskError, Result};
use crate::script::AssembleOptions;
use globset::Glob;
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DeskError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for a run.
    ///
    /// An explicit path must exist. Without one, `deskscript.yaml` in `dir` is
    /// used when present, otherwise defaults apply.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            debug!("no config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| DeskError::ConfigError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            DeskError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `first_task_index` must be positive
    /// - `operator_name` must be non-empty
    /// - `script_extension` must be non-empty and have no leading dot
    /// - `fragment_glob` must be a valid glob
    pub fn validate(&self) -> Result<()> {
        if self.first_task_index == 0 {
            return Err(DeskError::ConfigError(
                "first_task_index must be greater than 0".to_string(),
            ));
        }

        if self.operator_name.trim().is_empty() {
            return Err(DeskError::ConfigError(
                "operator_name must be non-empty".to_string(),
            ));
        }

        if self.script_extension.is_empty() {
            return Err(DeskError::ConfigError(
                "script_extension must be non-empty".to_string(),
            ));
        }
        if self.script_extension.starts_with('.') {
            return Err(DeskError::ConfigError(format!(
                "script_extension must not have a leading dot (found '{}'). Use '{}' instead.",
                self.script_extension,
                self.script_extension.trim_start_matches('.')
            )));
        }

        Glob::new(&self.fragment_glob).map_err(|e| {
            DeskError::ConfigError(format!(
                "fragment_glob '{}' is not a valid glob: {}",
                self.fragment_glob, e
            ))
        })?;

        Ok(())
    }

    /// Assembly options derived from this config.
    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            escape_credentials: self.escape_credentials,
        }
    }
}
