//! Constants and default value functions used by the Config struct.

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "deskscript.yaml";

// Default value functions for serde
pub(crate) fn default_operator_name() -> String {
    "deskscript".to_string()
}
pub(crate) fn default_first_task_index() -> u32 {
    1
}
pub(crate) fn default_script_extension() -> String {
    "au3".to_string()
}
pub(crate) fn default_fragment_glob() -> String {
    "*.au3".to_string()
}
pub(crate) fn default_true() -> bool {
    true
}
