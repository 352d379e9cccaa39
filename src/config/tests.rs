//! Tests for config functionality.

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::exit_codes;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.operator_name, "deskscript");
    assert_eq!(config.first_task_index, 1);
    assert!(config.color);
    assert!(config.output_dir.is_none());
    assert_eq!(config.script_extension, "au3");
    assert_eq!(config.fragment_glob, "*.au3");
    assert!(config.events_file.is_none());
    assert!(!config.escape_credentials);
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();

    // Should use all defaults
    assert_eq!(config.first_task_index, 1);
    assert_eq!(config.operator_name, "deskscript");
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
operator_name: redteam
first_task_index: 7
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.operator_name, "redteam");
    assert_eq!(config.first_task_index, 7);

    // Unspecified values should use defaults
    assert_eq!(config.script_extension, "au3");
    assert!(config.color);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
operator_name: lab
first_task_index: 12
color: false
output_dir: out/scripts
script_extension: txt
fragment_glob: "*.frag"
events_file: out/events.ndjson
escape_credentials: true
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.operator_name, "lab");
    assert_eq!(config.first_task_index, 12);
    assert!(!config.color);
    assert_eq!(config.output_dir, Some(PathBuf::from("out/scripts")));
    assert_eq!(config.script_extension, "txt");
    assert_eq!(config.fragment_glob, "*.frag");
    assert_eq!(config.events_file, Some(PathBuf::from("out/events.ndjson")));
    assert!(config.escape_credentials);
    assert!(config.assemble_options().escape_credentials);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
first_task_index: 2
future_setting: whatever
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.first_task_index, 2);
}

#[test]
fn test_zero_first_task_index_rejected() {
    let err = Config::from_yaml("first_task_index: 0").unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    assert!(err.to_string().contains("first_task_index"));
}

#[test]
fn test_blank_operator_name_rejected() {
    let err = Config::from_yaml("operator_name: \"  \"").unwrap_err();
    assert!(err.to_string().contains("operator_name"));
}

#[test]
fn test_extension_with_leading_dot_rejected() {
    let err = Config::from_yaml("script_extension: .au3").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("leading dot"));
    assert!(msg.contains("'au3'"));
}

#[test]
fn test_empty_extension_rejected() {
    let err = Config::from_yaml("script_extension: \"\"").unwrap_err();
    assert!(err.to_string().contains("script_extension"));
}

#[test]
fn test_invalid_fragment_glob_rejected() {
    let err = Config::from_yaml("fragment_glob: \"[\"").unwrap_err();
    assert!(err.to_string().contains("fragment_glob"));
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let err = Config::from_yaml("first_task_index: [1, 2").unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
}

#[test]
fn test_yaml_roundtrip_keeps_values() {
    let mut config = Config::default();
    config.first_task_index = 4;
    config.output_dir = Some(PathBuf::from("scripts"));

    let yaml = config.to_yaml().unwrap();
    let parsed = Config::from_yaml(&yaml).unwrap();
    assert_eq!(parsed.first_task_index, 4);
    assert_eq!(parsed.output_dir, Some(PathBuf::from("scripts")));
}

#[test]
fn test_resolve_uses_defaults_without_file() {
    let temp = TempDir::new().unwrap();
    let config = Config::resolve(None, temp.path()).unwrap();
    assert_eq!(config.first_task_index, 1);
}

#[test]
fn test_resolve_picks_up_default_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "first_task_index: 9\n").unwrap();

    let config = Config::resolve(None, temp.path()).unwrap();
    assert_eq!(config.first_task_index, 9);
}

#[test]
fn test_resolve_explicit_path_must_exist() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("custom.yaml");

    let err = Config::resolve(Some(&missing), temp.path()).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    assert!(err.to_string().contains("custom.yaml"));
}
