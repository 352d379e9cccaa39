//! Tests for the subtask registry and its projections.

use super::*;
use tempfile::TempDir;

fn sample_registry() -> SubtaskRegistry {
    let mut registry = SubtaskRegistry::new();
    registry.insert("Sub_1", "; first body\n").unwrap();
    registry.insert("Notepad_4", "Func Notepad_4()\nEndFunc\n").unwrap();
    registry.insert("Cmd_2", "; third body\n").unwrap();
    registry
}

fn called_ids(call_sites: &str) -> Vec<&str> {
    call_sites
        .lines()
        .filter_map(|l| l.strip_suffix("()"))
        .collect()
}

fn header_ids(text: &str) -> Vec<&str> {
    text.lines()
        .filter_map(|l| l.trim_start().strip_prefix(HEADER))
        .collect()
}

#[test]
fn test_insert_keeps_insertion_order() {
    let registry = sample_registry();
    let ids: Vec<&str> = registry.ids().collect();
    assert_eq!(ids, vec!["Sub_1", "Notepad_4", "Cmd_2"]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_insert_existing_id_replaces_in_place() {
    let mut registry = sample_registry();
    registry.insert("Notepad_4", "; replaced\n").unwrap();

    let ids: Vec<&str> = registry.ids().collect();
    assert_eq!(ids, vec!["Sub_1", "Notepad_4", "Cmd_2"]);
    assert_eq!(registry.items()[1].1, "; replaced\n");
}

#[test]
fn test_insert_rejects_invalid_ids() {
    let mut registry = SubtaskRegistry::new();
    for bad in ["", "1abc", "has space", "dash-name", "call()"] {
        let err = registry.insert(bad, "x").unwrap_err();
        assert!(err.to_string().contains("invalid subtask id"), "{}", bad);
    }
    assert!(registry.is_empty());
}

#[test]
fn test_call_sites_empty_registry_renders_nothing() {
    assert_eq!(render_call_sites(&[]), "");
    assert_eq!(render_bodies(&[]), "");
}

#[test]
fn test_call_sites_format() {
    let mut registry = SubtaskRegistry::new();
    registry.insert("Sub_1", "; sub body").unwrap();

    assert_eq!(
        render_call_sites(registry.items()),
        "\n; ############################################\n\
         ; [!] Assigned Subtask Interaction >> Sub_1\n\
         Sub_1()\n\
         ; [>] Assigned subtask function\n"
    );
}

#[test]
fn test_bodies_format_keeps_fragment_verbatim() {
    let mut registry = SubtaskRegistry::new();
    registry.insert("Sub_1", "    ; indented body").unwrap();

    assert_eq!(
        render_bodies(registry.items()),
        "\n; ############################################\n\
         ; [!] Assigned Subtask Interaction >> Sub_1\n\
         ; [!] Parent : RemoteDesktop \n\
         \n\
         ; [>] Assigned subtask function\n    ; indented body"
    );
}

#[test]
fn test_projections_reference_same_ids_in_same_order() {
    let mut registry = sample_registry();
    let lease = registry.checkout();

    let call_sites = lease.render_call_sites();
    let bodies = lease.render_bodies();

    assert_eq!(called_ids(&call_sites), vec!["Sub_1", "Notepad_4", "Cmd_2"]);
    assert_eq!(header_ids(&call_sites), header_ids(&bodies));
}

#[test]
fn test_rendering_does_not_mutate() {
    let mut registry = sample_registry();
    {
        let lease = registry.checkout();
        let first = lease.render_bodies();
        let second = lease.render_bodies();
        assert_eq!(first, second);
        assert_eq!(lease.items().len(), 3);
    }
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_drain_empties_registry() {
    let mut registry = sample_registry();
    let consumed = registry.checkout().drain();
    assert_eq!(consumed, 3);
    assert!(registry.is_empty());
}

#[test]
fn test_reset_clears_everything() {
    let mut registry = sample_registry();
    registry.reset();
    assert!(registry.is_empty());
    assert_eq!(registry.ids().count(), 0);
}

#[test]
fn test_load_file_reads_fragment() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("fragment.au3");
    std::fs::write(&path, "Func Typing_2()\nEndFunc\n").unwrap();

    let mut registry = SubtaskRegistry::new();
    registry.load_file("Typing_2", &path).unwrap();
    assert_eq!(registry.items()[0].1, "Func Typing_2()\nEndFunc\n");
}

#[test]
fn test_load_file_missing_is_user_error() {
    let temp = TempDir::new().unwrap();
    let mut registry = SubtaskRegistry::new();
    let err = registry
        .load_file("Missing_1", temp.path().join("nope.au3"))
        .unwrap_err();
    assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
    assert!(registry.is_empty());
}

#[test]
fn test_load_dir_matches_pattern_in_name_order() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("Word_5.au3"), "; word\n").unwrap();
    std::fs::write(temp.path().join("Cmd_3.au3"), "; cmd\n").unwrap();
    std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
    std::fs::create_dir(temp.path().join("Nested.au3")).unwrap();

    let mut registry = SubtaskRegistry::new();
    let loaded = registry.load_dir(temp.path(), "*.au3").unwrap();

    assert_eq!(loaded, vec!["Cmd_3", "Word_5"]);
    let ids: Vec<&str> = registry.ids().collect();
    assert_eq!(ids, vec!["Cmd_3", "Word_5"]);
}

#[test]
fn test_load_dir_invalid_pattern_is_config_error() {
    let temp = TempDir::new().unwrap();
    let mut registry = SubtaskRegistry::new();
    let err = registry.load_dir(temp.path(), "[").unwrap_err();
    assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
}
