//! Durable-state behavior: round-trips, two-level merge, silent recovery,
//! backups, and the append-only history log.

use std::fs;

use tempfile::TempDir;
use vibegate::{HistoryEntry, StateStore, WorkflowState, WorkspacePaths};

fn paths_in(dir: &TempDir) -> WorkspacePaths {
    WorkspacePaths::rooted(dir.path().join(".vibegate"))
}

fn store_in(dir: &TempDir) -> StateStore {
    StateStore::open(&paths_in(dir)).expect("store opens")
}

#[test]
fn missing_document_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let state = store.load();
    assert_eq!(state, WorkflowState::default());
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut state = WorkflowState::default();
    state.current_step = 9;
    state.current_bead_id = Some("BEAD-42".to_string());
    state.verification.tests_passed = true;
    state.approvals.human_review = true;
    state.context.context_pack_exists = true;
    store.save(&mut state).unwrap();

    let loaded = store.load();
    assert_eq!(loaded.current_step, 9);
    assert_eq!(loaded.current_bead_id.as_deref(), Some("BEAD-42"));
    assert_eq!(loaded.verification, state.verification);
    assert_eq!(loaded.approvals, state.approvals);
    assert_eq!(loaded.context, state.context);
}

#[test]
fn save_stamps_last_activity_and_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let store = store_in(&dir);

    let mut state = WorkflowState::default();
    assert!(state.session.last_activity.is_none());
    store.save(&mut state).unwrap();
    assert!(state.session.last_activity.is_some());

    assert!(paths.state_file().exists());
    assert!(!paths.state_file().with_extension("json.tmp").exists());
}

#[test]
fn corrupt_document_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let store = store_in(&dir);

    fs::write(paths.state_file(), "{{{ not json at all").unwrap();
    assert_eq!(store.load(), WorkflowState::default());
}

#[test]
fn partial_document_gets_two_level_merge() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let store = store_in(&dir);

    fs::write(
        paths.state_file(),
        r#"{ "current_step": 9, "current_bead_id": "BEAD-7" }"#,
    )
    .unwrap();

    let state = store.load();
    assert_eq!(state.current_step, 9);
    assert_eq!(state.current_bead_id.as_deref(), Some("BEAD-7"));
    // Missing top-level keys were filled from defaults.
    assert!(!state.approvals.human_review);
    assert_eq!(state.status, "initialized");
    assert!(state.history.is_empty());
}

#[test]
fn partial_sub_object_counts_as_malformed() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let store = store_in(&dir);

    // Present top-level keys are trusted verbatim, not deep-merged, so a
    // sub-object missing required fields makes the whole document default.
    fs::write(
        paths.state_file(),
        r#"{ "current_step": 9, "approvals": { "human_review": true } }"#,
    )
    .unwrap();

    assert_eq!(store.load(), WorkflowState::default());
}

#[test]
fn backup_without_document_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let store = store_in(&dir);

    assert!(store.backup("manual").unwrap().is_none());
    assert_eq!(fs::read_dir(paths.backup_dir()).unwrap().count(), 0);
}

#[test]
fn backup_copies_current_document_with_reason_tag() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut state = WorkflowState::default();
    state.current_step = 5;
    state.current_bead_id = Some("BEAD-42".to_string());
    store.save(&mut state).unwrap();

    let backup = store.backup("pre_reset").unwrap().expect("backup created");
    let name = backup.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("vibe-state_"));
    assert!(name.contains("pre_reset"));

    let copied: WorkflowState =
        serde_json::from_str(&fs::read_to_string(&backup).unwrap()).unwrap();
    assert_eq!(copied.current_step, 5);
    assert_eq!(copied.current_bead_id.as_deref(), Some("BEAD-42"));
}

#[test]
fn history_appends_one_jsonl_line_per_entry() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let store = store_in(&dir);

    let mut state = WorkflowState::default();
    store.append_history(&mut state, "first").unwrap();
    store.append_history(&mut state, "second").unwrap();
    store.append_history(&mut state, "third").unwrap();

    assert_eq!(state.history.len(), 3);

    let log = fs::read_to_string(paths.history_file()).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    for (line, expected) in lines.iter().zip(["first", "second", "third"]) {
        let entry: HistoryEntry = serde_json::from_str(line).unwrap();
        assert_eq!(entry.message, expected);
    }
}

#[test]
fn history_log_survives_without_a_main_save() {
    let dir = TempDir::new().unwrap();
    let paths = paths_in(&dir);
    let store = store_in(&dir);

    let mut state = WorkflowState::default();
    store.append_history(&mut state, "unsaved mutation").unwrap();

    // The main document was never written, the log was.
    assert!(!paths.state_file().exists());
    assert!(paths.history_file().exists());
}
