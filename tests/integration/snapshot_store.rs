//! Disk-level behavior of the snapshot store with real JSON records.

use std::fs;

use serde_json::Value;
use tempfile::TempDir;

use vigil::models::JsonRecord;
use vigil::store::{SnapshotStore, StoreError, MARKER_FILE};

use crate::helpers::{job, snapshot};

#[test]
fn test_record_files_preserve_fetched_fields() {
    let tmp = TempDir::new().unwrap();
    let mut store = SnapshotStore::open(tmp.path()).unwrap();

    store
        .reconcile(snapshot(&[job("analyst-7", "analyst", "open")]))
        .unwrap();

    let text = fs::read_to_string(tmp.path().join("analyst-7.json")).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["id"], "analyst-7");
    assert_eq!(value["fields"]["title"], "analyst");
    assert_eq!(value["fields"]["status"], "open");
}

#[test]
fn test_marker_carries_reconcile_timestamp() {
    let tmp = TempDir::new().unwrap();
    let mut store = SnapshotStore::open(tmp.path()).unwrap();
    store.reconcile(snapshot(&[job("1", "a", "open")])).unwrap();

    let content = fs::read_to_string(tmp.path().join(MARKER_FILE)).unwrap();
    assert!(
        chrono::DateTime::parse_from_rfc3339(&content).is_ok(),
        "marker should hold an RFC 3339 timestamp, got: {content}"
    );
}

#[test]
fn test_reopen_after_many_reconciles_matches_last_state() {
    let tmp = TempDir::new().unwrap();
    let last = snapshot(&[job("2", "cook", "open"), job("3", "welder", "open")]);

    {
        let mut store = SnapshotStore::open(tmp.path()).unwrap();
        store
            .reconcile(snapshot(&[job("1", "analyst", "open")]))
            .unwrap();
        store
            .reconcile(snapshot(&[job("1", "analyst", "closed"), job("2", "cook", "open")]))
            .unwrap();
        store.reconcile(last.clone()).unwrap();
    }

    let reopened: SnapshotStore<JsonRecord> = SnapshotStore::open(tmp.path()).unwrap();
    assert_eq!(reopened.records(), &last);

    // Deleted records are gone from disk too.
    assert!(!tmp.path().join("1.json").exists());
}

#[test]
fn test_foreign_directory_is_never_adopted() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("notes.json"), "{}").unwrap();

    let result: Result<SnapshotStore<JsonRecord>, _> = SnapshotStore::open(tmp.path());

    assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    assert_eq!(fs::read_to_string(tmp.path().join("notes.json")).unwrap(), "{}");
    assert!(!tmp.path().join(MARKER_FILE).exists());
}

#[test]
fn test_hand_edited_record_with_wrong_schema_fails_load() {
    let tmp = TempDir::new().unwrap();
    {
        let mut store = SnapshotStore::open(tmp.path()).unwrap();
        store.reconcile(snapshot(&[job("1", "a", "open")])).unwrap();
    }
    fs::write(tmp.path().join("1.json"), r#"["not", "a", "record"]"#).unwrap();

    let result: Result<SnapshotStore<JsonRecord>, _> = SnapshotStore::open(tmp.path());
    assert!(matches!(result, Err(StoreError::BadRecord { .. })));
}
