//! Tests for snapshot persistence
//!
//! These tests verify:
//! - Write-through under FlushPolicy::Auto
//! - Deferred writes under FlushPolicy::Manual
//! - Pretty and compact encodings
//! - Reopening a store from its file
//! - Reload-before-get across engines sharing a file
//! - I/O failures surface without rolling back memory

use std::fs;
use std::path::{Path, PathBuf};

use docstore::config::{FlushPolicy, JsonFormat, StoreConfig};
use docstore::{Document, FileStore, StoreError};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn doc(text: &str) -> Document {
    Document::parse(text).unwrap()
}

fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("db.json")
}

fn open(path: &Path, policy: FlushPolicy, format: JsonFormat) -> FileStore {
    let config = StoreConfig::builder()
        .path(path)
        .flush_policy(policy)
        .json_format(format)
        .build();
    FileStore::open(config).unwrap()
}

fn read_json_file(path: &Path) -> Value {
    let bytes = fs::read(path).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("db.json");

    let _store = FileStore::open_path(&path).unwrap();

    assert!(path.exists());
    assert_eq!(fs::read(&path).unwrap().len(), 0);
}

#[test]
fn test_open_rejects_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);
    fs::write(&path, b"{ not json").unwrap();

    assert!(matches!(
        FileStore::open_path(&path),
        Err(StoreError::Serialization(_))
    ));
}

#[test]
fn test_open_fails_when_path_is_directory() {
    let temp_dir = TempDir::new().unwrap();

    assert!(FileStore::open_path(temp_dir.path()).is_err());
}

#[test]
fn test_reopen_loads_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);

    {
        let store = FileStore::open_path(&path).unwrap();
        store.set("col", "item1", doc(r#"{"v":1}"#)).unwrap();
        store.set("col", "item2", doc(r#"{"v":2}"#)).unwrap();
    }

    let store = FileStore::open_path(&path).unwrap();
    let listing = store.list("col", 0, 1).unwrap();
    assert_eq!(listing.total, 2);
    assert_eq!(listing.items["item2"], doc(r#"{"v":2}"#));

    // a write after reopen keeps the earlier content
    store.set("col", "item3", doc("3")).unwrap();
    let data = read_json_file(&path);
    assert_eq!(data["col"].as_object().unwrap().len(), 3);
}

// =============================================================================
// Write-Through Tests
// =============================================================================

#[test]
fn test_auto_flush_writes_every_mutation() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);
    let store = open(&path, FlushPolicy::Auto, JsonFormat::Pretty);

    store.set("test_set_value", "item1", doc(r#"{"item": "my value"}"#)).unwrap();
    assert_eq!(
        read_json_file(&path)["test_set_value"]["item1"]["item"],
        "my value"
    );

    store
        .set("test_set_value", "item1", doc(r#"{"item": "my value changed"}"#))
        .unwrap();
    assert_eq!(
        read_json_file(&path)["test_set_value"]["item1"]["item"],
        "my value changed"
    );

    store.delete("test_set_value", "item1").unwrap();
    assert_eq!(read_json_file(&path), json!({"test_set_value": {}}));

    store.delete_collection("test_set_value").unwrap();
    assert_eq!(read_json_file(&path), json!({}));
}

#[test]
fn test_file_keeps_documents_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);
    let store = open(&path, FlushPolicy::Auto, JsonFormat::Compact);

    store.set("c", "k", doc(r#"{"z": 1, "a": 2.50}"#)).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, r#"{"c":{"k":{"z": 1, "a": 2.50}}}"#);
}

#[test]
fn test_pretty_format_is_indented() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);
    let store = open(&path, FlushPolicy::Auto, JsonFormat::Pretty);

    store.set("col", "key", doc("1")).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "{\n    \"col\": {\n        \"key\": 1\n    }\n}");
}

#[test]
fn test_to_json_matches_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);
    let store = open(&path, FlushPolicy::Auto, JsonFormat::Compact);

    store.set("b", "k", doc("[1]")).unwrap();
    store.set("a", "k", doc("{}")).unwrap();

    assert_eq!(store.to_json().unwrap(), fs::read(&path).unwrap());
}

// =============================================================================
// Manual Flush Tests
// =============================================================================

#[test]
fn test_manual_flush_defers_writes() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);
    let store = open(&path, FlushPolicy::Manual, JsonFormat::Pretty);

    store.set("col", "item1", doc(r#"{"v":1}"#)).unwrap();
    store.set("col", "item2", doc(r#"{"v":2}"#)).unwrap();
    assert_eq!(fs::read(&path).unwrap().len(), 0);

    // memory is authoritative until flushed
    assert_eq!(store.list("col", 0, 1).unwrap().total, 2);
    assert_eq!(store.get("col", "item1").unwrap(), Some(doc(r#"{"v":1}"#)));

    store.flush().unwrap();
    assert_eq!(read_json_file(&path)["col"]["item2"]["v"], 2);
}

#[test]
fn test_manual_flush_get_reloads_flushed_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);
    let store = open(&path, FlushPolicy::Manual, JsonFormat::Compact);

    store.set("col", "k", doc("1")).unwrap();
    store.flush().unwrap();
    store.set("col", "k", doc("2")).unwrap();

    // Get merges the file over memory, List does not reload
    assert_eq!(store.list("col", 0, 1).unwrap().items["k"], doc("2"));
    assert_eq!(store.get("col", "k").unwrap(), Some(doc("1")));
    assert_eq!(store.list("col", 0, 1).unwrap().items["k"], doc("1"));
}

#[test]
fn test_flush_in_memory_is_noop() {
    let store = FileStore::in_memory();
    store.set("col", "k", doc("1")).unwrap();

    store.flush().unwrap();
    assert_eq!(store.get("col", "k").unwrap(), Some(doc("1")));
}

// =============================================================================
// Shared File Tests
// =============================================================================

#[test]
fn test_get_sees_writes_from_other_engine() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);

    let writer = FileStore::open_path(&path).unwrap();
    writer.set("col", "k", doc("1")).unwrap();

    let reader = FileStore::open_path(&path).unwrap();
    assert_eq!(reader.get("col", "k").unwrap(), Some(doc("1")));

    writer.set("col", "k", doc("2")).unwrap();
    writer.set("fresh", "k", doc("3")).unwrap();

    assert_eq!(reader.get("col", "k").unwrap(), Some(doc("2")));
    // a collection created elsewhere becomes visible through Get
    assert_eq!(reader.get("fresh", "k").unwrap(), Some(doc("3")));
}

#[test]
fn test_get_fails_when_file_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);
    let store = FileStore::open_path(&path).unwrap();
    store.set("col", "k", doc("1")).unwrap();

    fs::write(&path, b"garbage").unwrap();

    assert!(matches!(
        store.get("col", "k"),
        Err(StoreError::Serialization(_))
    ));
    // List works from memory
    assert_eq!(store.list("col", 0, 1).unwrap().total, 1);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_failed_write_through_keeps_memory_change() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("gone");
    let path = dir.join("db.json");
    let store = FileStore::open_path(&path).unwrap();

    fs::remove_dir_all(&dir).unwrap();

    let err = store.set("col", "k", doc("1")).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));

    // mutation is not rolled back
    let listing = store.list("col", 0, 1).unwrap();
    assert_eq!(listing.items["k"], doc("1"));
}
