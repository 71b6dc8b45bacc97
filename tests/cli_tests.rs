//! Inspector binary tests
//!
//! Each test records a small corpus through the library, then drives the
//! `recuerdo` binary against the resulting destination root.

use assert_cmd::Command;
use predicates::prelude::*;
use recuerdo::system::RecordingSystem;
use std::path::PathBuf;

/// Record two calls of a `greet` target into a fresh root
fn recorded_root(tmp: &tempfile::TempDir) -> PathBuf {
    let root = tmp.path().join("root");
    let system = RecordingSystem::with_config(true, &root);
    let wrapped = system
        .record_named("greet", |name: String| name.len(), 4)
        .unwrap();
    wrapped.call(("alice".to_string(),));
    wrapped.call(("bob".to_string(),));
    root
}

#[test]
fn test_list_root_text() {
    let tmp = tempfile::tempdir().unwrap();
    let root = recorded_root(&tmp);

    Command::cargo_bin("recuerdo")
        .unwrap()
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("greet_000"))
        .stdout(predicate::str::contains("samples=2/4"));
}

#[test]
fn test_list_recorder_json() {
    let tmp = tempfile::tempdir().unwrap();
    let root = recorded_root(&tmp);

    let output = Command::cargo_bin("recuerdo")
        .unwrap()
        .args([root.to_str().unwrap(), "--function", "greet_000", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let entries: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["slot"], 0);
    assert_eq!(entries[0]["call"]["args"][0], "alice");
    assert_eq!(entries[1]["call"]["args"][0], "bob");
}

#[test]
fn test_dump_slot_text() {
    let tmp = tempfile::tempdir().unwrap();
    let root = recorded_root(&tmp);

    Command::cargo_bin("recuerdo")
        .unwrap()
        .args([root.to_str().unwrap(), "-f", "greet_000", "-s", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"alice\""));
}

#[test]
fn test_missing_root_fails() {
    Command::cargo_bin("recuerdo")
        .unwrap()
        .arg("/definitely/not/a/recording/root")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read destination root"));
}

#[test]
fn test_slot_without_function_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let root = recorded_root(&tmp);

    Command::cargo_bin("recuerdo")
        .unwrap()
        .args([root.to_str().unwrap(), "--slot", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--slot requires --function"));
}
