//! End-to-end workflow test
//!
//! Tests the complete pipeline:
//! 1. Load a workspace from disk
//! 2. Apply a rename rule pipeline
//! 3. Write the changed documents back
//! 4. Check idempotency on a second pass

use std::fs;
use tempfile::TempDir;
use treewright::{
    apply, load_from_str, load_workspace, DocumentStatus, FileWriter, RunReport,
};

/// Create a small two-project workspace with C# and Rust sources.
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();

    fs::create_dir_all(dir.path().join("app")).unwrap();
    fs::create_dir_all(dir.path().join("lib")).unwrap();

    fs::write(
        dir.path().join("app/Calculator.cs"),
        "class Calculator {\n    void OldCompute() {}\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("app/Helper.cs"),
        "class Helper {\n    void Helper() {}\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("lib/core.rs"), "fn old_entry() {}\n").unwrap();

    dir
}

fn rename_config(prefix: &str, replacement: &str) -> treewright::RunConfig {
    load_from_str(&format!(
        r#"
[meta]
description = "test migration"

[[rules]]
type = "rename_prefix"
prefix = "{prefix}"
replacement = "{replacement}"
"#
    ))
    .unwrap()
}

#[test]
fn full_workflow_load_apply_write() {
    let dir = setup_workspace();

    let workspace = load_workspace(dir.path()).unwrap();
    assert_eq!(workspace.document_count(), 3);

    let pipeline = rename_config("Old", "New").pipeline();
    let (workspace, changes) = apply(workspace, &pipeline);

    // Only the C# document with the Old-prefixed method changed
    assert_eq!(changes.len(), 1);
    assert!(changes.failures.is_empty());
    assert_eq!(
        changes.changes[0].new_text,
        "class Calculator {\n    void NewCompute() {}\n}\n"
    );

    let write_report = FileWriter::new(workspace.root()).unwrap().write(&changes);
    assert!(write_report.is_clean());
    assert_eq!(write_report.written.len(), 1);

    // Changed document rewritten on disk, others byte-identical
    assert_eq!(
        fs::read_to_string(dir.path().join("app/Calculator.cs")).unwrap(),
        "class Calculator {\n    void NewCompute() {}\n}\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("app/Helper.cs")).unwrap(),
        "class Helper {\n    void Helper() {}\n}\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("lib/core.rs")).unwrap(),
        "fn old_entry() {}\n"
    );

    let report = RunReport::assemble(&workspace, &changes, Some(&write_report));
    assert!(report.is_clean());
    assert_eq!(report.count(DocumentStatus::Transformed), 1);
    assert_eq!(report.count(DocumentStatus::Unchanged), 2);
}

#[test]
fn second_pass_after_write_is_empty() {
    let dir = setup_workspace();
    let pipeline = rename_config("Old", "New").pipeline();

    let workspace = load_workspace(dir.path()).unwrap();
    let (workspace, changes) = apply(workspace, &pipeline);
    let report = FileWriter::new(workspace.root()).unwrap().write(&changes);
    assert!(report.is_clean());

    // Fresh load of the written workspace: nothing left to do
    let workspace = load_workspace(dir.path()).unwrap();
    let (_, changes) = apply(workspace, &pipeline);
    assert!(changes.is_empty());
    assert!(changes.failures.is_empty());
}

#[test]
fn in_memory_second_pass_is_empty() {
    let dir = setup_workspace();
    let pipeline = rename_config("Old", "New").pipeline();

    let workspace = load_workspace(dir.path()).unwrap();
    let (workspace, first) = apply(workspace, &pipeline);
    assert_eq!(first.len(), 1);

    // Same in-memory workspace, same pipeline: already converged
    let (_, second) = apply(workspace, &pipeline);
    assert!(second.is_empty());
}

#[test]
fn multi_language_rule_applies_per_grammar() {
    let dir = setup_workspace();
    let pipeline = rename_config("old_", "new_").pipeline();

    let workspace = load_workspace(dir.path()).unwrap();
    let (_, changes) = apply(workspace, &pipeline);

    // Only the Rust document matches the snake_case prefix
    assert_eq!(changes.len(), 1);
    assert_eq!(changes.changes[0].new_text, "fn new_entry() {}\n");
}

#[test]
fn unparsable_document_is_reported_and_left_alone() {
    let dir = setup_workspace();
    fs::write(dir.path().join("app/Broken.cs"), "class {{{").unwrap();

    let pipeline = rename_config("Old", "New").pipeline();
    let workspace = load_workspace(dir.path()).unwrap();
    let (workspace, changes) = apply(workspace, &pipeline);

    assert_eq!(changes.failures.len(), 1);
    assert_eq!(changes.len(), 1);

    let write_report = FileWriter::new(workspace.root()).unwrap().write(&changes);
    assert!(write_report.is_clean());

    // The broken file never got an I/O call
    assert_eq!(
        fs::read_to_string(dir.path().join("app/Broken.cs")).unwrap(),
        "class {{{"
    );

    let report = RunReport::assemble(&workspace, &changes, Some(&write_report));
    assert_eq!(report.count(DocumentStatus::TransformFailed), 1);
    assert_eq!(report.count(DocumentStatus::Transformed), 1);
    assert!(!report.is_clean());
}

#[test]
fn concurrent_edit_fails_only_that_write() {
    let dir = setup_workspace();
    let pipeline = rename_config("Old", "New").pipeline();

    let workspace = load_workspace(dir.path()).unwrap();
    let (workspace, changes) = apply(workspace, &pipeline);
    assert_eq!(changes.len(), 1);

    // Simulate an external edit between apply and write
    fs::write(
        dir.path().join("app/Calculator.cs"),
        "class Calculator { int external; }\n",
    )
    .unwrap();

    let report = FileWriter::new(workspace.root()).unwrap().write(&changes);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("app/Calculator.cs")).unwrap(),
        "class Calculator { int external; }\n"
    );
}
