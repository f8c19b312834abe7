//! Integration tests for the untangle CLI.
//!
//! These tests verify the end-to-end behavior of all CLI commands.

use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

mod common;
use common::{run_untangle_in_dir, run_untangle_with_stdin, stdout_json, task, write_tasks};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Provides a temporary directory containing `cyclic.json` and `clean.json`
#[fixture]
fn task_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    write_tasks(
        temp.path(),
        "cyclic.json",
        &[task("a", &["b"]), task("b", &["c"]), task("c", &["a"]), task("d", &["a"])],
    );
    write_tasks(
        temp.path(),
        "clean.json",
        &[task("a", &[]), task("b", &["a", "ghost"])],
    );
    temp
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[rstest]
fn test_cli_help(temp_dir: TempDir) {
    let output = run_untangle_in_dir(temp_dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    for command in ["init", "sanitize", "extract", "check"] {
        assert!(stdout.contains(command), "Help should show '{command}'");
    }
}

#[rstest]
fn test_cli_version(temp_dir: TempDir) {
    let output = run_untangle_in_dir(temp_dir.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[rstest]
fn test_cli_no_args(temp_dir: TempDir) {
    let output = run_untangle_in_dir(temp_dir.path(), &[]);
    assert!(output.status.success());
}

// ============================================================================
// Init Tests
// ============================================================================

#[rstest]
fn test_init_writes_config(temp_dir: TempDir) {
    let output = run_untangle_in_dir(temp_dir.path(), &["init"]);
    assert!(output.status.success());

    let content = std::fs::read_to_string(temp_dir.path().join("untangle.yaml")).unwrap();
    assert!(content.contains("strict: false"));
    assert!(content.contains("max-tasks: 5"));
}

#[rstest]
fn test_init_refuses_to_overwrite(temp_dir: TempDir) {
    assert!(run_untangle_in_dir(temp_dir.path(), &["init", "-q"]).status.success());

    let output = run_untangle_in_dir(temp_dir.path(), &["init"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));

    assert!(run_untangle_in_dir(temp_dir.path(), &["init", "--force"]).status.success());
}

// ============================================================================
// Sanitize Tests
// ============================================================================

#[rstest]
fn test_sanitize_blocks_cycle_and_keeps_downstream_ready(task_dir: TempDir) {
    let output = run_untangle_in_dir(task_dir.path(), &["--json", "sanitize", "cyclic.json"]);
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["cycles"], json!([["a", "b", "c", "a"]]));
    let statuses: Vec<&str> = value["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["blocked", "blocked", "blocked", "ready"]);
}

#[rstest]
fn test_sanitize_drops_dangling_dependencies(task_dir: TempDir) {
    let output = run_untangle_in_dir(task_dir.path(), &["sanitize", "clean.json", "--json"]);
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["tasks"][1]["dependencies"], json!(["a"]));
    assert_eq!(value["cycles"], json!([]));
}

#[rstest]
fn test_sanitize_reads_jsonl_from_stdin(temp_dir: TempDir) {
    let input = format!(
        "{}\nnot json at all\n{}\n",
        task("x", &["x"]),
        task("y", &["x"])
    );
    let output = run_untangle_with_stdin(temp_dir.path(), &["--json", "sanitize", "-"], &input);
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["cycles"], json!([["x", "x"]]));
    assert_eq!(value["tasks"][1]["status"], "ready");
    assert_eq!(value["warnings"][0]["kind"], "malformed_json");
    assert_eq!(value["warnings"][0]["line_number"], 2);
}

#[rstest]
fn test_sanitize_strict_rejects_duplicates(temp_dir: TempDir) {
    write_tasks(temp_dir.path(), "dup.json", &[task("a", &[]), task("a", &[])]);

    let lenient = run_untangle_in_dir(temp_dir.path(), &["--json", "sanitize", "dup.json"]);
    assert!(lenient.status.success());
    assert_eq!(stdout_json(&lenient)["warnings"][0]["kind"], "duplicate_id");

    let strict = run_untangle_in_dir(temp_dir.path(), &["sanitize", "dup.json", "--strict"]);
    assert!(!strict.status.success());
}

#[rstest]
fn test_sanitize_text_output(task_dir: TempDir) {
    let output = run_untangle_in_dir(task_dir.path(), &["sanitize", "cyclic.json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4 task(s) (1 ready, 3 blocked)"));
    assert!(stdout.contains("Found 1 dependency cycle(s):"));
}

#[rstest]
fn test_sanitize_missing_file_fails(temp_dir: TempDir) {
    let output = run_untangle_in_dir(temp_dir.path(), &["sanitize", "nope.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

// ============================================================================
// Check Tests
// ============================================================================

#[rstest]
#[case::cyclic("cyclic.json", false)]
#[case::clean("clean.json", true)]
fn test_check_exit_status(task_dir: TempDir, #[case] file: &str, #[case] succeeds: bool) {
    let output = run_untangle_in_dir(task_dir.path(), &["check", file]);
    assert_eq!(output.status.success(), succeeds);
    if !succeeds {
        assert_eq!(output.status.code(), Some(1));
    }
}

#[rstest]
fn test_check_json_lists_cycles(task_dir: TempDir) {
    let output = run_untangle_in_dir(task_dir.path(), &["--json", "check", "cyclic.json"]);
    assert_eq!(stdout_json(&output), json!({"cycles": [["a", "b", "c", "a"]]}));
}

// ============================================================================
// Extract Tests
// ============================================================================

#[rstest]
fn test_extract_writes_job_result(temp_dir: TempDir) {
    let source = temp_dir.path().join("notes.txt");
    std::fs::write(&source, "Draft agenda\nBook room\nSend invites\n").unwrap();

    let output = run_untangle_in_dir(
        temp_dir.path(),
        &["--json", "extract", "notes.txt", "--output", "job.json"],
    );
    assert!(output.status.success());

    let printed = stdout_json(&output);
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("job.json")).unwrap())
            .unwrap();
    assert_eq!(printed, saved);

    assert_eq!(saved["status"], "completed");
    assert_eq!(saved["tasks"].as_array().unwrap().len(), 3);
    assert_eq!(saved["tasks"][0]["dependencies"], json!([]));
    assert_eq!(saved["cycles"], json!([]));
    assert_eq!(saved["source_hash"].as_str().unwrap().len(), 64);
}

#[rstest]
fn test_extract_honours_config(temp_dir: TempDir) {
    std::fs::write(
        temp_dir.path().join("custom.yaml"),
        "extractor:\n  max-tasks: 1\n",
    )
    .unwrap();

    let output = run_untangle_with_stdin(
        temp_dir.path(),
        &["--json", "--config", "custom.yaml", "extract"],
        "one\ntwo\nthree\n",
    );
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["tasks"].as_array().unwrap().len(), 1);
}

#[rstest]
fn test_extract_rejects_blank_source(temp_dir: TempDir) {
    let output = run_untangle_with_stdin(temp_dir.path(), &["extract"], "   \n");
    assert!(!output.status.success());
}
