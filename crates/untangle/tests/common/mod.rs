//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Path of the untangle binary built by cargo for this test run
pub fn untangle_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_untangle"))
}

/// Run the untangle binary directly in the specified directory
pub fn run_untangle_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(untangle_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute untangle binary")
}

/// Run the untangle binary with `input` piped to standard input
pub fn run_untangle_with_stdin(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(untangle_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn untangle binary");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child
        .wait_with_output()
        .expect("Failed to wait for untangle binary")
}

/// A well-formed task record as JSON
pub fn task(id: &str, deps: &[&str]) -> Value {
    json!({
        "id": id,
        "description": format!("Task {id}"),
        "priority": "medium",
        "dependencies": deps,
        "status": "ready",
    })
}

/// Write `records` as a JSON array into `dir/name` and return the path
pub fn write_tasks(dir: &Path, name: &str, records: &[Value]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(records).unwrap())
        .expect("Failed to write task file");
    path
}

/// Parse stdout as JSON, panicking with stderr on failure
pub fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}); stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}
