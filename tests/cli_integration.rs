//! Integration tests for the `wrok` CLI.
//!
//! Each test points `WROK_HOME` at a temp directory, runs `wrok` as a
//! subprocess, and checks stdout and the store file.

use std::fs;
use std::path::Path;
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn run_wrok(home: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_wrok"))
        .args(args)
        .env("WROK_HOME", home)
        .env_remove("WROK_LOG")
        .output()
        .expect("failed to run wrok");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn run_wrok_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_wrok(home, args);
    if !success {
        panic!(
            "wrok {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn run_wrok_err(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_wrok(home, args);
    assert!(!success, "wrok {:?} should fail, got: {}", args, stdout);
    stderr
}

fn list_json(home: &Path, extra: &[&str]) -> serde_json::Value {
    let mut args = vec!["ls", "--json"];
    args.extend_from_slice(extra);
    serde_json::from_str(&run_wrok_ok(home, &args)).unwrap()
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[test]
fn test_add_with_inline_metadata() {
    let home = TempDir::new().unwrap();
    let out = run_wrok_ok(
        home.path(),
        &["add", "Fix login #bug,auth @backend +high api-12"],
    );
    assert!(out.starts_with("Created task #1: Fix login\n"));
    assert!(out.contains("  Project: backend"));
    assert!(out.contains("  Tags: bug, auth"));
    assert!(out.contains("  Priority: high"));
    assert!(out.contains("  Ticket: API-12"));

    assert!(home.path().join("wrok.json").exists());
    let tasks = list_json(home.path(), &[]);
    assert_eq!(tasks[0]["ticket"], "API-12");
    assert_eq!(tasks[0]["tags"], serde_json::json!(["bug", "auth"]));
}

#[test]
fn test_add_rejects_bad_due_date() {
    let home = TempDir::new().unwrap();
    let err = run_wrok_err(home.path(), &["add", "Ship", "--due", "someday"]);
    assert!(err.starts_with("error: invalid date format"));
}

#[test]
fn test_form_flags_are_checked_before_the_form_opens() {
    let home = TempDir::new().unwrap();
    let err = run_wrok_err(home.path(), &["add", "-i", "Ship", "--priority", "urgent"]);
    assert!(err.contains("invalid priority 'urgent'"));
    assert_eq!(list_json(home.path(), &[]), serde_json::json!([]));
}

#[test]
fn test_list_plain_table_newest_first() {
    let home = TempDir::new().unwrap();
    run_wrok_ok(home.path(), &["add", "First"]);
    run_wrok_ok(home.path(), &["add", "Second", "-p", "web"]);
    let out = run_wrok_ok(home.path(), &["ls", "--no-ui"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("ID   TITLE"));
    assert!(lines[2].starts_with("2    Second"));
    assert!(lines[3].starts_with("1    First"));
}

#[test]
fn test_list_empty() {
    let home = TempDir::new().unwrap();
    assert_eq!(run_wrok_ok(home.path(), &["list", "--no-ui"]), "No tasks found.\n");
    assert_eq!(run_wrok_ok(home.path(), &["ls", "--json"]).trim(), "[]");
}

#[test]
fn test_status_filters() {
    let home = TempDir::new().unwrap();
    run_wrok_ok(home.path(), &["add", "One"]);
    run_wrok_ok(home.path(), &["add", "Two"]);
    run_wrok_ok(home.path(), &["done", "1"]);
    let done = list_json(home.path(), &["--status", "done"]);
    assert_eq!(done.as_array().unwrap().len(), 1);
    assert_eq!(done[0]["id"], 1);

    let err = run_wrok_err(home.path(), &["ls", "--json", "-s", "blocked"]);
    assert!(err.contains("invalid status 'blocked'"));
}

#[test]
fn test_done_undone_archive_cycle() {
    let home = TempDir::new().unwrap();
    run_wrok_ok(home.path(), &["add", "Cycle"]);

    let out = run_wrok_ok(home.path(), &["done", "1"]);
    assert!(out.starts_with("Marked task #1 as done: Cycle"));
    let err = run_wrok_err(home.path(), &["done", "1"]);
    assert_eq!(err.trim(), "error: task #1 is already completed");

    run_wrok_ok(home.path(), &["undone", "1"]);
    run_wrok_ok(home.path(), &["archive", "1"]);
    assert_eq!(list_json(home.path(), &[])[0]["status"], "archived");
    run_wrok_ok(home.path(), &["ua", "1"]);
    assert_eq!(list_json(home.path(), &[])[0]["status"], "todo");

    let err = run_wrok_err(home.path(), &["archive", "42"]);
    assert_eq!(err.trim(), "error: task #42 not found");
}

#[test]
fn test_edit_fields() {
    let home = TempDir::new().unwrap();
    run_wrok_ok(home.path(), &["add", "Draft", "--note", "old"]);
    let out = run_wrok_ok(
        home.path(),
        &["edit", "1", "--title", "Final", "--ticket", "ops-7", "--note", ""],
    );
    assert!(out.starts_with("Updated task #1: Final"));
    let task = &list_json(home.path(), &[])[0];
    assert_eq!(task["ticket"], "OPS-7");
    assert!(task.get("notes").is_none());
}

#[test]
fn test_search_ranks_by_tier() {
    let home = TempDir::new().unwrap();
    run_wrok_ok(home.path(), &["add", "Write API docs"]);
    run_wrok_ok(home.path(), &["add", "API"]);
    run_wrok_ok(home.path(), &["add", "API client"]);
    run_wrok_ok(home.path(), &["add", "Unrelated"]);

    let out = run_wrok_ok(home.path(), &["search", "api", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["query"], "api");
    assert_eq!(json["count"], 3);
    let ids: Vec<u64> = json["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 3, 1]);

    let out = run_wrok_ok(home.path(), &["search", "nothing-here"]);
    assert!(out.contains("No tasks found matching your search."));
}

// ---------------------------------------------------------------------------
// Time tracking
// ---------------------------------------------------------------------------

#[test]
fn test_start_status_stop() {
    let home = TempDir::new().unwrap();
    run_wrok_ok(home.path(), &["add", "Deep work"]);
    run_wrok_ok(home.path(), &["add", "Other"]);

    assert_eq!(
        run_wrok_ok(home.path(), &["status"]),
        "No active time tracking session\n"
    );

    let out = run_wrok_ok(home.path(), &["start", "1", "--no-ui"]);
    assert!(out.starts_with("Started tracking time for task #1: Deep work"));

    let err = run_wrok_err(home.path(), &["start", "2", "--no-ui"]);
    assert!(err.contains("session already active for task #1"));

    let out = run_wrok_ok(home.path(), &["status"]);
    assert!(out.starts_with("Currently tracking: task #1: Deep work"));

    let out = run_wrok_ok(home.path(), &["stop"]);
    assert!(out.starts_with("Stopped tracking time for task #1: Deep work"));
    assert!(out.contains("Session duration: "));

    let err = run_wrok_err(home.path(), &["stop"]);
    assert_eq!(err.trim(), "error: no active session found");
}

#[test]
fn test_done_stops_running_session() {
    let home = TempDir::new().unwrap();
    run_wrok_ok(home.path(), &["add", "Finish me"]);
    run_wrok_ok(home.path(), &["start", "1", "--no-ui"]);
    run_wrok_ok(home.path(), &["done", "1"]);
    assert_eq!(
        run_wrok_ok(home.path(), &["status"]),
        "No active time tracking session\n"
    );
}

#[test]
fn test_timesheet_empty_week() {
    let home = TempDir::new().unwrap();
    assert_eq!(
        run_wrok_ok(home.path(), &["timesheet"]),
        "No time tracked this week.\n"
    );
}

// ---------------------------------------------------------------------------
// Ambient
// ---------------------------------------------------------------------------

#[test]
fn test_bad_config_is_reported() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("config.toml"), "[ui\n").unwrap();
    let err = run_wrok_err(home.path(), &["status"]);
    assert!(err.starts_with("error: could not parse"));
}

#[test]
fn test_log_file_written() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("config.toml"), "[log]\nlevel = \"info\"\n").unwrap();
    run_wrok_ok(home.path(), &["add", "Logged"]);
    let log = fs::read_to_string(home.path().join("logs").join("wrok.log")).unwrap();
    assert!(log.contains("task created"));
}
