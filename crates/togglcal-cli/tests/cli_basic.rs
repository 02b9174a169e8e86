//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Only
//! paths that need no network or stored credentials are exercised here;
//! the sync/matcher behavior is covered by the core crate's tests.

use std::process::Command;

/// Run a CLI command and return output. Toggl credentials are scrubbed
/// from the environment so config-dependent commands fail predictably.
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "togglcal-cli", "--"])
        .args(args)
        .env_remove("TOGGL_API_TOKEN")
        .env_remove("TOGGL_WORKSPACE_ID")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_version_command() {
    let (stdout, _, code) = run_cli(&["version"]);
    assert_eq!(code, 0, "version command failed");
    assert!(stdout.contains("TOGGL CALENDAR CONNECTOR"));
}

#[test]
fn test_version_flag() {
    let (stdout, _, code) = run_cli(&["--version"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("togglcal"));
}

#[test]
fn test_help_lists_subcommands() {
    let (stdout, _, code) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("sync"));
    assert!(stdout.contains("current"));
    assert!(stdout.contains("calendars"));
    assert!(stdout.contains("auth"));
}

#[test]
fn test_sync_rejects_days_with_dates() {
    let (_, stderr, code) = run_cli(&["sync", "--days", "7", "--start-date", "2024-03-01"]);
    assert_ne!(code, 0, "conflicting date arguments must fail");
    assert!(stderr.contains("Cannot combine --days"));
}

#[test]
fn test_sync_rejects_inverted_range() {
    let (_, stderr, code) = run_cli(&[
        "sync",
        "--start-date",
        "2024-03-05",
        "--end-date",
        "2024-03-01",
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid date range"));
}

#[test]
fn test_sync_rejects_malformed_date() {
    let (_, _, code) = run_cli(&["sync", "--start-date", "not-a-date"]);
    assert_ne!(code, 0, "malformed date must fail clap parsing");
}

#[test]
fn test_sync_without_credentials_is_fatal() {
    let (_, stderr, code) = run_cli(&["sync"]);
    assert_ne!(code, 0, "missing Toggl credentials must be fatal");
    assert!(stderr.contains("TOGGL_API_TOKEN"));
}
