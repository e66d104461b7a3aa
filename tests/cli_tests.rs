//! Command-line tests for the `time-tracker` binary.
//!
//! Every test points `--data-dir` at a temporary directory so the user's
//! real state is never touched.

use assert_cmd::Command;
use predicates::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn tracker(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("time-tracker").unwrap();
    cmd.arg("--data-dir").arg(dir.path()).env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// One-shot Commands
// ============================================================================

#[test]
fn test_status_on_fresh_data_dir() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Remaining:    25:00"))
        .stdout(predicate::str::contains("Work length:  25 min"))
        .stdout(predicate::str::contains("Break length: 5 min"));
}

#[test]
fn test_status_uses_configured_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp)
        .args(["--work", "50", "--break-time", "10", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remaining:    50:00"))
        .stdout(predicate::str::contains("Break length: 10 min"));
}

#[test]
fn test_set_work_is_persisted() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp)
        .args(["set-work", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remaining:    30:00"));

    tracker(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Work length:  30 min"));

    assert!(tmp.path().join("storage.json").is_file());
}

#[test]
fn test_set_break_is_persisted() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp).args(["set-break", "15"]).assert().success();

    tracker(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Break length: 15 min"))
        .stdout(predicate::str::contains("Remaining:    25:00"));
}

#[test]
fn test_reset_restores_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp).args(["set-work", "45"]).assert().success();
    tracker(&tmp).args(["set-break", "20"]).assert().success();

    tracker(&tmp)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Work length:  25 min"))
        .stdout(predicate::str::contains("Break length: 5 min"));
}

#[test]
fn test_corrupt_storage_file_is_tolerated() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("storage.json"), "{{{ not json").unwrap();

    tracker(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Remaining:    25:00"));
}

// ============================================================================
// Interactive Session
// ============================================================================

#[test]
fn test_run_session_applies_commands() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp)
        .args(["run", "--no-sound"])
        .write_stdin("w+\nb 12\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("work 26m"))
        .stdout(predicate::str::contains("break 12m"));

    tracker(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Work length:  26 min"))
        .stdout(predicate::str::contains("Break length: 12 min"));
}

#[test]
fn test_run_is_the_default_command() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp)
        .arg("--no-sound")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_run_session_reports_unknown_input() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp)
        .args(["run", "--no-sound"])
        .write_stdin("dance\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown command"));
}

#[test]
fn test_run_session_ends_on_eof() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp)
        .args(["run", "--bell"])
        .write_stdin("")
        .assert()
        .success();
}

// ============================================================================
// Argument Errors
// ============================================================================

#[test]
fn test_out_of_range_lengths_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp).args(["set-work", "0"]).assert().failure();
    tracker(&tmp).args(["set-work", "61"]).assert().failure();
    tracker(&tmp).args(["--break-time", "99", "status"]).assert().failure();
}

#[test]
fn test_completions_bash() {
    let tmp = tempfile::tempdir().unwrap();
    tracker(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("time-tracker"));
}
