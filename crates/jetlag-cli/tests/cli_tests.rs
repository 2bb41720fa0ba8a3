//! Integration tests for the `jetlag` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the compute, grid
//! and offset subcommands through the actual binary, including stdin/stdout
//! piping, file I/O, zone overrides and the JSON error contract.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).expect("fixture must exist")
}

fn jetlag() -> Command {
    Command::cargo_bin("jetlag").unwrap()
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// compute
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn compute_stdin_to_stdout() {
    let output = jetlag()
        .arg("compute")
        .write_stdin(read_fixture("london_singapore.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    let events = json["events"].as_array().unwrap();
    assert_eq!(events.len(), 41);
    assert_eq!(events[0]["kind"], "sleep");
    assert_eq!(events[0]["start"], "2025-05-30T23:00:00Z");
    assert!(events.iter().all(|e| e["phase_direction"] == "advance"));
}

#[test]
fn compute_file_to_file() {
    let output_path = std::env::temp_dir().join("jetlag-test-compute-output.json");
    let _ = std::fs::remove_file(&output_path);

    jetlag()
        .args(["compute", "-i", fixture("london_singapore.json").as_str(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["events"].as_array().unwrap().len(), 41);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn compute_pretty_prints() {
    jetlag()
        .args(["compute", "--pretty", "-i", fixture("london_singapore.json").as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"events\": ["));
}

#[test]
fn compute_reports_validation_error_as_json() {
    let output = jetlag()
        .args(["compute", "-i", fixture("invalid_time.json").as_str()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert!(json["error"].as_str().unwrap().contains("25:00"));
    assert!(json.get("events").is_none());
}

#[test]
fn compute_reports_oversized_pre_days_as_json() {
    let output = jetlag()
        .args(["compute", "-i", fixture("oversized_pre_days.json").as_str()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert!(json["error"].as_str().unwrap().contains("Invalid preDays"));
}

#[test]
fn compute_reports_malformed_json() {
    let output = jetlag()
        .arg("compute")
        .write_stdin("{not json")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert!(json["error"].as_str().unwrap().contains("Invalid request JSON"));
}

#[test]
fn compute_honors_max_days() {
    let output = jetlag()
        .args(["compute", "--max-days", "5", "-i", fixture("london_singapore.json").as_str()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("did not converge within 5 days"));
}

#[test]
fn compute_resolves_offsets_from_zones() {
    // London is on BST (UTC+1) in June; Singapore is UTC+8.
    let output = jetlag()
        .args([
            "compute",
            "--origin-tz",
            "Europe/London",
            "--dest-tz",
            "Asia/Singapore",
            "-i",
            fixture("zoneless.json").as_str(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    let events = json["events"].as_array().unwrap();
    assert!(events.iter().all(|e| e["signed_initial_diff_hours"] == -7.0));
    let travel = events.iter().find(|e| e["kind"] == "travel").unwrap();
    assert_eq!(travel["start"], "2025-06-01T09:00:00Z");
    assert_eq!(travel["end"], "2025-06-01T22:00:00Z");
}

#[test]
fn compute_rejects_unknown_zone() {
    let output = jetlag()
        .args(["compute", "--dest-tz", "Atlantis/Capital", "-i", fixture("zoneless.json").as_str()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert!(json["error"].as_str().unwrap().contains("Atlantis/Capital"));
}

// ─────────────────────────────────────────────────────────────────────────────
// grid
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn grid_renders_rows_per_day() {
    jetlag()
        .args(["grid", "-i", fixture("london_singapore.json").as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-05-30 |"))
        .stdout(predicate::str::contains("2025-06-10 |"))
        .stdout(predicate::str::contains("TTTTTTTTTTTTTTTTTTTTTTTT"))
        .stdout(predicate::str::contains("M melatonin"));
}

#[test]
fn grid_error_goes_to_stderr() {
    jetlag()
        .args(["grid", "-i", fixture("invalid_time.json").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("25:00"));
}

// ─────────────────────────────────────────────────────────────────────────────
// offset
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn offset_prints_hours() {
    jetlag()
        .args(["offset", "Asia/Kolkata", "2025-01-15T12:00"])
        .assert()
        .success()
        .stdout("5.5\n");

    jetlag()
        .args(["offset", "America/New_York", "2025-07-01T09:00"])
        .assert()
        .success()
        .stdout("-4\n");
}

#[test]
fn offset_rejects_unknown_zone() {
    jetlag()
        .args(["offset", "Nowhere/Special", "2025-01-15T12:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn missing_subcommand_shows_usage() {
    jetlag()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
