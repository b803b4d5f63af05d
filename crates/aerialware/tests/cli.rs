#![cfg(feature = "cli")]

use aerialware::{MissionReport, Stage};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const MISSION: &str = r#"{
  "image": { "width": 1000, "height": 1000 },
  "corners": {
    "top_left": [0.0, 1.0],
    "top_right": [1.0, 1.0],
    "bottom_left": [0.0, 0.0],
    "bottom_right": [1.0, 0.0]
  },
  "delimiter": { "longitude": 0.1, "latitude": 0.1 },
  "selection": [[0, 0], [0, 1], [1, 1]],
  "camera": { "ground_resolution_m_per_px": 0.5, "flight_height_m": 1200.0 }
}"#;

#[test]
fn writes_report_for_valid_mission() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("mission.json");
    let report = dir.path().join("report.json");
    fs::write(&config, MISSION).expect("write config");

    Command::cargo_bin("aerialware")
        .expect("binary")
        .arg(&config)
        .arg("--output")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("grid: 10 x 10 cells, 3 selected"))
        .stdout(predicate::str::contains("meridian"));

    let raw = fs::read_to_string(&report).expect("read report");
    assert!(raw.contains("\"meridian\""));
    let parsed = MissionReport::load_json(&report).expect("parse report");
    assert_eq!(parsed.stage, Some(Stage::MetricsComputed));
    assert!(parsed.error.is_none());
    let horizontal = parsed.horizontal.expect("horizontal");
    assert_eq!(horizontal.path.leg_count(), 2);
    assert_eq!(horizontal.waypoints.len(), 4);
}

#[test]
fn planning_error_is_reported_and_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("mission.json");
    let report = dir.path().join("report.json");
    let broken = MISSION.replace("\"longitude\": 0.1", "\"longitude\": 0.0");
    fs::write(&config, broken).expect("write config");

    Command::cargo_bin("aerialware")
        .expect("binary")
        .arg(&config)
        .arg("-o")
        .arg(&report)
        .assert()
        .failure();

    let parsed = MissionReport::load_json(&report).expect("parse report");
    let error = parsed.error.expect("error recorded");
    assert!(error.contains("longitude"), "unexpected error: {error}");
    assert!(parsed.grid.is_none());
}

#[test]
fn malformed_config_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("mission.json");
    fs::write(&config, "{ not json").expect("write config");

    Command::cargo_bin("aerialware")
        .expect("binary")
        .arg(&config)
        .current_dir(dir.path())
        .assert()
        .failure();
}
