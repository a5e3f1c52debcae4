//! Output format validation tests.
//!
//! Tests JSON/JSONL output format correctness and required field presence.

#![allow(clippy::unwrap_used, clippy::float_cmp)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use part_qa_test_support::{write_fixture, SyntheticImageBuilder};
use serde_json::Value;
use tempfile::TempDir;

/// The binary with config and data directories pointed into `home`.
fn part_qa(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("part-qa").unwrap();
    cmd.current_dir(home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"));
    cmd
}

/// Two clean parts of different sizes.
fn fixtures() -> (TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_fixture(
            dir.path(),
            "a.png",
            &SyntheticImageBuilder::uniform_gray(64, 48, 128),
        )
        .unwrap(),
        write_fixture(
            dir.path(),
            "b.png",
            &SyntheticImageBuilder::rgb_uniform(32, 32, 90, 120, 150),
        )
        .unwrap(),
    ];
    (dir, paths)
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    String::from_utf8(output.stdout).unwrap()
}

// === JSONL Format Tests ===

#[test]
fn test_jsonl_one_object_per_image() {
    let (dir, paths) = fixtures();
    let stdout = stdout_of(part_qa(dir.path()).arg("--format").arg("jsonl").args(&paths));

    let lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let value: Value = serde_json::from_str(line).unwrap();
        assert!(value.is_object(), "JSONL line should be an object");
    }
}

#[test]
fn test_report_fields() {
    let (dir, paths) = fixtures();
    let stdout = stdout_of(part_qa(dir.path()).arg(&paths[0]));
    let report: Value = serde_json::from_str(stdout.trim()).unwrap();

    assert!(report["path"].as_str().unwrap().ends_with("a.png"));
    assert_eq!(report["dimensions"]["width"], 64);
    assert_eq!(report["dimensions"]["height"], 48);

    let timestamp = report["timestamp"].as_str().unwrap();
    assert!(timestamp.contains('T') && timestamp.ends_with('Z'), "{timestamp}");

    let assessment = &report["assessment"];
    assert_eq!(assessment["qualified"], true);
    assert_eq!(assessment["quality_score"].as_f64().unwrap(), 100.0);
    assert_eq!(assessment["defect_score"].as_f64().unwrap(), 0.0);
    assert_eq!(assessment["confidence"].as_f64().unwrap(), 0.95);
    assert!(assessment["defect_type"].is_null());
    assert!(assessment["defect_details"].as_object().unwrap().is_empty());

    // Optional fields are left out unless requested.
    assert!(report.get("features").is_none());
}

#[test]
fn test_failed_report_fields() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_fixture(
        dir.path(),
        "textured.png",
        &SyntheticImageBuilder::checkerboard(64, 64),
    )
    .unwrap();

    let stdout = stdout_of(
        part_qa(dir.path())
            .arg("--pass-threshold")
            .arg("99")
            .arg(&image),
    );
    let report: Value = serde_json::from_str(stdout.trim()).unwrap();
    let assessment = &report["assessment"];

    assert_eq!(assessment["qualified"], false);
    assert!(assessment["defect_type"].is_string());
    let quality = assessment["quality_score"].as_f64().unwrap();
    assert!((0.0..99.0).contains(&quality));
    let confidence = assessment["confidence"].as_f64().unwrap();
    assert!((0.1..=0.95).contains(&confidence));

    let details = assessment["defect_details"].as_object().unwrap();
    assert!(details.contains_key("brightness_anomaly"));
    for score in details.values() {
        let s = score.as_f64().unwrap();
        assert!(s > 0.0 && s <= 1.0);
    }
}

// === JSON Format Tests ===

#[test]
fn test_json_format_is_array() {
    let (dir, paths) = fixtures();
    let stdout = stdout_of(part_qa(dir.path()).arg("--format").arg("json").args(&paths));

    let value: Value = serde_json::from_str(stdout.trim()).unwrap();
    let reports = value.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1]["dimensions"]["width"], 32);
}

#[test]
fn test_json_pretty_output() {
    let (dir, paths) = fixtures();
    let stdout = stdout_of(
        part_qa(dir.path())
            .arg("--format")
            .arg("json")
            .arg("--pretty")
            .arg(&paths[0]),
    );

    assert!(stdout.lines().count() > 5, "pretty output spans lines");
    let value: Value = serde_json::from_str(&stdout).unwrap();
    assert!(value.is_array());
}

#[test]
fn test_json_empty_input_is_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();

    let stdout = stdout_of(part_qa(dir.path()).arg("--format").arg("json").arg(&images));
    assert_eq!(stdout.trim(), "[]");
}

// === Optional Fields ===

#[test]
fn test_features_flag_adds_vector() {
    let (dir, paths) = fixtures();
    let stdout = stdout_of(part_qa(dir.path()).arg("--features").arg(&paths[0]));
    let report: Value = serde_json::from_str(stdout.trim()).unwrap();

    let features = report["features"].as_array().unwrap();
    assert_eq!(features.len(), 98);
    // Gray mean of a uniform 128 image.
    assert_eq!(features[93].as_f64().unwrap(), 128.0);
}
