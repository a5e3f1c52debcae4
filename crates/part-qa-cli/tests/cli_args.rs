//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use part_qa_test_support::{write_fixture, SyntheticImageBuilder};
use predicates::prelude::*;
use tempfile::TempDir;

/// A temp dir holding one clean part image, `clean.png`.
fn clean_fixture() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "clean.png",
        &SyntheticImageBuilder::uniform_gray(64, 64, 128),
    )
    .unwrap();
    (dir, path)
}

/// The binary with config and data directories pointed into `home`.
fn part_qa(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("part-qa").unwrap();
    cmd.current_dir(home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"));
    cmd
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    let dir = tempfile::tempdir().unwrap();
    part_qa(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No paths specified"));
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    let dir = tempfile::tempdir().unwrap();
    part_qa(dir.path())
        .arg("/nonexistent/path/to/part.png")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();

    part_qa(dir.path())
        .arg(&images)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_corrupt_image_exits_with_error() {
    let (dir, _) = clean_fixture();
    let broken = dir.path().join("broken.png");
    std::fs::write(&broken, b"not a png").unwrap();

    part_qa(dir.path())
        .arg(&broken)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Skipping"));
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    let (dir, image) = clean_fixture();
    part_qa(dir.path())
        .arg("--format")
        .arg("xml")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

#[test]
fn test_valid_formats_accepted() {
    let (dir, image) = clean_fixture();
    for format in ["json", "jsonl"] {
        part_qa(dir.path())
            .arg("--format")
            .arg(format)
            .arg(&image)
            .assert()
            .code(0);
    }
}

// === Threshold Validation Tests ===

#[test]
fn test_pass_threshold_above_hundred_rejected() {
    let (dir, image) = clean_fixture();
    part_qa(dir.path())
        .arg("--pass-threshold")
        .arg("150")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("0..=100"));
}

#[test]
fn test_pass_threshold_negative_rejected() {
    let (dir, image) = clean_fixture();
    part_qa(dir.path())
        .arg("--pass-threshold=-5")
        .arg(&image)
        .assert()
        .failure();
}

#[test]
fn test_pass_threshold_non_numeric_rejected() {
    let (dir, image) = clean_fixture();
    part_qa(dir.path())
        .arg("--pass-threshold")
        .arg("strict")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_valid_threshold_boundaries() {
    let (dir, image) = clean_fixture();
    // A flawless part scores exactly 100, so it passes at both ends.
    for threshold in ["0", "100"] {
        part_qa(dir.path())
            .arg("--pass-threshold")
            .arg(threshold)
            .arg(&image)
            .assert()
            .code(0);
    }
}

// === Subcommands ===

#[test]
fn test_explicit_inspect_subcommand() {
    let (dir, image) = clean_fixture();
    part_qa(dir.path())
        .arg("inspect")
        .arg(&image)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"qualified\":true"));
}

#[test]
fn test_help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    part_qa(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inspect").and(predicate::str::contains("history")));
}

#[test]
fn test_history_requires_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    part_qa(dir.path()).arg("history").assert().failure();
}

// === Verbosity Level Tests ===

#[test]
fn test_verbosity_levels() {
    let (dir, image) = clean_fixture();
    for flag in ["-v", "-vv", "-vvv"] {
        part_qa(dir.path()).arg(flag).arg(&image).assert().code(0);
    }
}

#[test]
fn test_debug_logging_reports_measurements() {
    let (dir, image) = clean_fixture();
    part_qa(dir.path())
        .arg("-vv")
        .arg(&image)
        .assert()
        .code(0)
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn test_quiet_suppresses_progress() {
    let (dir, _) = clean_fixture();
    let broken = dir.path().join("broken.png");
    std::fs::write(&broken, b"garbage").unwrap();

    part_qa(dir.path())
        .arg("--quiet")
        .arg(&broken)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Skipping").not());
}
