//! Integration tests for the command-line interface

mod common;

use assert_cmd::Command;
use common::{crash, session, to_json_lines};
use crash_aggregates::OutputRow;
use std::fs;
use tempfile::TempDir;

fn binary() -> Command {
    Command::cargo_bin("crash-aggregates").unwrap()
}

#[test]
fn test_aggregate_writes_partition() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let records = vec![session(3600, "DE"), session(3600, "DE"), crash("DE")];
    let mut contents = to_json_lines(&records);
    contents.push_str("not json\n");
    fs::write(input.path().join("20160305.jsonl"), contents).unwrap();

    let assert = binary()
        .env_remove("CRASH_AGGREGATES_CONFIG")
        .current_dir(input.path())
        .args(["aggregate", "--from", "20160305", "--input"])
        .arg(input.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("20160305"));
    assert!(stdout.contains("rows=1"));
    assert!(stdout.contains("malformed_lines=1"));

    let partition = output
        .path()
        .join("submission_date=20160305")
        .join("part-00000.jsonl");
    let written = fs::read_to_string(partition).unwrap();
    let rows: Vec<OutputRow> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].stat("ping_count"), Some(3.0));
    assert_eq!(rows[0].stat("main_crashes"), Some(1.0));
    assert_eq!(rows[0].stat("usage_hours"), Some(2.0));
}

#[test]
fn test_aggregate_range_writes_every_window() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    binary()
        .env_remove("CRASH_AGGREGATES_CONFIG")
        .current_dir(input.path())
        .args(["aggregate", "--from", "20160301", "--to", "20160303", "--no-parallel", "--input"])
        .arg(input.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();

    for day in ["20160301", "20160302", "20160303"] {
        let partition = output
            .path()
            .join(format!("submission_date={day}"))
            .join("part-00000.jsonl");
        assert_eq!(fs::read_to_string(partition).unwrap(), "");
    }
}

#[test]
fn test_reversed_range_fails() {
    let dir = TempDir::new().unwrap();
    binary()
        .env_remove("CRASH_AGGREGATES_CONFIG")
        .current_dir(dir.path())
        .args([
            "aggregate", "--from", "20160303", "--to", "20160301", "--input", "in", "--output",
            "out",
        ])
        .assert()
        .failure();
}

#[test]
fn test_invalid_window_date_rejected() {
    binary()
        .args(["aggregate", "--from", "2016-03-01", "--input", "in", "--output", "out"])
        .assert()
        .failure();
}

#[test]
fn test_dimensions_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(
        &config,
        r#"
dimensions = [
    { path = ["geoCountry"], name = "country" },
    { path = ["environment.build", "buildId"], name = "build_id" },
]
"#,
    )
    .unwrap();

    let assert = binary()
        .args(["dimensions", "--config"])
        .arg(&config)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("country"));
    assert!(lines[1].ends_with("environment.build / buildId"));
}

#[test]
fn test_init_then_dimensions() {
    let dir = TempDir::new().unwrap();

    binary().current_dir(dir.path()).arg("init").assert().success();
    assert!(dir.path().join(".crash-aggregates.toml").exists());
    binary().current_dir(dir.path()).arg("init").assert().failure();

    let assert = binary()
        .env_remove("CRASH_AGGREGATES_CONFIG")
        .current_dir(dir.path())
        .arg("dimensions")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 12);
}
