use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid TOML config for the simulated backend
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[sensor]
refresh_hz = 64
resolution = 3
emissivity = 0.95
interpolate_outliers = true
correct_bad_pixels = true

[display]
min_c = 15.0
max_c = 40.0
scale = 1
scheme = "inferno"
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn thermocam() -> Command {
    Command::cargo_bin("thermocam").unwrap()
}

#[test]
fn help_prints_usage() {
    thermocam()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn self_check_passes_on_the_simulated_sensor() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    thermocam()
        .args(["--config", cfg.to_str().unwrap(), "self-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("self-check ok"));
}

#[test]
fn capture_emits_parseable_json() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let out = thermocam()
        .args(["--config", cfg.to_str().unwrap(), "capture", "--frames", "2"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let frames = doc["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 2);
    for f in frames {
        assert!(f["min_c"].as_f64().unwrap() <= f["max_c"].as_f64().unwrap());
        assert!(f.get("grid").is_none());
    }
    // Chess mode alternates the subpage between the two frames.
    assert_ne!(frames[0]["subpage"], frames[1]["subpage"]);
}

#[test]
fn capture_with_grid_writes_the_full_field_to_a_file() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let out_path = dir.path().join("frames.json");
    thermocam()
        .args([
            "--config",
            cfg.to_str().unwrap(),
            "capture",
            "--frames",
            "1",
            "--grid",
            "--output",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    let grid = doc["frames"][0]["grid"].as_array().unwrap();
    assert_eq!(grid.len(), 24);
    assert_eq!(grid[0].as_array().unwrap().len(), 32);
}

#[test]
fn live_with_a_frame_limit_terminates_and_draws() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    thermocam()
        .args([
            "--config",
            cfg.to_str().unwrap(),
            "live",
            "--frames",
            "2",
            "--fps",
        ])
        .assert()
        .success()
        // Truecolor background escape prefix from the renderer.
        .stdout(predicate::str::contains("\u{1b}[48;2;"));
}

#[rstest]
#[case("[sensor]\nrefresh_hz = 3\n", "refresh_hz")]
#[case("[sensor]\nemissivity = 2.0\n", "emissivity")]
#[case("[display]\nmin_c = 50.0\nmax_c = 20.0\n", "max_c")]
fn invalid_config_fails_with_the_field_named(#[case] toml: &str, #[case] field: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, toml).unwrap();
    thermocam()
        .args(["--config", path.to_str().unwrap(), "self-check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(field));
}

#[test]
fn invalid_refresh_override_maps_to_the_argument_exit_code() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    thermocam()
        .args([
            "--config",
            cfg.to_str().unwrap(),
            "live",
            "--frames",
            "1",
            "--refresh-hz",
            "3",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("refresh rate"));
}

#[test]
fn json_mode_reports_errors_as_structured_output() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let out = thermocam()
        .args([
            "--config",
            cfg.to_str().unwrap(),
            "--json",
            "live",
            "--frames",
            "1",
            "--refresh-hz",
            "5",
        ])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    let line = String::from_utf8_lossy(&out.stderr);
    let json_line = line
        .lines()
        .find(|l| l.trim_start().starts_with('{') && l.contains("\"reason\""))
        .expect("no JSON error line on stderr");
    let v: serde_json::Value = serde_json::from_str(json_line).unwrap();
    assert_eq!(v["reason"], "InvalidArgument");
    assert_eq!(v["exit_code"], 2);
}
