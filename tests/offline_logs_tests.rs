//! End-to-end tests over saved apitrace output
//!
//! Runs the binary with --dump-log/--profile-log so no apitrace install is needed.

use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn glscope_offline() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("glscope");
    cmd.arg("--dump-log")
        .arg(fixture("ibl_frame.dump.txt"))
        .arg("--profile-log")
        .arg(fixture("ibl_frame.pgpu.txt"));
    cmd
}

#[test]
fn test_text_report_tables() {
    glscope_offline()
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Performance by Shader (Cumulative) ==="))
        .stdout(predicate::str::contains("=== Debug Groups (Per Instance) ==="))
        .stdout(predicate::str::contains("shaders/IBL/irradiance.frag"))
        .stdout(predicate::str::contains("[Fixed Function / Clear]"))
        .stdout(predicate::str::contains("100-300"))
        .stdout(predicate::str::contains("4.0*"))
        .stdout(predicate::str::contains("Total Frames: 1"));
}

#[test]
fn test_text_report_shader_order() {
    let output = glscope_offline().output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();

    let irradiance = stdout.find("shaders/IBL/irradiance.frag").unwrap();
    let pbr = stdout.find("shaders/pbr.frag").unwrap();
    let clear = stdout.find("[Fixed Function / Clear]").unwrap();
    assert!(irradiance < pbr);
    assert!(pbr < clear);
}

#[test]
fn test_frames_override_changes_per_frame_average() {
    glscope_offline()
        .arg("--frames")
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0000"))
        .stdout(predicate::str::contains("Total Frames: 4"));
}

#[test]
fn test_json_report() {
    let output = glscope_offline().arg("--format").arg("json").output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let shaders = value["shaders"].as_array().unwrap();
    assert_eq!(shaders.len(), 4);
    assert_eq!(shaders[0]["name"], "shaders/IBL/irradiance.frag");
    assert_eq!(shaders[0]["draws"], 2);
    assert_eq!(shaders[0]["gpu_time_ns"], 4_000_000);
    assert_eq!(shaders[0]["app_timer_ns"], 4_000_000);

    let markers = value["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 3);
    assert_eq!(markers[0]["label"], "IBL: Precompute");
    assert_eq!(markers[0]["is_sum"], true);
    assert_eq!(markers[1]["has_own_timer"], true);
    assert_eq!(markers[2]["calls"], 2);

    assert_eq!(value["summary"]["unmatched_pops"], 1);
    assert_eq!(value["summary"]["rows_skipped"], 1);
}

#[test]
fn test_csv_report() {
    glscope_offline()
        .arg("--format")
        .arg("csv")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("shader,draws,gpu_time_ns,app_timer_ns"))
        .stdout(predicate::str::contains("shaders/pbr.frag,1,2000000,0"))
        .stdout(predicate::str::contains("0,IBL: Irradiance,110,200,2,4000000,4000000,true,false"));
}

#[test]
fn test_narrow_timer_window_drops_own_timer() {
    let output = glscope_offline()
        .arg("--format")
        .arg("json")
        .arg("--timer-window")
        .arg("0")
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    for marker in value["markers"].as_array().unwrap() {
        assert_eq!(marker["timer_ns"], 0);
    }
}

#[test]
fn test_config_file_changes_policy() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("glscope.toml");
    std::fs::write(
        &config,
        "[attribution]\nshader_markers = []\nlabel_markers = [\"Opaque\"]\n",
    )
    .unwrap();

    let output = glscope_offline()
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    // No IBL-tagged pairs any more, and "Opaque Pass" has no own timer.
    for shader in value["shaders"].as_array().unwrap() {
        assert_eq!(shader["app_timer_ns"], 0);
    }
}

#[test]
fn test_missing_header_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let profile = dir.path().join("pgpu.txt");
    std::fs::write(&profile, "call 150 0 3000000 1\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("glscope");
    cmd.arg("--dump-log")
        .arg(fixture("ibl_frame.dump.txt"))
        .arg("--profile-log")
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("profiling header"));
}

#[test]
fn test_missing_column_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let profile = dir.path().join("pgpu.txt");
    std::fs::write(&profile, "# no program\ncall 150 1\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("glscope");
    cmd.arg("--dump-log")
        .arg(fixture("ibl_frame.dump.txt"))
        .arg("--profile-log")
        .arg(&profile)
        .assert()
        .failure()
        .stderr(predicate::str::contains("gpu_dura"));
}

#[test]
fn test_missing_dump_file_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("glscope");
    cmd.arg("--dump-log")
        .arg("/nonexistent/dump.txt")
        .arg("--profile-log")
        .arg(fixture("ibl_frame.pgpu.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}

#[test]
fn test_no_arguments_shows_usage_error() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("glscope");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_trace_with_offline_logs_rejected() {
    glscope_offline()
        .arg("frame.trace")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
