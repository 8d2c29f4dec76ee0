use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use tempfile::tempdir;

// Non-interactive CLI paths: listing and importing plans need no TTY.
fn repflow(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("repflow").unwrap();
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_STATE_HOME");
    cmd
}

#[test]
fn list_builtin_plans() {
    let home = tempdir().unwrap();
    let output = repflow(home.path())
        .args(["--list", "--source", "builtin"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("full-body"));
    assert!(stdout.contains("core-blast"));
    assert!(stdout.contains("upper-lower"));
}

#[test]
fn import_csv_then_list_library() {
    let home = tempdir().unwrap();
    let csv = home.path().join("plans.csv");
    let db = home.path().join("library.db");
    fs::write(
        &csv,
        "plan,exercise,muscle_group,sets,reps,media\n\
         legs,Squat,legs,4,5,\n\
         legs,Lunge,legs,3,12,\n",
    )
    .unwrap();

    repflow(home.path())
        .arg("--import-csv")
        .arg(&csv)
        .arg("--file")
        .arg(&db)
        .assert()
        .success();

    let output = repflow(home.path())
        .args(["--list", "--source", "sqlite", "--file"])
        .arg(&db)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("legs"));
    assert!(stdout.contains("2 exercises, 7 sets"));
}

#[test]
fn csv_source_without_file_fails() {
    let home = tempdir().unwrap();
    repflow(home.path())
        .args(["--list", "--source", "csv"])
        .assert()
        .failure();
}

#[test]
fn tui_refuses_without_tty() {
    let home = tempdir().unwrap();
    repflow(home.path())
        .args(["--source", "builtin"])
        .stdin(std::process::Stdio::null())
        .assert()
        .failure();
}

#[test]
#[cfg(target_os = "linux")]
fn save_config_writes_overrides() {
    let home = tempdir().unwrap();
    repflow(home.path())
        .args(["--list", "--save-config", "--rest-secs", "60", "-p", "core-blast"])
        .assert()
        .success();

    let saved = fs::read_to_string(home.path().join(".config/repflow/config.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["rest_secs"], 60);
    assert_eq!(saved["default_plan"], "core-blast");
}
