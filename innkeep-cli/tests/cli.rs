//! General CLI behavior tests: help, global options, init, validate.

mod common;

use assert_cmd::prelude::*;
use assert_cmd::Command;
use predicates::prelude::*;

use common::TestEnv;

fn innkeep_cmd() -> Command {
    Command::cargo_bin("innkeep").unwrap()
}

#[test]
fn help_lists_commands() {
    innkeep_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("book"))
        .stdout(predicate::str::contains("confirm"))
        .stdout(predicate::str::contains("sweep"))
        .stdout(predicate::str::contains("check-in"));
}

#[test]
fn version_flag_works() {
    innkeep_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("innkeep"));
}

#[test]
fn init_creates_database() {
    let env = TestEnv::new();
    assert!(env.data_dir().join("innkeep.db").exists());
}

#[test]
fn init_dry_run_creates_nothing() {
    let dir = tempfile::TempDir::new().unwrap();
    let target = dir.path().join("data");

    Command::cargo_bin("innkeep")
        .unwrap()
        .arg("--data-dir")
        .arg(&target)
        .args(["init", "--dry-run"])
        .assert()
        .success();

    assert!(!target.exists());
}

#[test]
fn show_data_dir_prints_override() {
    let env = TestEnv::new();
    let output = env.cmd().arg("show-data-dir").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), env.data_dir().to_str().unwrap());
}

#[test]
fn disable_autoinit_refuses_missing_database() {
    let dir = tempfile::TempDir::new().unwrap();

    let output = Command::cargo_bin("innkeep")
        .unwrap()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--disable-autoinit")
        .args(["list"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn validate_accepts_good_config() {
    let env = TestEnv::new();
    std::fs::write(
        env.data_dir().join("config.yaml"),
        "booking:\n  hold_minutes: 30\n",
    )
    .unwrap();

    env.cmd().arg("validate").assert().success();
}

#[test]
fn validate_rejects_bad_config() {
    let env = TestEnv::new();
    std::fs::write(
        env.data_dir().join("config.yaml"),
        "booking:\n  hold_minutes: 0\n",
    )
    .unwrap();

    let output = env.cmd().arg("validate").output().unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn validate_missing_file_fails() {
    let env = TestEnv::new();
    let output = env.cmd().arg("validate").output().unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn seed_rejects_malformed_catalog() {
    let env = TestEnv::new();
    let catalog = env.data_dir().join("bad.yaml");
    std::fs::write(&catalog, "room_types: not-a-list\n").unwrap();

    let output = env
        .cmd()
        .args(["seed", "--file"])
        .arg(&catalog)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn completions_generate_for_bash() {
    innkeep_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("innkeep"));
}
