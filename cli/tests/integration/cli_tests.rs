//! Integration tests for the gondor CLI skeleton and account commands.
//!
//! Every test points `GONDOR_CONFIG` at a temp file so the user's real
//! config is never read or written.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gondor(config: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gondor"));
    cmd.env("NO_COLOR", "1")
        .env("GONDOR_CONFIG", config.path().join("config.yml"))
        .env_remove("GONDOR_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn logged_in_config() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("config.yml"),
        "client:\n  auth:\n    username: ada\n    access_token: a1\n    refresh_token: r1\n",
    )
    .expect("write config");
    dir
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    let dir = TempDir::new().expect("temp dir");
    gondor(&dir).assert().code(2).stderr(predicate::str::contains(
        "Command-line client for the Gondor platform",
    ));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().expect("temp dir");
    let output = gondor(&dir).arg("--help").output().expect("run gondor");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["login", "logout", "whoami", "run", "attach", "wait", "deploy"] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }
}

#[test]
fn test_version_flag_shows_version() {
    let dir = TempDir::new().expect("temp dir");
    gondor(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gondor 0.1.0"));
}

#[test]
fn test_run_requires_a_command() {
    let dir = TempDir::new().expect("temp dir");
    gondor(&dir)
        .args(["run", "https://api.example/v2/instances/1/"])
        .assert()
        .code(2);
}

// --- Account commands ---

#[test]
fn test_whoami_when_logged_out_fails() {
    let dir = TempDir::new().expect("temp dir");
    gondor(&dir)
        .arg("whoami")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: not logged in"));
}

#[test]
fn test_whoami_prints_stored_username() {
    let dir = logged_in_config();
    gondor(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::diff("ada\n"));
}

#[test]
fn test_logout_when_logged_out_fails() {
    let dir = TempDir::new().expect("temp dir");
    gondor(&dir)
        .arg("logout")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_login_refuses_when_already_logged_in() {
    let dir = logged_in_config();
    gondor(&dir)
        .args(["login", "--username", "bob"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already logged in as ada"));
}

#[test]
fn test_unparseable_config_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("config.yml"), "client: [").expect("write");
    gondor(&dir)
        .arg("whoami")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}
