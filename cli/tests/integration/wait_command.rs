//! End-to-end `gondor wait` against a local API server.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn config_for(server: &MockServer) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let yaml = format!(
        "client:\n  base_url: {base}\n  identity_url: {base}\n  auth:\n    username: ada\n    access_token: old-access\n    refresh_token: old-refresh\n",
        base = server.base_url()
    );
    std::fs::write(dir.path().join("config.yml"), yaml).expect("write config");
    dir
}

fn gondor(config: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gondor"));
    cmd.env("NO_COLOR", "1")
        .env("GONDOR_CONFIG", config.path().join("config.yml"))
        .env_remove("GONDOR_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_wait_succeeds_when_instance_is_running() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/instances/1/")
            .header("authorization", "Bearer old-access");
        then.status(200)
            .json_body(json!({"url": server.url("/v2/instances/1/"), "state": "running"}));
    });
    let dir = config_for(&server);

    gondor(&dir)
        .args(["wait", &server.url("/v2/instances/1/"), "--timeout-secs", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Instance is running"));
    mock.assert();
}

#[test]
fn test_wait_reports_unknown_state() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/instances/1/");
        then.status(200).json_body(json!({"url": "u", "state": "crashed"}));
    });
    let dir = config_for(&server);

    gondor(&dir)
        .args(["wait", &server.url("/v2/instances/1/"), "--timeout-secs", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown instance state: crashed"));
}

#[test]
fn test_wait_refreshes_expired_token_and_persists_it() {
    let server = MockServer::start();
    let rejected = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/instances/1/")
            .header("authorization", "Bearer old-access");
        then.status(401);
    });
    let token = server.mock(|when, then| {
        when.method(POST)
            .path("/oauth/token/")
            .body_includes("grant_type=refresh_token");
        then.status(200)
            .json_body(json!({"access_token": "new-access", "refresh_token": "new-refresh"}));
    });
    let accepted = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/instances/1/")
            .header("authorization", "Bearer new-access");
        then.status(200).json_body(json!({"url": "u", "state": "running"}));
    });
    let dir = config_for(&server);

    gondor(&dir)
        .args(["wait", &server.url("/v2/instances/1/"), "--timeout-secs", "5"])
        .assert()
        .success();

    rejected.assert();
    token.assert();
    accepted.assert();
    let saved = std::fs::read_to_string(dir.path().join("config.yml")).expect("read config");
    assert!(saved.contains("new-access"), "{saved}");
    assert!(saved.contains("new-refresh"), "{saved}");
}

#[test]
fn test_wait_server_error_shows_retry_hint() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/instances/1/");
        then.status(502);
    });
    let dir = config_for(&server);

    gondor(&dir)
        .args(["wait", &server.url("/v2/instances/1/"), "--timeout-secs", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Bad Gateway"))
        .stderr(predicate::str::contains("try again later"));
}

#[test]
fn test_api_url_override_is_not_persisted_on_refresh() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/v2/instances/1/")
            .header("authorization", "Bearer old-access");
        then.status(401);
    });
    server.mock(|when, then| {
        when.method(POST).path("/oauth/token/");
        then.status(200)
            .json_body(json!({"access_token": "new-access", "refresh_token": "new-refresh"}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/v2/instances/1/")
            .header("authorization", "Bearer new-access");
        then.status(200).json_body(json!({"url": "u", "state": "running"}));
    });
    let dir = TempDir::new().expect("temp dir");
    let yaml = format!(
        "client:\n  base_url: https://api.stored.example\n  identity_url: {}\n  auth:\n    username: ada\n    access_token: old-access\n    refresh_token: old-refresh\n",
        server.base_url()
    );
    std::fs::write(dir.path().join("config.yml"), yaml).expect("write config");

    gondor(&dir)
        .args(["--api-url", "http://one-off.example"])
        .args(["wait", &server.url("/v2/instances/1/"), "--timeout-secs", "5"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(dir.path().join("config.yml")).expect("read config");
    assert!(saved.contains("base_url: https://api.stored.example"), "{saved}");
    assert!(!saved.contains("one-off"), "{saved}");
    assert!(saved.contains("new-access"), "{saved}");
}
