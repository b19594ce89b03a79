//! `gondor deploy` against a local API server.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn workspace(server: &MockServer) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let yaml = format!(
        "client:\n  base_url: {base}\n  identity_url: {base}\n  auth:\n    username: ada\n    access_token: token\n    refresh_token: refresh\n",
        base = server.base_url()
    );
    std::fs::write(dir.path().join("config.yml"), yaml).expect("write config");
    dir
}

fn gondor(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gondor"));
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env("GONDOR_CONFIG", dir.path().join("config.yml"))
        .env_remove("GONDOR_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_deploy_rejected_release_fails_before_building() {
    let server = MockServer::start();
    let instance_url = server.url("/v2/instances/1/");
    server.mock(|when, then| {
        when.method(GET).path("/v2/instances/1/");
        then.status(200)
            .json_body(json!({"url": instance_url, "state": "running"}));
    });
    let release = server.mock(|when, then| {
        when.method(POST)
            .path("/v2/releases/")
            .json_body(json!({"instance": instance_url}));
        then.status(500);
    });
    let build = server.mock(|when, then| {
        when.method(POST).path("/v2/builds/");
        then.status(201);
    });
    let dir = workspace(&server);

    gondor(&dir)
        .args(["deploy", &instance_url, "main"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot create release"));
    release.assert();
    build.assert_hits(0);
}

#[test]
fn test_deploy_outside_a_repository_deletes_release() {
    let server = MockServer::start();
    let instance_url = server.url("/v2/instances/1/");
    let release_url = server.url("/v2/releases/7/");
    let build_url = server.url("/v2/builds/9/");
    server.mock(|when, then| {
        when.method(GET).path("/v2/instances/1/");
        then.status(200)
            .json_body(json!({"url": instance_url, "state": "running"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/v2/releases/");
        then.status(201).json_body(json!({"url": release_url}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/v2/builds/")
            .body_includes(release_url.as_str());
        then.status(201).json_body(json!({"url": build_url}));
    });
    let upload = server.mock(|when, then| {
        when.method(PUT).path("/v2/builds/9/");
        then.status(200).json_body(json!({"endpoint": "build.example:443"}));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/v2/releases/7/");
        then.status(204);
    });
    let dir = workspace(&server);

    gondor(&dir)
        .args(["deploy", &instance_url, "no-such-ref"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot build no-such-ref"));
    upload.assert_hits(0);
    delete.assert();
}
