//! Deployment wait and run-request services over a scripted API.

#![allow(clippy::expect_used)]

use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;

use gondor_cli::application::services::deployment::{DEPLOYMENT_TIMEOUT, wait_for_deployment};
use gondor_cli::application::services::instances::{get_instance, request_run};
use gondor_cli::domain::ApiError;

use crate::mocks::ScriptedApi;

const INSTANCE: &str = "https://api.example/v2/instances/1/";

#[tokio::test(start_paused = true)]
async fn test_deploying_then_running_succeeds() {
    let api = ScriptedApi::instance_states(&["deploying", "deploying", "running"]);
    let started = Instant::now();

    wait_for_deployment(&api, INSTANCE, DEPLOYMENT_TIMEOUT)
        .await
        .expect("running");

    assert_eq!(api.calls(), 3);
    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(api.urls.lock().expect("lock").iter().all(|u| u == INSTANCE));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_state_fails_immediately() {
    let api = ScriptedApi::instance_states(&["deploying", "crashed"]);

    let err = wait_for_deployment(&api, INSTANCE, DEPLOYMENT_TIMEOUT)
        .await
        .expect_err("crashed");

    assert!(matches!(&err, ApiError::UnknownState(s) if s == "crashed"));
    assert_eq!(err.to_string(), "unknown instance state: crashed");
    assert_eq!(api.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_api_error_stops_polling() {
    let api = ScriptedApi::new([Err(ApiError::server(502))]);

    let err = wait_for_deployment(&api, INSTANCE, DEPLOYMENT_TIMEOUT)
        .await
        .expect_err("502");
    assert!(matches!(err, ApiError::Server { status: 502, .. }));
    assert_eq!(api.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_still_deploying_at_deadline_times_out() {
    let api = ScriptedApi::instance_states(&["deploying"; 3]);

    let err = wait_for_deployment(&api, INSTANCE, Duration::from_secs(3))
        .await
        .expect_err("timeout");
    assert!(matches!(err, ApiError::Timeout(3)));
    assert_eq!(api.calls(), 3);
}

#[tokio::test]
async fn test_get_instance_rejects_empty_body() {
    let api = ScriptedApi::new([Ok(None)]);
    let err = get_instance(&api, INSTANCE).await.expect_err("empty");
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_request_run_posts_joined_command() {
    let api = ScriptedApi::new([Ok(Some(json!({"endpoint": "exec.example:443"})))]);
    let argv = vec!["manage.py".to_string(), "migrate".to_string()];

    let endpoint = request_run(&api, INSTANCE, &argv).await.expect("run");

    assert_eq!(endpoint, "exec.example:443");
    assert_eq!(
        api.urls.lock().expect("lock").as_slice(),
        &["https://api.example/v2/instances/1/run/".to_string()]
    );
    assert_eq!(
        api.payloads.lock().expect("lock").as_slice(),
        &[json!({"mode": "normal", "command": "manage.py migrate"})]
    );
}

#[tokio::test]
async fn test_request_run_without_endpoint_is_decode_error() {
    let api = ScriptedApi::new([Ok(Some(json!({"endpoint": ""})))]);
    let err = request_run(&api, INSTANCE, &["ls".to_string()])
        .await
        .expect_err("no endpoint");
    assert!(matches!(err, ApiError::Decode(_)));
}
