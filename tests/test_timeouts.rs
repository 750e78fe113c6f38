// tests/test_timeouts.rs
// Request budget against slow capabilities, on a paused clock


use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use beacon::config::EnvConfig;
use test_helpers::{SlowModel, StalledSearch, create_app_from_config, post_json, read_json};

const CROWD_REPORT: &str = "Huge crowd panicking outside the arena";

#[tokio::test(start_paused = true)]
async fn test_slow_unreadable_model_still_falls_back_within_default_budget() {
    let config = EnvConfig::default();
    let model = SlowModel::new(Duration::from_secs(25), "not json");
    let app = create_app_from_config(model.clone(), Arc::new(StalledSearch), &config);

    let response = app
        .oneshot(post_json("/classify", &json!({"text": CROWD_REPORT})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-classification-status"], "fallback");
    assert_eq!(
        read_json(response).await["understood_message"],
        CROWD_REPORT
    );
    assert_eq!(model.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_model_answers_model_timeout() {
    let config = EnvConfig::default();
    let model = SlowModel::new(Duration::from_secs(3600), "{}");
    let app = create_app_from_config(model.clone(), Arc::new(StalledSearch), &config);

    let response = app
        .oneshot(post_json("/classify", &json!({"text": CROWD_REPORT})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(read_json(response).await["error_code"], "MODEL_TIMEOUT");
    assert_eq!(model.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_request_timeout_answers_gateway_timeout() {
    let config = EnvConfig {
        request_timeout: Duration::from_secs(20),
        ..EnvConfig::default()
    };
    let model = SlowModel::new(Duration::from_secs(25), "not json");
    let app = create_app_from_config(model, Arc::new(StalledSearch), &config);

    let response = app
        .oneshot(post_json("/classify", &json!({"text": CROWD_REPORT})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
}
