//! Router-level tests driving the job endpoints with `oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sitegate_api::metrics::RunOutcome;
use sitegate_api::{create_app, AppState};
use sitegate_core::PipelineOptions;
use std::fs;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> (Router, AppState) {
    let state = AppState::new(PipelineOptions::default()).unwrap();
    (create_app(state.clone()), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, value)
}

async fn wait_for_stage(app: &Router, job_id: &str, stage: &str) -> Value {
    let uri = format!("/v1/jobs/{}/progress", job_id);
    for _ in 0..100 {
        let (status, progress) = send(app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        if progress["currentStage"] == stage {
            return progress;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job {} never reached stage {}", job_id, stage);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["jobs"], 0);
}

#[tokio::test]
async fn test_job_runs_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<p>Trusted by 50,000+ customers</p>").unwrap();
    let (app, state) = app();

    let (status, accepted) = send(
        &app,
        Method::POST,
        "/v1/jobs/site-1",
        Some(json!({
            "workspacePath": dir.path(),
            "options": { "expectedPages": ["Home"] }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(accepted["jobId"], "site-1");
    assert_eq!(accepted["totalStages"], 4);

    let progress = wait_for_stage(&app, "site-1", "completed").await;
    assert_eq!(progress["progressPercent"], 100);
    assert_eq!(progress["stagesCompleted"], 4);
    assert!(progress["error"].is_null());
    assert!(progress["artifacts"]["repair-log.json"]["contentHash"]
        .as_str()
        .unwrap()
        .starts_with("blake3:"));
    assert_eq!(
        fs::read_to_string(dir.path().join("index.html")).unwrap(),
        "<p>Built with care</p>"
    );
    assert_eq!(state.metrics.count(RunOutcome::Started), 1);
}

#[tokio::test]
async fn test_through_stage_limits_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>Hello</h1>").unwrap();
    let (app, _) = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/jobs/site-2",
        Some(json!({ "workspacePath": dir.path(), "throughStage": "validate" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let progress = wait_for_stage(&app, "site-2", "validate").await;
    let mut done = progress;
    for _ in 0..100 {
        if done["progressPercent"] == 50 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        done = send(&app, Method::GET, "/v1/jobs/site-2/progress", None).await.1;
    }
    assert_eq!(done["progressPercent"], 50);
    assert!(!dir.path().join("file-tree.json").exists());
}

#[tokio::test]
async fn test_duplicate_job_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>Hello</h1>").unwrap();
    let (app, _) = app();
    let body = json!({ "workspacePath": dir.path() });

    let (first, _) = send(&app, Method::POST, "/v1/jobs/dup", Some(body.clone())).await;
    let (second, error) = send(&app, Method::POST, "/v1/jobs/dup", Some(body)).await;

    assert_eq!(first, StatusCode::ACCEPTED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert!(error["error"].as_str().unwrap().contains("dup"));
}

#[tokio::test]
async fn test_non_runnable_stage_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/jobs/bad",
        Some(json!({ "workspacePath": dir.path(), "throughStage": "completed" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("completed"));
    assert!(state.registry.is_empty().await);
}

#[tokio::test]
async fn test_missing_workspace_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/jobs/ghost",
        Some(json!({ "workspacePath": dir.path().join("nowhere") })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let progress = wait_for_stage(&app, "ghost", "failed").await;
    assert!(progress["error"].as_str().unwrap().starts_with("WORKSPACE/"));
    assert_eq!(progress["stageLog"][0]["status"], "failed");
}

#[tokio::test]
async fn test_unknown_and_deleted_jobs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>Hello</h1>").unwrap();
    let (app, _) = app();

    let (status, _) = send(&app, Method::GET, "/v1/jobs/nope/progress", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, Method::POST, "/v1/jobs/gone", Some(json!({ "workspacePath": dir.path() }))).await;
    let (deleted, _) = send(&app, Method::DELETE, "/v1/jobs/gone", None).await;
    let (again, _) = send(&app, Method::DELETE, "/v1/jobs/gone", None).await;
    let (progress, _) = send(&app, Method::GET, "/v1/jobs/gone/progress", None).await;

    assert_eq!(deleted, StatusCode::NO_CONTENT);
    assert_eq!(again, StatusCode::NOT_FOUND);
    assert_eq!(progress, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>Hello</h1>").unwrap();
    let (app, _) = app();

    send(&app, Method::POST, "/v1/jobs/m", Some(json!({ "workspacePath": dir.path() }))).await;
    let (status, body) = send(&app, Method::GET, "/metrics", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_str()
        .unwrap()
        .contains(r#"sitegate_pipeline_runs_total{outcome="started"} 1"#));
}
