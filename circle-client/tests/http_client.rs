//! HttpCircleClient against a local stand-in for the CircleCI API

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use circle_client::{CircleClient, ClientError, HttpCircleClient};
use circle_core::domain::{JobAction, ProjectSlug, WorkflowStatus};
use serde_json::json;
use std::collections::HashMap;

// base64("secret:")
const EXPECTED_AUTH: &str = "Basic c2VjcmV0Og==";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == EXPECTED_AUTH)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "You must log in first."})),
    )
        .into_response()
}

async fn pipeline(
    headers: HeaderMap,
    Path((_vcs, _org, _project, number)): Path<(String, String, String, u64)>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if number != 7 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Pipeline not found"})),
        )
            .into_response();
    }
    Json(json!({"id": "pipe-7", "number": 7, "state": "created"})).into_response()
}

async fn workflows(
    headers: HeaderMap,
    Path(pipeline_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    assert_eq!(pipeline_id, "pipe-7");

    let body = match query.get("page-token").map(String::as_str) {
        None => json!({
            "items": [{
                "id": "wf-1", "name": "build", "status": "success",
                "created_at": "2021-01-01T00:00:00Z"
            }],
            "next_page_token": "page-2"
        }),
        Some("page-2") => json!({
            "items": [{
                "id": "wf-2", "name": "deploy", "status": "running",
                "created_at": "2021-01-02T00:00:00Z"
            }],
            "next_page_token": null
        }),
        Some(other) => panic!("unexpected page token {}", other),
    };
    Json(body).into_response()
}

async fn jobs(Path(workflow_id): Path<String>) -> Response {
    Json(json!({
        "items": [
            {"id": "j-1", "job_number": 11, "name": format!("{}-test", workflow_id), "status": "failed"},
            {"name": "deploy", "status": "blocked"}
        ],
        "next_page_token": null
    }))
    .into_response()
}

async fn job_details(
    Path((_vcs, _org, _project, number)): Path<(String, String, String, u64)>,
) -> Response {
    match number {
        11 => Json(json!({
            "steps": [{"name": "Run tests", "actions": [
                {"name": "Run tests", "failed": true, "has_output": true, "output_url": "http://unused"}
            ]}]
        }))
        .into_response(),
        12 => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Build not found"})),
        )
            .into_response(),
    }
}

async fn output(headers: HeaderMap) -> Response {
    // Pre-signed storage URLs must not receive the API token
    assert!(headers.get("authorization").is_none());
    Json(json!([
        {"message": "go test ./...\n", "type": "out", "time": "2021-01-01T00:00:00Z"},
        {"message": "FAIL\n", "type": "out", "time": "2021-01-01T00:00:01Z"}
    ]))
    .into_response()
}

async fn serve() -> String {
    let router = Router::new()
        .route(
            "/api/v2/project/{vcs}/{org}/{project}/pipeline/{number}",
            get(pipeline),
        )
        .route("/api/v2/pipeline/{id}/workflow", get(workflows))
        .route("/api/v2/workflow/{id}/job", get(jobs))
        .route("/api/v1.1/project/{vcs}/{org}/{project}/{number}", get(job_details))
        .route("/output/{id}", get(output));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn project() -> ProjectSlug {
    ProjectSlug::new("github", "influxdata", "circleci-helper")
}

async fn client() -> (HttpCircleClient, String) {
    let base_url = serve().await;
    let client = HttpCircleClient::with_client(&base_url, "secret", reqwest::Client::new()).unwrap();
    (client, base_url)
}

#[tokio::test]
async fn test_pipeline_lookup() {
    let (client, _) = client().await;

    assert_eq!(client.pipeline_id(&project(), 7).await.unwrap(), "pipe-7");

    let err = client.pipeline_id(&project(), 8).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_bad_token_is_api_error() {
    let base_url = serve().await;
    let client = HttpCircleClient::with_client(&base_url, "wrong", reqwest::Client::new()).unwrap();

    match client.pipeline_id(&project(), 7).await.unwrap_err() {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "You must log in first.");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_workflows_follow_pagination() {
    let (client, _) = client().await;

    let workflows = client.workflows("pipe-7").await.unwrap();
    assert_eq!(workflows.len(), 2);
    assert_eq!(workflows[0].id, "wf-1");
    assert_eq!(workflows[1].id, "wf-2");
    assert_eq!(workflows[1].status, WorkflowStatus::Running);
}

#[tokio::test]
async fn test_workflow_jobs() {
    let (client, _) = client().await;

    let jobs = client.workflow_jobs("wf-1").await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].name, "wf-1-test");
    assert_eq!(jobs[0].job_number, Some(11));
    assert!(jobs[1].status.is_blocked());
    assert!(jobs[1].job_number.is_none());
}

#[tokio::test]
async fn test_job_details_errors() {
    let (client, _) = client().await;

    let details = client.job_details(&project(), 11).await.unwrap();
    assert_eq!(details.failed_actions().count(), 1);

    assert!(client.job_details(&project(), 13).await.unwrap_err().is_not_found());

    match client.job_details(&project(), 12).await.unwrap_err() {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_action_output() {
    let (client, base_url) = client().await;

    let action = JobAction {
        name: "Run tests".to_string(),
        failed: true,
        has_output: true,
        output_url: Some(format!("{}/output/1", base_url)),
    };
    let messages = client.action_output(&action).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].message, "FAIL\n");

    let no_output = JobAction {
        output_url: None,
        ..action
    };
    assert!(matches!(
        client.action_output(&no_output).await.unwrap_err(),
        ClientError::InvalidRequest(_)
    ));
}
