//! End-to-end tests for the scheduled-exports API.
//!
//! These tests validate:
//! - Export creation with strict cron validation
//! - Workspace scoping via the x-workspace-id header
//! - Partial updates, including schedule changes and re-enabling
//! - Run history and manual triggering
//! - Deletion

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use meridian_exports::config::AppConfig;
use meridian_exports::server::create_app;

/// Helper to spin up an in-process test server over default config.
async fn test_server() -> TestServer {
    let config = AppConfig::default();
    let app = create_app(config).await.expect("Failed to build app");
    TestServer::new(app).expect("Failed to start test server")
}

/// A valid creation body for a weekly Monday report.
fn sample_export_body() -> Value {
    json!({
        "name": "Weekly brand tracker",
        "artifact": { "kind": "report", "id": "rpt-42" },
        "format": "csv",
        "recipients": ["insights@acme.example"],
        "schedule": "0 9 * * 1"
    })
}

#[tokio::test]
async fn test_create_scheduled_export() {
    let server = test_server().await;

    let response = server
        .post("/api/v1/scheduled-exports")
        .json(&sample_export_body())
        .await;

    response.assert_status(StatusCode::CREATED);
    let export: Value = response.json();

    assert!(!export["id"].as_str().unwrap().is_empty());
    assert_eq!(export["workspace_id"], "default");
    assert_eq!(export["name"], "Weekly brand tracker");
    assert_eq!(export["schedule"], "0 9 * * 1");
    assert_eq!(export["schedule_description"], "Every Monday at 09:00");
    assert_eq!(export["timezone"], "UTC");
    assert_eq!(export["enabled"], true);
    assert!(export["next_run_at"].as_str().is_some());
    assert!(export["last_run_at"].is_null());
}

#[tokio::test]
async fn test_create_rejects_invalid_cron() {
    let server = test_server().await;

    let mut body = sample_export_body();
    body["schedule"] = json!("every monday");

    let response = server.post("/api/v1/scheduled-exports").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Invalid cron expression"));
}

#[tokio::test]
async fn test_create_rejects_out_of_range_weekday() {
    let server = test_server().await;

    let mut body = sample_export_body();
    body["schedule"] = json!("0 9 * * 7");

    let response = server.post("/api/v1/scheduled-exports").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Invalid cron expression"));
}

#[tokio::test]
async fn test_create_validates_recipients() {
    let server = test_server().await;

    let mut body = sample_export_body();
    body["recipients"] = json!([]);
    let response = server.post("/api/v1/scheduled-exports").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("At least one recipient"));

    // Default config caps recipients at 20
    let too_many: Vec<String> = (0..21).map(|i| format!("user{i}@acme.example")).collect();
    body["recipients"] = json!(too_many);
    let response = server.post("/api/v1/scheduled-exports").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("At most 20 recipients"));
}

#[tokio::test]
async fn test_timezone_defaults_and_override() {
    let server = test_server().await;

    let response = server
        .post("/api/v1/scheduled-exports")
        .json(&sample_export_body())
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["timezone"], "UTC");

    let mut body = sample_export_body();
    body["timezone"] = json!("America/New_York");
    let response = server.post("/api/v1/scheduled-exports").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["timezone"], "America/New_York");
}

#[tokio::test]
async fn test_list_scopes_by_workspace() {
    let server = test_server().await;

    server
        .post("/api/v1/scheduled-exports")
        .add_header("x-workspace-id", "acme-co")
        .json(&sample_export_body())
        .await
        .assert_status(StatusCode::CREATED);

    let mut other = sample_export_body();
    other["name"] = json!("Zenith churn digest");
    server
        .post("/api/v1/scheduled-exports")
        .add_header("x-workspace-id", "zenith")
        .json(&other)
        .await
        .assert_status(StatusCode::CREATED);

    // Header selects the workspace
    let response = server
        .get("/api/v1/scheduled-exports")
        .add_header("x-workspace-id", "acme-co")
        .await;
    response.assert_status_ok();
    let listed: Vec<Value> = response.json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["workspace_id"], "acme-co");

    // Query parameter overrides the header
    let response = server
        .get("/api/v1/scheduled-exports")
        .add_header("x-workspace-id", "acme-co")
        .add_query_param("workspace", "zenith")
        .await;
    response.assert_status_ok();
    let listed: Vec<Value> = response.json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Zenith churn digest");

    // No header falls back to the default workspace
    let response = server.get("/api/v1/scheduled-exports").await;
    response.assert_status_ok();
    assert!(response.json::<Vec<Value>>().is_empty());
}

#[tokio::test]
async fn test_get_export_and_not_found() {
    let server = test_server().await;

    let created: Value = server
        .post("/api/v1/scheduled-exports")
        .json(&sample_export_body())
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server.get(&format!("/api/v1/scheduled-exports/{id}")).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], *id);

    server
        .get("/api/v1/scheduled-exports/does-not-exist")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_schedule_revalidates_and_describes() {
    let server = test_server().await;

    let created: Value = server
        .post("/api/v1/scheduled-exports")
        .json(&sample_export_body())
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/v1/scheduled-exports/{id}"))
        .json(&json!({ "schedule": "30 18 * * 5" }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["schedule"], "30 18 * * 5");
    assert_eq!(updated["schedule_description"], "Every Friday at 18:30");
    assert!(updated["next_run_at"].as_str().is_some());

    let response = server
        .patch(&format!("/api/v1/scheduled-exports/{id}"))
        .json(&json!({ "schedule": "0 9 * *" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Invalid cron expression"));
}

#[tokio::test]
async fn test_disable_and_reenable() {
    let server = test_server().await;

    let created: Value = server
        .post("/api/v1/scheduled-exports")
        .json(&sample_export_body())
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/v1/scheduled-exports/{id}"))
        .json(&json!({ "enabled": false }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["enabled"], false);

    let response = server
        .patch(&format!("/api/v1/scheduled-exports/{id}"))
        .json(&json!({ "enabled": true }))
        .await;
    response.assert_status_ok();
    let reenabled: Value = response.json();
    assert_eq!(reenabled["enabled"], true);

    // Re-enabling recomputes the next run in the future
    let next = reenabled["next_run_at"].as_str().unwrap();
    let next: chrono::DateTime<chrono::Utc> = next.parse().unwrap();
    assert!(next > chrono::Utc::now());
}

#[tokio::test]
async fn test_partial_update_leaves_other_fields() {
    let server = test_server().await;

    let created: Value = server
        .post("/api/v1/scheduled-exports")
        .json(&sample_export_body())
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/v1/scheduled-exports/{id}"))
        .json(&json!({ "name": "Renamed tracker", "format": "pdf" }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["name"], "Renamed tracker");
    assert_eq!(updated["format"], "pdf");
    assert_eq!(updated["schedule"], "0 9 * * 1");
    assert_eq!(updated["recipients"], json!(["insights@acme.example"]));
}

#[tokio::test]
async fn test_delete_export() {
    let server = test_server().await;

    let created: Value = server
        .post("/api/v1/scheduled-exports")
        .json(&sample_export_body())
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    server
        .delete(&format!("/api/v1/scheduled-exports/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/v1/scheduled-exports/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .delete(&format!("/api/v1/scheduled-exports/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_manual_run_records_history() {
    let server = test_server().await;

    let created: Value = server
        .post("/api/v1/scheduled-exports")
        .json(&sample_export_body())
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    // History starts empty
    let response = server
        .get(&format!("/api/v1/scheduled-exports/{id}/runs"))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Vec<Value>>().is_empty());

    // Manual trigger succeeds through the log dispatcher
    let response = server
        .post(&format!("/api/v1/scheduled-exports/{id}/run"))
        .await;
    response.assert_status_ok();
    let run: Value = response.json();
    assert_eq!(run["status"], "succeeded");
    assert_eq!(run["export_id"], *id);
    assert!(run["reference"].as_str().unwrap().starts_with("log-"));
    assert!(run["error"].is_null());

    // The run lands in history and the export advances
    let response = server
        .get(&format!("/api/v1/scheduled-exports/{id}/runs"))
        .await;
    let runs: Vec<Value> = response.json();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["id"], run["id"]);

    let export: Value = server
        .get(&format!("/api/v1/scheduled-exports/{id}"))
        .await
        .json();
    assert!(export["last_run_at"].as_str().is_some());

    server
        .post("/api/v1/scheduled-exports/missing/run")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_runs_for_missing_export() {
    let server = test_server().await;

    server
        .get("/api/v1/scheduled-exports/missing/runs")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
