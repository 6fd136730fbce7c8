//! Scheduled-export management endpoints.
//!
//! CRUD for scheduled exports plus run history and manual triggering.
//! Cron expressions are validated with the strict server-side parser
//! before anything is persisted.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schedule_model::{describe_expression, is_known};

use crate::AppState;
use crate::scheduler::{
    CronParser, ExportArtifact, ExportFormat, ExportRun, ScheduledExport,
};

/// Scheduled-export routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/scheduled-exports",
            post(create_export).get(list_exports),
        )
        .route(
            "/api/v1/scheduled-exports/{id}",
            get(get_export).patch(update_export).delete(delete_export),
        )
        .route("/api/v1/scheduled-exports/{id}/runs", get(get_export_runs))
        .route("/api/v1/scheduled-exports/{id}/run", post(run_export_now))
}

/// Request to create a scheduled export.
#[derive(Debug, Deserialize)]
pub struct CreateExportRequest {
    /// Export name.
    pub name: String,
    /// Artifact to export.
    pub artifact: ExportArtifact,
    /// Output format.
    pub format: ExportFormat,
    /// Delivery recipients.
    pub recipients: Vec<String>,
    /// Cron expression.
    pub schedule: String,
    /// Optional IANA timezone. Defaults from config when omitted.
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Request to update a scheduled export.
#[derive(Debug, Deserialize)]
pub struct UpdateExportRequest {
    /// Optional new name.
    pub name: Option<String>,
    /// Optional new artifact.
    pub artifact: Option<ExportArtifact>,
    /// Optional new format.
    pub format: Option<ExportFormat>,
    /// Optional new recipients.
    pub recipients: Option<Vec<String>>,
    /// Optional new cron expression.
    pub schedule: Option<String>,
    /// Optional new timezone.
    pub timezone: Option<String>,
    /// Optional enabled flag.
    pub enabled: Option<bool>,
}

/// Scheduled-export response.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    /// Export ID.
    pub id: String,
    /// Owning workspace.
    pub workspace_id: String,
    /// Export name.
    pub name: String,
    /// Artifact being exported.
    pub artifact: ExportArtifact,
    /// Output format.
    pub format: ExportFormat,
    /// Delivery recipients.
    pub recipients: Vec<String>,
    /// Cron expression.
    pub schedule: String,
    /// Human-readable schedule description.
    pub schedule_description: String,
    /// IANA timezone.
    pub timezone: String,
    /// Enabled flag.
    pub enabled: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Last run timestamp.
    pub last_run_at: Option<String>,
    /// Next run timestamp.
    pub next_run_at: Option<String>,
}

impl From<ScheduledExport> for ExportResponse {
    fn from(export: ScheduledExport) -> Self {
        Self {
            schedule_description: describe_expression(&export.schedule),
            id: export.id,
            workspace_id: export.workspace_id,
            name: export.name,
            artifact: export.artifact,
            format: export.format,
            recipients: export.recipients,
            schedule: export.schedule,
            timezone: export.timezone,
            enabled: export.enabled,
            created_at: export.created_at.to_rfc3339(),
            updated_at: export.updated_at.to_rfc3339(),
            last_run_at: export.last_run_at.map(|dt| dt.to_rfc3339()),
            next_run_at: export.next_run_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Export run response.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    /// Run ID.
    pub id: String,
    /// Export this run belongs to.
    pub export_id: String,
    /// Run outcome.
    pub status: crate::scheduler::RunStatus,
    /// Pipeline reference when delivery succeeded.
    pub reference: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
    /// Start timestamp.
    pub started_at: String,
    /// Completion timestamp.
    pub finished_at: String,
}

impl From<ExportRun> for RunResponse {
    fn from(run: ExportRun) -> Self {
        Self {
            id: run.id,
            export_id: run.export_id,
            status: run.status,
            reference: run.reference,
            error: run.error,
            started_at: run.started_at.to_rfc3339(),
            finished_at: run.finished_at.to_rfc3339(),
        }
    }
}

/// List filter parameters.
#[derive(Debug, Deserialize)]
pub struct ListExportsQuery {
    /// Workspace override. Falls back to the `x-workspace-id` header.
    pub workspace: Option<String>,
}

/// Resolve the calling workspace from the `x-workspace-id` header.
fn workspace_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-workspace-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("default")
        .to_string()
}

/// Reject empty or oversized recipient lists.
fn validate_recipients(recipients: &[String], max: usize) -> Result<(), (StatusCode, String)> {
    if recipients.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "At least one recipient is required".to_string(),
        ));
    }
    if recipients.len() > max {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("At most {max} recipients are allowed"),
        ));
    }
    Ok(())
}

/// Create a scheduled export.
///
/// # Endpoint
///
/// `POST /api/v1/scheduled-exports`
pub async fn create_export(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateExportRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    validate_recipients(&req.recipients, state.config.exports.max_recipients)?;

    // Validate cron expression
    let cron_expr = CronParser::parse(&req.schedule).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid cron expression: {e}"),
        )
    })?;

    let timezone = req
        .timezone
        .unwrap_or_else(|| state.config.exports.default_timezone.clone());
    if !is_known(&timezone) {
        tracing::debug!(timezone = %timezone, "Timezone not in the known catalog");
    }

    let now = chrono::Utc::now();
    let export = ScheduledExport {
        id: Uuid::new_v4().to_string(),
        workspace_id: workspace_from_headers(&headers),
        name: req.name,
        artifact: req.artifact,
        format: req.format,
        recipients: req.recipients,
        schedule: req.schedule,
        timezone,
        enabled: true,
        created_at: now,
        updated_at: now,
        last_run_at: None,
        next_run_at: cron_expr.next_after(&now),
    };

    state
        .store
        .create_export(&export)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok((StatusCode::CREATED, Json(ExportResponse::from(export))))
}

/// List scheduled exports for a workspace.
///
/// # Endpoint
///
/// `GET /api/v1/scheduled-exports`
pub async fn list_exports(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListExportsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let workspace = query
        .workspace
        .unwrap_or_else(|| workspace_from_headers(&headers));

    let exports = state
        .store
        .list_exports(Some(&workspace))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let responses: Vec<ExportResponse> = exports.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get a scheduled export by ID.
///
/// # Endpoint
///
/// `GET /api/v1/scheduled-exports/{id}`
pub async fn get_export(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let export = state
        .store
        .get_export(&id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Scheduled export not found".to_string()))?;

    Ok(Json(ExportResponse::from(export)))
}

/// Update a scheduled export.
///
/// # Endpoint
///
/// `PATCH /api/v1/scheduled-exports/{id}`
pub async fn update_export(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateExportRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut export = state
        .store
        .get_export(&id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Scheduled export not found".to_string()))?;

    // Update fields
    if let Some(name) = req.name {
        export.name = name;
    }
    if let Some(artifact) = req.artifact {
        export.artifact = artifact;
    }
    if let Some(format) = req.format {
        export.format = format;
    }
    if let Some(recipients) = req.recipients {
        validate_recipients(&recipients, state.config.exports.max_recipients)?;
        export.recipients = recipients;
    }
    if let Some(schedule) = req.schedule {
        // Validate new cron expression
        let cron_expr = CronParser::parse(&schedule).map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Invalid cron expression: {e}"),
            )
        })?;
        export.schedule = schedule;
        export.next_run_at = cron_expr.next_after(&chrono::Utc::now());
    }
    if let Some(timezone) = req.timezone {
        if !is_known(&timezone) {
            tracing::debug!(timezone = %timezone, "Timezone not in the known catalog");
        }
        export.timezone = timezone;
    }
    if let Some(enabled) = req.enabled {
        export.enabled = enabled;
        if enabled {
            // Recompute from now: a stale next run from before the export
            // was disabled would fire immediately on re-enable.
            export.next_run_at = CronParser::parse(&export.schedule)
                .ok()
                .and_then(|cron| cron.next_after(&chrono::Utc::now()));
        }
    }

    export.updated_at = chrono::Utc::now();

    state
        .store
        .update_export(&export)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(ExportResponse::from(export)))
}

/// Delete a scheduled export.
///
/// # Endpoint
///
/// `DELETE /api/v1/scheduled-exports/{id}`
pub async fn delete_export(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = state
        .store
        .delete_export(&id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Scheduled export not found".to_string()))
    }
}

/// Get run history for a scheduled export.
///
/// # Endpoint
///
/// `GET /api/v1/scheduled-exports/{id}/runs`
pub async fn get_export_runs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // Verify export exists
    state
        .store
        .get_export(&id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Scheduled export not found".to_string()))?;

    let runs = state
        .store
        .list_runs(&id, state.config.scheduler.run_history_limit)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let responses: Vec<RunResponse> = runs.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Trigger a scheduled export immediately.
///
/// # Endpoint
///
/// `POST /api/v1/scheduled-exports/{id}/run`
pub async fn run_export_now(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let run = state
        .scheduler
        .run_now(&id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Scheduled export not found".to_string()))?;

    Ok(Json(RunResponse::from(run)))
}
