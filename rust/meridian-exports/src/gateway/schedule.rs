//! Schedule builder endpoints.
//!
//! Backs the export dialog's schedule picker: the preset table, the
//! timezone catalog, and a live preview that pairs the lenient widget
//! interpretation of an expression with the strict server-side verdict.

use axum::{response::IntoResponse, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};

use schedule_model::{Frequency, PRESETS, ScheduleSpec, TIMEZONES, describe};

use crate::AppState;
use crate::scheduler::CronParser;

/// Schedule builder routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/schedule/presets", get(list_presets))
        .route("/api/v1/schedule/timezones", get(list_timezones))
        .route("/api/v1/schedule/preview", post(preview_schedule))
}

/// Request to preview a cron expression.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    /// Cron expression to interpret.
    pub expression: String,
}

/// Preview of how an expression is interpreted by both layers.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// Frequency bucket the widget model assigns.
    pub frequency: Frequency,
    /// Minute field of the widget model.
    pub minute: u32,
    /// Hour field of the widget model.
    pub hour: u32,
    /// Day-of-month field of the widget model.
    pub day_of_month: u32,
    /// Day-of-week selection of the widget model, ascending.
    pub days_of_week: Vec<u32>,
    /// Expression the widget would emit for this interpretation.
    pub canonical_expression: String,
    /// Human-readable description.
    pub description: String,
    /// Whether the strict evaluator accepts the expression as given.
    pub valid: bool,
    /// Rejection reason when invalid.
    pub error: Option<String>,
    /// Next UTC fire time when valid.
    pub next_run_at: Option<String>,
}

/// List the schedule presets offered by the export dialog.
///
/// # Endpoint
///
/// `GET /api/v1/schedule/presets`
pub async fn list_presets() -> impl IntoResponse {
    Json(PRESETS)
}

/// List the timezone catalog offered by the export dialog.
///
/// # Endpoint
///
/// `GET /api/v1/schedule/timezones`
pub async fn list_timezones() -> impl IntoResponse {
    Json(TIMEZONES)
}

/// Preview a cron expression.
///
/// The widget model never fails, so the preview always carries a frequency,
/// fields, and a description; `valid` reports whether the expression would
/// survive the strict validation applied at save time.
///
/// # Endpoint
///
/// `POST /api/v1/schedule/preview`
pub async fn preview_schedule(Json(req): Json<PreviewRequest>) -> impl IntoResponse {
    let spec = ScheduleSpec::parse(&req.expression);

    let (valid, error, next_run_at) = match CronParser::parse(&req.expression) {
        Ok(cron) => (
            true,
            None,
            cron.next_after(&chrono::Utc::now())
                .map(|dt| dt.to_rfc3339()),
        ),
        Err(e) => (false, Some(e.to_string()), None),
    };

    Json(PreviewResponse {
        frequency: spec.frequency,
        minute: spec.minute,
        hour: spec.hour,
        day_of_month: spec.day_of_month,
        days_of_week: spec.days_of_week.iter().copied().collect(),
        canonical_expression: spec.to_expression(),
        description: describe(&spec),
        valid,
        error,
        next_run_at,
    })
}
