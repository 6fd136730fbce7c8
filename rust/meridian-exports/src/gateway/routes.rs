//! API route definitions for the gateway.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Gateway-specific routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/info", get(get_api_info))
}

/// API info response.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

/// Get API information.
pub async fn get_api_info() -> impl IntoResponse {
    let info = ApiInfo {
        name: "Meridian Exports".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Scheduled export service for the Meridian insights platform".to_string(),
        endpoints: vec![
            EndpointInfo {
                path: "/api/v1/schedule/presets".to_string(),
                method: "GET".to_string(),
                description: "Schedule presets for the export dialog".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/schedule/timezones".to_string(),
                method: "GET".to_string(),
                description: "Timezone catalog for the export dialog".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/schedule/preview".to_string(),
                method: "POST".to_string(),
                description: "Preview a cron expression".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/scheduled-exports".to_string(),
                method: "POST".to_string(),
                description: "Create a scheduled export".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/scheduled-exports".to_string(),
                method: "GET".to_string(),
                description: "List scheduled exports".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/scheduled-exports/{id}".to_string(),
                method: "GET".to_string(),
                description: "Get a scheduled export".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/scheduled-exports/{id}".to_string(),
                method: "PATCH".to_string(),
                description: "Update a scheduled export".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/scheduled-exports/{id}".to_string(),
                method: "DELETE".to_string(),
                description: "Delete a scheduled export".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/scheduled-exports/{id}/runs".to_string(),
                method: "GET".to_string(),
                description: "Run history for a scheduled export".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/scheduled-exports/{id}/run".to_string(),
                method: "POST".to_string(),
                description: "Trigger a scheduled export immediately".to_string(),
            },
        ],
    };

    (StatusCode::OK, Json(info))
}
