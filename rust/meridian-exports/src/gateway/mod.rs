//! Gateway functionality - schedule building and scheduled-export CRUD.
//!
//! This module provides the HTTP gateway layer for Meridian exports,
//! handling:
//! - Schedule presets, timezones, and cron preview
//! - Scheduled-export CRUD and run history
//! - Manual export triggering

pub mod exports;
pub mod routes;
pub mod schedule;

use axum::Router;

use crate::AppState;

/// Create the gateway router with all gateway-specific routes.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(routes::router())
        .merge(schedule::router())
        .merge(exports::router())
}
