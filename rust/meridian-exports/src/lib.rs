//! Meridian Exports - Scheduled Export Service
//!
//! This crate provides the scheduled-exports slice of the Meridian insights
//! platform as a single Rust service that offers:
//!
//! - **Schedule building**: Presets, timezone catalog, and live cron preview
//!   backed by the shared [`schedule_model`] widget model
//! - **Strict validation**: A server-side cron evaluator that rejects what
//!   the forgiving widget model merely reinterprets
//! - **Scheduled exports**: Workspace-scoped CRUD with run history
//! - **Delivery loop**: A background scheduler that dispatches due exports
//!   and advances next-run times
//!
//! # Architecture
//!
//! The service is organized into several key modules:
//!
//! - [`config`]: Configuration management and environment loading
//! - [`gateway`]: Schedule building and scheduled-export endpoints
//! - [`scheduler`]: Cron evaluation and the export execution engine
//! - [`repository`]: Export and run-history persistence
//! - [`dispatch`]: Seam to the platform's delivery pipeline
//! - [`api`]: Health and readiness endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_exports::{config::AppConfig, server::create_app};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let app = create_app(config).await?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod dispatch;
pub mod gateway;
pub mod logging;
pub mod repository;
pub mod scheduler;
pub mod server;

use std::sync::Arc;

use config::AppConfig;
use repository::ExportStore;
use scheduler::ExportScheduler;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Scheduled-export persistence.
    pub store: Arc<dyn ExportStore>,
    /// Export execution engine, shared with the background loop.
    pub scheduler: ExportScheduler,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &"AppConfig")
            .field("store", &"ExportStore")
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
