//! HTTP server setup and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::AppConfig;
use crate::dispatch::{ExportDispatcher, LogDispatcher};
use crate::gateway;
use crate::logging::OpTimer;
use crate::repository::{ExportStore, InMemoryExportStore};
use crate::scheduler::ExportScheduler;
use crate::{log_banner, log_init_step, log_init_warning, log_success, AppState};

/// Meridian Exports version (from Cargo.toml).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create the application with all routes and middleware.
pub async fn create_app(config: AppConfig) -> anyhow::Result<Router> {
    // Start overall timer
    let overall_timer = OpTimer::new("server", "create_app");

    // Log startup banner
    log_banner!(
        format!("📦 Meridian Exports v{}", VERSION),
        format!(
            "Tick: {}s | Default timezone: {}",
            config.scheduler.tick_secs, config.exports.default_timezone
        )
    );

    if !schedule_model::is_known(&config.exports.default_timezone) {
        log_init_warning!(
            "Default timezone {} is not in the known catalog",
            config.exports.default_timezone
        );
    }

    // [1/4] Create export store
    let step_timer = OpTimer::new("server", "store");
    let store: Arc<dyn ExportStore> = Arc::new(InMemoryExportStore::new());
    log_init_step!(1, 4, "Export Store", "🗄️  In-memory store ready");
    step_timer.finish();

    // [2/4] Create dispatcher
    let step_timer = OpTimer::new("server", "dispatcher");
    let dispatcher: Arc<dyn ExportDispatcher> = Arc::new(LogDispatcher);
    log_init_step!(2, 4, "Dispatcher", "📬 Log dispatcher ready");
    step_timer.finish();

    // [3/4] Create and start the scheduler loop
    let step_timer = OpTimer::new("server", "scheduler");
    let scheduler = ExportScheduler::new(
        Arc::clone(&store),
        dispatcher,
        Duration::from_secs(config.scheduler.tick_secs),
    );
    let _scheduler_task = scheduler.spawn();
    log_init_step!(
        3,
        4,
        "Scheduler",
        format!("⏰ Ticking every {}s", config.scheduler.tick_secs)
    );
    step_timer.finish();

    // Create app state
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        scheduler,
    };

    // [4/4] Build main API router with middleware
    let step_timer = OpTimer::new("server", "router");
    let api_router = Router::new()
        .merge(api::create_router())
        .merge(gateway::create_router());

    // Build router with middleware
    let app = api_router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log_init_step!(4, 4, "Router", "🌐 Routes + middleware configured");
    step_timer.finish();

    // Log success banner
    overall_timer.finish();
    log_success!("Meridian exports server created successfully");
    tracing::info!("");

    Ok(app)
}
