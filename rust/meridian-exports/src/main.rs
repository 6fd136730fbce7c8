//! Meridian Exports - Main Entry Point
//!
//! Scheduled-export service for the Meridian insights platform: schedule
//! building, export CRUD, and the background delivery loop.

use clap::Parser;
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use meridian_exports::config::{AppConfig, LoggingConfig};
use meridian_exports::server::create_app;

// Use mimalloc for better performance
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "meridian-exports")]
#[command(about = "Meridian Exports - Scheduled Export Service")]
#[command(version)]
struct Args {
    /// Host to bind to. Overrides the config file.
    #[arg(long, env = "MERIDIAN_EXPORTS_HOST")]
    host: Option<String>,

    /// Port to listen on. Overrides the config file.
    #[arg(short, long, env = "MERIDIAN_EXPORTS_PORT")]
    port: Option<u16>,

    /// Log level. Overrides the config file.
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Config file path.
    #[arg(short, long, env = "MERIDIAN_EXPORTS_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration, then apply command-line overrides
    let mut config = AppConfig::load_with_file(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // Initialize tracing
    init_tracing(&config.logging);

    tracing::info!(
        "Starting Meridian Exports v{} (schedule builder + delivery loop)",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Configuration loaded");

    // Create the application
    let app = create_app(config.clone()).await?;
    tracing::info!("Application initialized");

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    // Run the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Initialize tracing/logging.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
