//! Structured logging utilities for the exports service.
//!
//! This module provides operation timing and structured logging helpers
//! for tracking initialization phases, operation performance, and detailed
//! context during server startup and runtime.

use std::time::Instant;

/// Operation timer for measuring and logging execution duration.
///
/// This timer automatically logs the operation start and provides a method
/// to log the completion with its duration.
///
/// # Examples
///
/// ```rust,ignore
/// use meridian_exports::logging::OpTimer;
///
/// let timer = OpTimer::new("server", "router");
/// // ... perform operation ...
/// timer.finish(); // Logs duration
/// ```
#[derive(Debug)]
pub struct OpTimer {
    /// Component being timed (e.g., "server", "scheduler").
    component: String,
    /// Operation being performed (e.g., "initialization", "tick").
    operation: String,
    /// Start time of the operation.
    start: Instant,
}

impl OpTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        let component = component.into();
        let operation = operation.into();

        tracing::debug!(
            component = %component,
            operation = %operation,
            "Operation started"
        );

        Self {
            component,
            operation,
            start: Instant::now(),
        }
    }

    /// Finishes the timer and logs the duration.
    pub fn finish(self) {
        let duration_ms = self.start.elapsed().as_millis();

        tracing::info!(
            component = %self.component,
            operation = %self.operation,
            duration_ms = duration_ms,
            "Operation completed"
        );
    }
}

/// Macro for logging initialization steps with consistent formatting.
///
/// # Examples
///
/// ```rust,ignore
/// log_init_step!(1, 4, "Export Store", "in-memory");
/// log_init_step!(2, 4, "Dispatcher");
/// ```
#[macro_export]
macro_rules! log_init_step {
    ($step:expr, $total:expr, $name:expr, $detail:expr) => {
        tracing::info!(
            step = $step,
            total = $total,
            "[{}/{}] {} - {}",
            $step,
            $total,
            $name,
            $detail
        );
    };
    ($step:expr, $total:expr, $name:expr) => {
        tracing::info!(
            step = $step,
            total = $total,
            "[{}/{}] {}",
            $step,
            $total,
            $name
        );
    };
}

/// Macro for logging warnings during initialization.
///
/// # Examples
///
/// ```rust,ignore
/// log_init_warning!("Default timezone {} is not in the catalog", tz);
/// ```
#[macro_export]
macro_rules! log_init_warning {
    ($msg:expr) => {
        tracing::warn!("⚠️  {}", $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        tracing::warn!("⚠️  {}", format!($msg, $($arg)*));
    };
}

/// Macro for logging successful completion of major phases.
///
/// # Examples
///
/// ```rust,ignore
/// log_success!("Meridian exports service created successfully");
/// ```
#[macro_export]
macro_rules! log_success {
    ($msg:expr) => {
        tracing::info!("✅ {}", $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        tracing::info!("✅ {}", format!($msg, $($arg)*));
    };
}

/// Macro for logging startup banners.
///
/// # Examples
///
/// ```rust,ignore
/// log_banner!("Meridian Exports v0.1.0", "Tick: 30s");
/// ```
#[macro_export]
macro_rules! log_banner {
    ($title:expr) => {
        tracing::info!("");
        tracing::info!("═══════════════════════════════════════════════════");
        tracing::info!("  {}", $title);
        tracing::info!("═══════════════════════════════════════════════════");
        tracing::info!("");
    };
    ($title:expr, $subtitle:expr) => {
        tracing::info!("");
        tracing::info!("═══════════════════════════════════════════════════");
        tracing::info!("  {}", $title);
        tracing::info!("  {}", $subtitle);
        tracing::info!("═══════════════════════════════════════════════════");
        tracing::info!("");
    };
}
