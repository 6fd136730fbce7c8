//! Export dispatch seam.
//!
//! Rendering and delivery (email, file drops) live in the platform's
//! delivery pipeline; the scheduler only needs something that accepts a due
//! export and returns a receipt. [`LogDispatcher`] is the embedded default
//! and the test double.

use async_trait::async_trait;
use thiserror::Error;

use crate::scheduler::ScheduledExport;

/// Errors the delivery pipeline can surface.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The pipeline refused the export, e.g. a deleted artifact or an empty
    /// recipient list. Not retryable as-is.
    #[error("export rejected: {reason}")]
    Rejected { reason: String },
    /// The pipeline could not be reached; a later tick may succeed.
    #[error("delivery pipeline unavailable: {0}")]
    Unavailable(String),
}

/// Acknowledgement from the pipeline.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    /// Pipeline-side reference for the delivery.
    pub reference: String,
}

/// Delivery pipeline abstraction.
#[async_trait]
pub trait ExportDispatcher: Send + Sync {
    /// Hand one due export to the pipeline.
    async fn dispatch(
        &self,
        export: &ScheduledExport,
    ) -> Result<DispatchReceipt, DispatchError>;
}

/// Dispatcher that logs deliveries instead of sending them. Used in
/// embedded mode and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

#[async_trait]
impl ExportDispatcher for LogDispatcher {
    async fn dispatch(
        &self,
        export: &ScheduledExport,
    ) -> Result<DispatchReceipt, DispatchError> {
        if export.recipients.is_empty() {
            return Err(DispatchError::Rejected {
                reason: "no recipients".to_string(),
            });
        }

        let reference = format!("log-{}", uuid::Uuid::new_v4());
        tracing::info!(
            export_id = %export.id,
            name = %export.name,
            recipients = export.recipients.len(),
            reference = %reference,
            "Export dispatched"
        );
        Ok(DispatchReceipt { reference })
    }
}
