//! Export execution engine.
//!
//! Ticks on a configured interval, finds due exports, hands them to the
//! dispatcher, records run history, and advances next-run times. Manual
//! triggering from the API goes through the same execution path.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CronParser, ScheduledExport};
use crate::dispatch::ExportDispatcher;
use crate::repository::ExportStore;

/// Outcome of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Succeeded,
    Failed,
}

/// A record of one delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRun {
    /// Unique run ID.
    pub id: String,
    /// Export this run belongs to.
    pub export_id: String,
    /// Run outcome.
    pub status: RunStatus,
    /// Pipeline reference when delivery succeeded.
    pub reference: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// Completion time.
    pub finished_at: DateTime<Utc>,
}

/// Export execution engine.
#[derive(Clone)]
pub struct ExportScheduler {
    /// Export and run persistence.
    store: Arc<dyn ExportStore>,
    /// Delivery pipeline.
    dispatcher: Arc<dyn ExportDispatcher>,
    /// Interval between due-export checks.
    tick: Duration,
}

impl ExportScheduler {
    /// Create a new scheduler over a store and dispatcher.
    #[must_use]
    pub fn new(
        store: Arc<dyn ExportStore>,
        dispatcher: Arc<dyn ExportDispatcher>,
        tick: Duration,
    ) -> Self {
        Self {
            store,
            dispatcher,
            tick,
        }
    }

    /// Spawn the background loop that runs due exports every tick.
    pub fn spawn(&self) -> tokio::task::JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(scheduler.tick);
            loop {
                interval.tick().await;
                match scheduler.run_due(Utc::now()).await {
                    Ok(runs) if !runs.is_empty() => {
                        tracing::info!(count = runs.len(), "Scheduler tick ran due exports");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Scheduler tick failed");
                    }
                }
            }
        })
    }

    /// Run every export due at `now`. Returns the runs recorded.
    pub async fn run_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<ExportRun>> {
        let due = self.store.due_exports(now).await?;
        let mut runs = Vec::with_capacity(due.len());
        for export in due {
            runs.push(self.execute(export, now).await?);
        }
        Ok(runs)
    }

    /// Execute one export immediately, regardless of its schedule or
    /// enabled flag. Returns `None` when the export does not exist.
    pub async fn run_now(&self, id: &str) -> anyhow::Result<Option<ExportRun>> {
        let Some(export) = self.store.get_export(id).await? else {
            return Ok(None);
        };
        Ok(Some(self.execute(export, Utc::now()).await?))
    }

    /// Dispatch one export, record the run, and advance its run times.
    async fn execute(
        &self,
        mut export: ScheduledExport,
        now: DateTime<Utc>,
    ) -> anyhow::Result<ExportRun> {
        let started_at = Utc::now();
        let outcome = self.dispatcher.dispatch(&export).await;
        let finished_at = Utc::now();

        let run = match outcome {
            Ok(receipt) => ExportRun {
                id: Uuid::new_v4().to_string(),
                export_id: export.id.clone(),
                status: RunStatus::Succeeded,
                reference: Some(receipt.reference),
                error: None,
                started_at,
                finished_at,
            },
            Err(e) => {
                tracing::warn!(export_id = %export.id, error = %e, "Export dispatch failed");
                ExportRun {
                    id: Uuid::new_v4().to_string(),
                    export_id: export.id.clone(),
                    status: RunStatus::Failed,
                    reference: None,
                    error: Some(e.to_string()),
                    started_at,
                    finished_at,
                }
            }
        };

        self.store.record_run(&run).await?;

        // Advance even on failure so a broken export cannot hot-loop.
        export.last_run_at = Some(now);
        export.next_run_at = CronParser::parse(&export.schedule)
            .ok()
            .and_then(|cron| cron.next_after(&now));
        export.updated_at = Utc::now();
        self.store.update_export(&export).await?;

        Ok(run)
    }
}

impl std::fmt::Debug for ExportScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportScheduler")
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}
