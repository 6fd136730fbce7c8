//! Export store implementations.
//!
//! Provides a trait-based abstraction for scheduled-export persistence.
//! The in-memory store backs embedded mode and tests; production deploys
//! implement the same trait over the platform's relational database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::scheduler::{ExportRun, ScheduledExport};

/// Repository trait for scheduled exports and their run history.
#[async_trait]
pub trait ExportStore: Send + Sync {
    /// Persist a new export.
    async fn create_export(&self, export: &ScheduledExport) -> anyhow::Result<String>;

    /// Fetch an export by ID.
    async fn get_export(&self, id: &str) -> anyhow::Result<Option<ScheduledExport>>;

    /// Replace an existing export.
    async fn update_export(&self, export: &ScheduledExport) -> anyhow::Result<()>;

    /// List exports, optionally scoped to one workspace.
    async fn list_exports(
        &self,
        workspace_id: Option<&str>,
    ) -> anyhow::Result<Vec<ScheduledExport>>;

    /// Delete an export.
    async fn delete_export(&self, id: &str) -> anyhow::Result<bool>;

    /// Enabled exports whose next run is at or before `now`.
    async fn due_exports(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<ScheduledExport>>;

    /// Record a delivery attempt.
    async fn record_run(&self, run: &ExportRun) -> anyhow::Result<()>;

    /// Recent runs for an export, newest first.
    async fn list_runs(&self, export_id: &str, limit: usize) -> anyhow::Result<Vec<ExportRun>>;
}

/// Run-history entries retained per export in the in-memory store.
const RUN_HISTORY_CAP: usize = 1000;

/// In-memory store for embedded mode and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExportStore {
    exports: Arc<parking_lot::RwLock<HashMap<String, ScheduledExport>>>,
    runs: Arc<parking_lot::RwLock<HashMap<String, Vec<ExportRun>>>>,
}

impl InMemoryExportStore {
    /// Create a new in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExportStore for InMemoryExportStore {
    async fn create_export(&self, export: &ScheduledExport) -> anyhow::Result<String> {
        let mut exports = self.exports.write();
        exports.insert(export.id.clone(), export.clone());
        Ok(export.id.clone())
    }

    async fn get_export(&self, id: &str) -> anyhow::Result<Option<ScheduledExport>> {
        let exports = self.exports.read();
        Ok(exports.get(id).cloned())
    }

    async fn update_export(&self, export: &ScheduledExport) -> anyhow::Result<()> {
        let mut exports = self.exports.write();
        if !exports.contains_key(&export.id) {
            anyhow::bail!("No scheduled export with id {}", export.id);
        }
        exports.insert(export.id.clone(), export.clone());
        Ok(())
    }

    async fn list_exports(
        &self,
        workspace_id: Option<&str>,
    ) -> anyhow::Result<Vec<ScheduledExport>> {
        let exports = self.exports.read();
        let mut filtered: Vec<_> = exports
            .values()
            .filter(|e| workspace_id.is_none_or(|ws| e.workspace_id == ws))
            .cloned()
            .collect();
        // HashMap order is arbitrary; keep listings stable.
        filtered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(filtered)
    }

    async fn delete_export(&self, id: &str) -> anyhow::Result<bool> {
        let mut exports = self.exports.write();
        self.runs.write().remove(id);
        Ok(exports.remove(id).is_some())
    }

    async fn due_exports(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<ScheduledExport>> {
        let exports = self.exports.read();
        Ok(exports
            .values()
            .filter(|e| e.enabled && e.next_run_at.is_some_and(|next| next <= now))
            .cloned()
            .collect())
    }

    async fn record_run(&self, run: &ExportRun) -> anyhow::Result<()> {
        let mut runs = self.runs.write();
        let history = runs.entry(run.export_id.clone()).or_default();
        history.push(run.clone());
        if history.len() > RUN_HISTORY_CAP {
            let excess = history.len() - RUN_HISTORY_CAP;
            history.drain(..excess);
        }
        Ok(())
    }

    async fn list_runs(&self, export_id: &str, limit: usize) -> anyhow::Result<Vec<ExportRun>> {
        let runs = self.runs.read();
        Ok(runs
            .get(export_id)
            .map(|history| history.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
