//! Scheduled export management.
//!
//! This module provides cron-based scheduling for recurring exports,
//! letting users receive reports, charts, and audience data on a schedule.

pub mod cron;
pub mod executor;

pub use cron::{CronExpression, CronParser};
pub use executor::{ExportRun, ExportScheduler, RunStatus};

use serde::{Deserialize, Serialize};

/// What a scheduled export delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// A saved report.
    Report,
    /// A single chart.
    Chart,
    /// An audience segment listing.
    Audience,
}

/// The artifact a schedule exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportArtifact {
    /// Artifact type.
    pub kind: ArtifactKind,
    /// Identifier of the report, chart, or audience.
    pub id: String,
}

/// Delivery format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

/// A scheduled export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledExport {
    /// Unique export ID.
    pub id: String,
    /// Workspace that owns this export.
    pub workspace_id: String,
    /// Display name.
    pub name: String,
    /// What to export.
    pub artifact: ExportArtifact,
    /// Delivery format.
    pub format: ExportFormat,
    /// Email recipients.
    pub recipients: Vec<String>,
    /// Cron expression (e.g., "0 9 * * 1-5" for weekdays at 09:00).
    pub schedule: String,
    /// IANA timezone the schedule is presented in. Carried opaquely;
    /// evaluation happens in UTC.
    pub timezone: String,
    /// Whether the export is active.
    pub enabled: bool,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last update timestamp.
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// Last delivery attempt.
    pub last_run_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Next scheduled delivery.
    pub next_run_at: Option<chrono::DateTime<chrono::Utc>>,
}
