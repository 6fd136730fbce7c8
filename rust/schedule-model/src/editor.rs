//! Editor state machine backing the schedule builder widget.
//!
//! Two mutually exclusive modes. In Simple mode every structured-field
//! change rebuilds the canonical expression immediately, so the host always
//! holds something valid. In Advanced mode free text accumulates in a draft
//! and is emitted verbatim only on commit (the widget's blur event), so
//! half-typed expressions never propagate. The editor rejects nothing;
//! validation happens server-side before anything is persisted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{DEFAULT_EXPRESSION, Frequency, ScheduleSpec};
use crate::presets::SchedulePreset;

/// Which editing surface is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Structured dropdowns and toggles; emits on every change.
    Simple,
    /// Free-text cron input; emits only on commit.
    Advanced,
}

/// State for one schedule being edited.
#[derive(Debug, Clone)]
pub struct ScheduleEditor {
    mode: EditorMode,
    spec: ScheduleSpec,
    expression: String,
    draft: String,
    timezone: String,
}

impl Default for ScheduleEditor {
    fn default() -> Self {
        Self::new(DEFAULT_EXPRESSION, "UTC")
    }
}

impl ScheduleEditor {
    /// Opens an editor over an existing expression and timezone.
    #[must_use]
    pub fn new(expression: &str, timezone: &str) -> Self {
        Self {
            mode: EditorMode::Simple,
            spec: ScheduleSpec::parse(expression),
            expression: expression.to_string(),
            draft: expression.to_string(),
            timezone: timezone.to_string(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Structured view of the current expression.
    #[must_use]
    pub fn spec(&self) -> &ScheduleSpec {
        &self.spec
    }

    /// The expression the host currently holds.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Uncommitted advanced-mode text.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Summary line for the current expression.
    #[must_use]
    pub fn describe(&self) -> String {
        crate::describe::describe(&self.spec)
    }

    /// Switches editing surface. Entering Simple re-parses the current
    /// expression into structured fields, a lossy step for expressions
    /// beyond the builder grammar.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.mode == mode {
            return;
        }
        tracing::debug!(?mode, "schedule editor mode change");
        self.mode = mode;
        if mode == EditorMode::Simple {
            self.spec = ScheduleSpec::parse(&self.expression);
        }
        self.draft.clone_from(&self.expression);
    }

    /// Selects a frequency and emits the rebuilt expression. Moving to
    /// Custom adopts the current expression as the raw text.
    pub fn set_frequency(&mut self, frequency: Frequency) -> &str {
        if frequency == Frequency::Custom {
            self.spec.raw_expression.clone_from(&self.expression);
        }
        self.spec.frequency = frequency;
        self.rebuild()
    }

    /// Sets the minute field, clamped to 0-59, and emits.
    pub fn set_minute(&mut self, minute: u32) -> &str {
        self.spec.minute = minute.min(59);
        self.rebuild()
    }

    /// Sets the hour field, clamped to 0-23, and emits.
    pub fn set_hour(&mut self, hour: u32) -> &str {
        self.spec.hour = hour.min(23);
        self.rebuild()
    }

    /// Sets the day of month, clamped to 1-28, and emits.
    pub fn set_day_of_month(&mut self, day: u32) -> &str {
        self.spec.day_of_month = day.clamp(1, 28);
        self.rebuild()
    }

    /// Toggles one weekday checkbox and emits. Day numbers outside 0-6 are
    /// ignored.
    pub fn toggle_day(&mut self, day: u32) -> &str {
        if day <= 6 && !self.spec.days_of_week.remove(&day) {
            self.spec.days_of_week.insert(day);
        }
        self.rebuild()
    }

    /// Replaces the weekday selection wholesale and emits.
    pub fn set_days_of_week(&mut self, days: BTreeSet<u32>) -> &str {
        self.spec.days_of_week = days.into_iter().filter(|day| *day <= 6).collect();
        self.rebuild()
    }

    /// Buffers advanced-mode text without emitting.
    pub fn set_draft(&mut self, text: &str) {
        self.draft.clear();
        self.draft.push_str(text);
    }

    /// Commits the draft verbatim as the new expression and emits it. No
    /// validation: the structured view re-parses best-effort alongside.
    pub fn commit_draft(&mut self) -> &str {
        self.expression.clone_from(&self.draft);
        self.spec = ScheduleSpec::parse(&self.expression);
        tracing::debug!(expression = %self.expression, "advanced draft committed");
        &self.expression
    }

    /// Applies a preset directly, bypassing both modes, and emits its
    /// known-good expression.
    pub fn apply_preset(&mut self, preset: &SchedulePreset) -> &str {
        self.expression.clear();
        self.expression.push_str(preset.expression);
        self.spec = ScheduleSpec::parse(&self.expression);
        self.draft.clone_from(&self.expression);
        &self.expression
    }

    /// Accepts an expression change made outside the editor, re-parsing and
    /// resetting the draft.
    pub fn sync_expression(&mut self, expression: &str) {
        self.expression.clear();
        self.expression.push_str(expression);
        self.spec = ScheduleSpec::parse(expression);
        self.draft.clone_from(&self.expression);
    }

    pub fn set_timezone(&mut self, timezone: &str) {
        self.timezone.clear();
        self.timezone.push_str(timezone);
    }

    fn rebuild(&mut self) -> &str {
        self.expression = self.spec.to_expression();
        self.spec.raw_expression.clone_from(&self.expression);
        self.draft.clone_from(&self.expression);
        tracing::debug!(expression = %self.expression, "schedule expression rebuilt");
        &self.expression
    }
}
