//! Cron expression parsing and evaluation.
//!
//! Strict five-field parser (`minute hour day month weekday`) used before a
//! schedule is persisted and to compute delivery times. Unlike the lenient
//! decoder in `schedule-model`, which exists so a broken expression can
//! never break the dashboard editor, this parser rejects anything it cannot
//! evaluate.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Timelike, Utc};

/// A parsed cron expression.
#[derive(Debug, Clone)]
pub struct CronExpression {
    /// Minute (0-59).
    minute: CronField,
    /// Hour (0-23).
    hour: CronField,
    /// Day of month (1-31).
    day: CronField,
    /// Month (1-12).
    month: CronField,
    /// Day of week (0-6, Sunday = 0).
    weekday: CronField,
}

/// A single field: the union of its comma-separated parts, so combined
/// forms like `1-3,5` evaluate part by part.
#[derive(Debug, Clone)]
struct CronField {
    parts: Vec<CronPart>,
}

impl CronField {
    /// Check if any part matches the given value.
    fn matches(&self, value: u32) -> bool {
        self.parts.iter().any(|part| part.matches(value))
    }
}

/// One comma-separated part of a cron field.
#[derive(Debug, Clone)]
enum CronPart {
    /// Wildcard (*) - matches all values.
    Any,
    /// Specific value.
    Value(u32),
    /// Inclusive range (e.g., 1-5).
    Range(u32, u32),
    /// Step (e.g., */5).
    Step(u32),
}

impl CronPart {
    /// Check if the part matches the given value.
    fn matches(&self, value: u32) -> bool {
        match self {
            Self::Any => true,
            Self::Value(v) => *v == value,
            Self::Range(start, end) => value >= *start && value <= *end,
            Self::Step(step) => value % step == 0,
        }
    }
}

/// Cron expression parser.
#[derive(Debug)]
pub struct CronParser;

impl CronParser {
    /// Parse a cron expression string.
    ///
    /// # Format
    ///
    /// Standard cron format: `minute hour day month weekday`
    ///
    /// # Examples
    ///
    /// - `0 9 * * *` - Daily at 09:00
    /// - `*/5 * * * *` - Every 5 minutes
    /// - `0 9 * * 1-3,5` - 09:00 Monday through Wednesday and Friday
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is invalid.
    pub fn parse(expr: &str) -> Result<CronExpression> {
        let parts: Vec<&str> = expr.split_whitespace().collect();
        if parts.len() != 5 {
            anyhow::bail!("Cron expression must have 5 fields: {expr}");
        }

        Ok(CronExpression {
            minute: Self::parse_field(parts[0], 0, 59).context("Invalid minute field")?,
            hour: Self::parse_field(parts[1], 0, 23).context("Invalid hour field")?,
            day: Self::parse_field(parts[2], 1, 31).context("Invalid day field")?,
            month: Self::parse_field(parts[3], 1, 12).context("Invalid month field")?,
            weekday: Self::parse_field(parts[4], 0, 6).context("Invalid weekday field")?,
        })
    }

    fn parse_field(field: &str, min: u32, max: u32) -> Result<CronField> {
        let parts: Result<Vec<CronPart>> = field
            .split(',')
            .map(|part| Self::parse_part(part, min, max))
            .collect();
        Ok(CronField { parts: parts? })
    }

    fn parse_part(part: &str, min: u32, max: u32) -> Result<CronPart> {
        // Wildcard
        if part == "*" {
            return Ok(CronPart::Any);
        }

        // Step (*/n)
        if let Some(step_str) = part.strip_prefix("*/") {
            let step: u32 = step_str.parse().context("Invalid step value")?;
            if step == 0 || step > max {
                anyhow::bail!("Step value must be 1-{max}");
            }
            return Ok(CronPart::Step(step));
        }

        // Range (n-m)
        if let Some((start, end)) = part.split_once('-') {
            let start: u32 = start.parse().context("Invalid range start")?;
            let end: u32 = end.parse().context("Invalid range end")?;
            if start < min || end > max || start > end {
                anyhow::bail!("Range values must be {min}-{max} with start <= end");
            }
            return Ok(CronPart::Range(start, end));
        }

        // Single value
        let value: u32 = part.parse().context("Invalid numeric value")?;
        if value < min || value > max {
            anyhow::bail!("Value must be {min}-{max}");
        }
        Ok(CronPart::Value(value))
    }
}

impl CronExpression {
    /// Check if the cron expression matches the given time.
    #[must_use]
    pub fn matches(&self, time: &DateTime<Utc>) -> bool {
        self.minute.matches(time.minute())
            && self.hour.matches(time.hour())
            && self.day.matches(time.day())
            && self.month.matches(time.month())
            && self.weekday.matches(time.weekday().num_days_from_sunday())
    }

    /// Calculate the next execution time after the given time.
    ///
    /// Scans minute by minute, bounded to one year; an expression that can
    /// never fire (e.g. February 30th) yields `None`.
    #[must_use]
    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut current = (*after + chrono::Duration::minutes(1))
            .with_second(0)?
            .with_nanosecond(0)?;
        for _ in 0..(365 * 24 * 60) {
            if self.matches(&current) {
                return Some(current);
            }
            current += chrono::Duration::minutes(1);
        }
        None
    }
}
