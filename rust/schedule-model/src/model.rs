//! Structured schedule model and cron expression translation.
//!
//! The schedule builder edits a structured [`ScheduleSpec`]; the platform
//! persists only a five-field cron expression (`minute hour day-of-month
//! month day-of-week`) and an IANA timezone string. This module is the
//! bidirectional bridge between the two representations.
//!
//! Parsing never fails. A malformed expression degrades to a safe daily
//! default so a bad value in storage can never break the editor. Building is
//! total over every frequency, and custom expressions pass through verbatim.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Expression a fresh schedule starts from: daily at 09:00.
pub const DEFAULT_EXPRESSION: &str = "0 9 * * *";

const FALLBACK_MINUTE: u32 = 0;
const FALLBACK_HOUR: u32 = 9;
const FALLBACK_DAY_OF_MONTH: u32 = 1;

/// Interpretation mode for a schedule. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Fires every hour at a fixed minute.
    Hourly,
    /// Fires once a day at a fixed time.
    Daily,
    /// Fires on selected days of the week at a fixed time.
    Weekly,
    /// Fires on a fixed day of the month at a fixed time.
    Monthly,
    /// Escape hatch: the raw expression is authoritative and the structured
    /// fields are only a best-effort decode of it.
    Custom,
}

/// Structured view of a five-field cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    pub frequency: Frequency,
    /// Minute of the hour (0-59).
    pub minute: u32,
    /// Hour of the day (0-23). Not emitted for hourly schedules.
    pub hour: u32,
    /// Day of the month. The builder offers 1-28 so every month has the day.
    pub day_of_month: u32,
    /// Days of the week, 0 = Sunday through 6 = Saturday. Weekly only.
    pub days_of_week: BTreeSet<u32>,
    /// The expression these fields were decoded from, kept verbatim so a
    /// custom schedule survives a round-trip through the structured view.
    pub raw_expression: String,
}

impl Default for ScheduleSpec {
    fn default() -> Self {
        Self::parse(DEFAULT_EXPRESSION)
    }
}

impl ScheduleSpec {
    /// Decodes a cron expression into structured fields. Never fails: an
    /// expression without exactly five fields yields the daily 09:00
    /// fallback, and unparseable values decode to per-field defaults.
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        let [minute, hour, day_of_month, _month, day_of_week] = fields.as_slice() else {
            return Self::fallback(expression);
        };

        // First match wins. Keying hourly on the hour wildcard alone keeps
        // expressions like "5 * * * *" hourly across a round-trip.
        let frequency = if *hour == "*" {
            Frequency::Hourly
        } else if *day_of_month == "*" && *day_of_week == "*" {
            Frequency::Daily
        } else if *day_of_month == "*" {
            Frequency::Weekly
        } else if *day_of_week == "*" {
            Frequency::Monthly
        } else {
            Frequency::Custom
        };

        Self {
            frequency,
            minute: parse_field(minute, FALLBACK_MINUTE),
            hour: parse_field(hour, FALLBACK_HOUR),
            day_of_month: parse_field(day_of_month, FALLBACK_DAY_OF_MONTH),
            days_of_week: parse_days_of_week(day_of_week),
            raw_expression: expression.to_string(),
        }
    }

    /// Encodes the structured fields back into a cron expression. Total over
    /// every frequency; custom schedules pass the raw expression through.
    #[must_use]
    pub fn to_expression(&self) -> String {
        match self.frequency {
            Frequency::Hourly => format!("{} * * * *", self.minute),
            Frequency::Daily => format!("{} {} * * *", self.minute, self.hour),
            Frequency::Weekly => {
                format!("{} {} * * {}", self.minute, self.hour, self.day_field())
            }
            Frequency::Monthly => {
                format!("{} {} {} * *", self.minute, self.hour, self.day_of_month)
            }
            Frequency::Custom => self.raw_expression.clone(),
        }
    }

    /// Day-of-week field for a weekly expression. An empty selection emits
    /// Monday: an empty or `*` field would re-classify the expression as
    /// daily on the next parse.
    fn day_field(&self) -> String {
        if self.days_of_week.is_empty() {
            return "1".to_string();
        }
        self.days_of_week
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Daily 09:00 stand-in for an expression that could not be split into
    /// five fields. The original text is retained untouched.
    fn fallback(expression: &str) -> Self {
        Self {
            frequency: Frequency::Daily,
            minute: FALLBACK_MINUTE,
            hour: FALLBACK_HOUR,
            day_of_month: FALLBACK_DAY_OF_MONTH,
            days_of_week: BTreeSet::new(),
            raw_expression: expression.to_string(),
        }
    }
}

/// Best-effort numeric decode; `*` and anything unparseable yield `default`.
fn parse_field(field: &str, default: u32) -> u32 {
    field.parse().unwrap_or(default)
}

/// Decodes a day-of-week field, dispatching on the first delimiter found:
/// a range (`1-5`), a list (`1,3,5`), or a single value. Combined forms like
/// `1-3,5` are outside the builder's grammar and decode to the empty
/// selection, as do reversed ranges and out-of-range day numbers.
fn parse_days_of_week(field: &str) -> BTreeSet<u32> {
    if field.contains('-') {
        let Some((start, end)) = field.split_once('-') else {
            return BTreeSet::new();
        };
        match (start.parse::<u32>(), end.parse::<u32>()) {
            // Clamp the end to the day domain before expanding the range.
            (Ok(start), Ok(end)) if start <= end => (start..=end.min(6)).collect(),
            _ => BTreeSet::new(),
        }
    } else if field.contains(',') {
        field
            .split(',')
            .filter_map(|part| part.parse().ok())
            .filter(|day| *day <= 6)
            .collect()
    } else {
        field.parse().into_iter().filter(|day| *day <= 6).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekly(minute: u32, hour: u32, days: &[u32]) -> ScheduleSpec {
        ScheduleSpec {
            frequency: Frequency::Weekly,
            minute,
            hour,
            day_of_month: 1,
            days_of_week: days.iter().copied().collect(),
            raw_expression: String::new(),
        }
    }

    #[test]
    fn test_classify_hourly() {
        let spec = ScheduleSpec::parse("0 * * * *");
        assert_eq!(spec.frequency, Frequency::Hourly);
        assert_eq!(spec.minute, 0);
    }

    #[test]
    fn test_classify_hourly_nonzero_minute() {
        let spec = ScheduleSpec::parse("5 * * * *");
        assert_eq!(spec.frequency, Frequency::Hourly);
        assert_eq!(spec.minute, 5);
    }

    #[test]
    fn test_classify_daily() {
        let spec = ScheduleSpec::parse("0 9 * * *");
        assert_eq!(spec.frequency, Frequency::Daily);
        assert_eq!(spec.minute, 0);
        assert_eq!(spec.hour, 9);
    }

    #[test]
    fn test_classify_weekly() {
        let spec = ScheduleSpec::parse("0 9 * * 1-5");
        assert_eq!(spec.frequency, Frequency::Weekly);
        let days: Vec<u32> = spec.days_of_week.iter().copied().collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_classify_monthly() {
        let spec = ScheduleSpec::parse("0 9 1 * *");
        assert_eq!(spec.frequency, Frequency::Monthly);
        assert_eq!(spec.day_of_month, 1);
    }

    #[test]
    fn test_classify_custom_when_both_day_fields_set() {
        let spec = ScheduleSpec::parse("0 9 1 * 1");
        assert_eq!(spec.frequency, Frequency::Custom);
        assert_eq!(spec.raw_expression, "0 9 1 * 1");
    }

    #[test]
    fn test_fallback_on_garbage() {
        let spec = ScheduleSpec::parse("not a cron");
        assert_eq!(spec.frequency, Frequency::Daily);
        assert_eq!(spec.minute, 0);
        assert_eq!(spec.hour, 9);
        assert_eq!(spec.day_of_month, 1);
        assert!(spec.days_of_week.is_empty());
        assert_eq!(spec.raw_expression, "not a cron");
    }

    #[test]
    fn test_fallback_on_wrong_field_count() {
        let spec = ScheduleSpec::parse("1 2 3");
        assert_eq!(spec.frequency, Frequency::Daily);
        assert_eq!(spec.hour, 9);
    }

    #[test]
    fn test_fallback_on_empty() {
        let spec = ScheduleSpec::parse("");
        assert_eq!(spec.frequency, Frequency::Daily);
        assert_eq!(spec.raw_expression, "");
    }

    #[test]
    fn test_unparseable_values_decode_to_defaults() {
        let spec = ScheduleSpec::parse("abc xyz * * 1");
        assert_eq!(spec.frequency, Frequency::Weekly);
        assert_eq!(spec.minute, 0);
        assert_eq!(spec.hour, 9);
    }

    #[test]
    fn test_day_of_week_range() {
        let spec = ScheduleSpec::parse("0 9 * * 1-3");
        let days: Vec<u32> = spec.days_of_week.iter().copied().collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn test_day_of_week_list() {
        let spec = ScheduleSpec::parse("0 9 * * 1,3,5");
        let days: Vec<u32> = spec.days_of_week.iter().copied().collect();
        assert_eq!(days, vec![1, 3, 5]);
    }

    #[test]
    fn test_day_of_week_single() {
        let spec = ScheduleSpec::parse("0 9 * * 3");
        let days: Vec<u32> = spec.days_of_week.iter().copied().collect();
        assert_eq!(days, vec![3]);
    }

    #[test]
    fn test_day_of_week_reversed_range_decodes_empty() {
        let spec = ScheduleSpec::parse("0 9 * * 5-1");
        assert!(spec.days_of_week.is_empty());
    }

    #[test]
    fn test_day_of_week_combined_syntax_decodes_empty() {
        // Range-plus-list is beyond the builder grammar; the strict
        // server-side parser still accepts it as a custom expression.
        let spec = ScheduleSpec::parse("0 9 * * 1-3,5");
        assert!(spec.days_of_week.is_empty());
    }

    #[test]
    fn test_day_of_week_out_of_range_dropped() {
        let spec = ScheduleSpec::parse("0 9 * * 1,9");
        let days: Vec<u32> = spec.days_of_week.iter().copied().collect();
        assert_eq!(days, vec![1]);
    }

    #[test]
    fn test_day_of_week_oversized_range_is_clamped() {
        // parse sees raw editor input on every keystroke, so a huge end
        // value must not be expanded past the day domain.
        let started = std::time::Instant::now();
        let spec = ScheduleSpec::parse("0 9 * * 0-4294967295");
        assert!(started.elapsed() < std::time::Duration::from_millis(250));
        let days: Vec<u32> = spec.days_of_week.iter().copied().collect();
        assert_eq!(days, vec![0, 1, 2, 3, 4, 5, 6]);

        // A range entirely above the domain still decodes empty.
        let spec = ScheduleSpec::parse("0 9 * * 7-9");
        assert!(spec.days_of_week.is_empty());
    }

    #[test]
    fn test_build_hourly() {
        let spec = ScheduleSpec {
            frequency: Frequency::Hourly,
            minute: 30,
            ..ScheduleSpec::default()
        };
        assert_eq!(spec.to_expression(), "30 * * * *");
    }

    #[test]
    fn test_build_daily() {
        let spec = ScheduleSpec {
            frequency: Frequency::Daily,
            minute: 15,
            hour: 18,
            ..ScheduleSpec::default()
        };
        assert_eq!(spec.to_expression(), "15 18 * * *");
    }

    #[test]
    fn test_build_weekly_joins_days_ascending() {
        let spec = weekly(0, 9, &[5, 1, 3]);
        assert_eq!(spec.to_expression(), "0 9 * * 1,3,5");
    }

    #[test]
    fn test_build_weekly_empty_days_emits_monday() {
        let spec = weekly(0, 9, &[]);
        assert_eq!(spec.to_expression(), "0 9 * * 1");
    }

    #[test]
    fn test_build_monthly() {
        let spec = ScheduleSpec {
            frequency: Frequency::Monthly,
            minute: 0,
            hour: 6,
            day_of_month: 15,
            ..ScheduleSpec::default()
        };
        assert_eq!(spec.to_expression(), "0 6 15 * *");
    }

    #[test]
    fn test_build_custom_passes_raw_through() {
        let spec = ScheduleSpec::parse("*/5 2 1 * 1");
        assert_eq!(spec.frequency, Frequency::Custom);
        assert_eq!(spec.to_expression(), "*/5 2 1 * 1");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let specs = [
            ScheduleSpec {
                frequency: Frequency::Hourly,
                minute: 45,
                ..ScheduleSpec::default()
            },
            ScheduleSpec {
                frequency: Frequency::Daily,
                minute: 30,
                hour: 22,
                ..ScheduleSpec::default()
            },
            weekly(0, 9, &[1, 2, 3, 4, 5]),
            weekly(59, 23, &[0, 6]),
            ScheduleSpec {
                frequency: Frequency::Monthly,
                minute: 0,
                hour: 9,
                day_of_month: 28,
                ..ScheduleSpec::default()
            },
        ];
        for spec in specs {
            let built = spec.to_expression();
            let rebuilt = ScheduleSpec::parse(&built).to_expression();
            assert_eq!(rebuilt, built, "round-trip drifted for {built:?}");
        }
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let spec = ScheduleSpec::parse("  0   9  * * 1 ");
        assert_eq!(spec.frequency, Frequency::Weekly);
        assert_eq!(spec.hour, 9);
    }

    #[test]
    fn test_frequency_serializes_lowercase() {
        let json = serde_json::to_string(&Frequency::Weekly).unwrap();
        assert_eq!(json, "\"weekly\"");
    }
}
