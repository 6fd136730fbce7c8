//! Human-readable descriptions of schedules.
//!
//! Produces the summary line the dashboard shows next to a saved schedule,
//! e.g. `"Every weekday at 09:00"`. Total over any input: anything the
//! structured model cannot express is described as a custom schedule.

use crate::model::{Frequency, ScheduleSpec};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Monday through Friday, the set that reads as "every weekday".
const WEEKDAYS: [u32; 5] = [1, 2, 3, 4, 5];

/// Describes a structured schedule in plain English.
#[must_use]
pub fn describe(spec: &ScheduleSpec) -> String {
    let time = clock(spec.hour, spec.minute);
    match spec.frequency {
        Frequency::Hourly => {
            format!("Every hour at {} minutes past the hour", spec.minute)
        }
        Frequency::Daily => format!("Every day at {time}"),
        Frequency::Weekly => describe_weekly(spec, &time),
        Frequency::Monthly => {
            format!(
                "On the {} of every month at {time}",
                ordinal(spec.day_of_month)
            )
        }
        Frequency::Custom => format!("Custom schedule: {}", spec.raw_expression),
    }
}

/// Parses and describes a cron expression in one step.
#[must_use]
pub fn describe_expression(expression: &str) -> String {
    describe(&ScheduleSpec::parse(expression))
}

fn describe_weekly(spec: &ScheduleSpec, time: &str) -> String {
    // The builder emits Monday for an empty selection, so say that.
    if spec.days_of_week.is_empty() {
        return format!("Every Monday at {time}");
    }
    if spec.days_of_week.iter().copied().eq(WEEKDAYS) {
        return format!("Every weekday at {time}");
    }
    let names: Vec<&str> = spec
        .days_of_week
        .iter()
        .filter_map(|&day| DAY_NAMES.get(day as usize).copied())
        .collect();
    format!("Every {} at {time}", names.join(", "))
}

fn clock(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}

/// English ordinal for a day number. 11 through 13 take "th" despite ending
/// in 1, 2, 3.
fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}
