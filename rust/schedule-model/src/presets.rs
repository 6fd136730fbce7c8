//! Built-in schedule presets.
//!
//! One-click choices the builder offers before either editing mode is
//! touched. Every expression here is known-good and round-trips through the
//! structured model.

use serde::Serialize;

/// A labelled, known-good schedule expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedulePreset {
    pub label: &'static str,
    pub expression: &'static str,
}

/// Presets in the order the builder lists them.
pub const PRESETS: [SchedulePreset; 5] = [
    SchedulePreset {
        label: "Every hour",
        expression: "0 * * * *",
    },
    SchedulePreset {
        label: "Every day at 9 AM",
        expression: "0 9 * * *",
    },
    SchedulePreset {
        label: "Every weekday at 9 AM",
        expression: "0 9 * * 1-5",
    },
    SchedulePreset {
        label: "Every Monday at 9 AM",
        expression: "0 9 * * 1",
    },
    SchedulePreset {
        label: "First day of month at 9 AM",
        expression: "0 9 1 * *",
    },
];

/// Looks a preset up by its display label.
#[must_use]
pub fn find(label: &str) -> Option<&'static SchedulePreset> {
    PRESETS.iter().find(|preset| preset.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScheduleSpec;

    #[test]
    fn test_find_by_label() {
        let preset = find("Every hour").unwrap();
        assert_eq!(preset.expression, "0 * * * *");
        assert!(find("Every decade").is_none());
    }

    #[test]
    fn test_presets_are_stable_under_canonicalization() {
        // The weekday preset canonicalizes from "1-5" to a comma list, so
        // compare after one rebuild rather than against the literal.
        for preset in &PRESETS {
            let built = ScheduleSpec::parse(preset.expression).to_expression();
            let rebuilt = ScheduleSpec::parse(&built).to_expression();
            assert_eq!(rebuilt, built, "preset {} drifted", preset.label);
        }
    }

    #[test]
    fn test_presets_classify_as_simple_frequencies() {
        use crate::model::Frequency;

        for preset in &PRESETS {
            let spec = ScheduleSpec::parse(preset.expression);
            assert_ne!(
                spec.frequency,
                Frequency::Custom,
                "preset {} should stay in the simple grammar",
                preset.label
            );
        }
    }
}
