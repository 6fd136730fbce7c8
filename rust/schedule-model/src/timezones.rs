//! Static IANA timezone catalog.
//!
//! The timezone dropdown is a curated list, not a live tz database; the
//! identifier travels with the schedule as an opaque string and the backend
//! interprets it at delivery time. [`is_known`] is a catalog lookup only.

use serde::Serialize;

/// An IANA timezone identifier with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimezoneOption {
    pub id: &'static str,
    pub label: &'static str,
}

/// Catalog in the order the dropdown lists it: UTC first, then grouped
/// roughly west to east.
pub const TIMEZONES: [TimezoneOption; 21] = [
    TimezoneOption {
        id: "UTC",
        label: "UTC",
    },
    TimezoneOption {
        id: "America/Los_Angeles",
        label: "Pacific Time (US)",
    },
    TimezoneOption {
        id: "America/Denver",
        label: "Mountain Time (US)",
    },
    TimezoneOption {
        id: "America/Chicago",
        label: "Central Time (US)",
    },
    TimezoneOption {
        id: "America/New_York",
        label: "Eastern Time (US)",
    },
    TimezoneOption {
        id: "America/Toronto",
        label: "Eastern Time (Canada)",
    },
    TimezoneOption {
        id: "America/Mexico_City",
        label: "Mexico City",
    },
    TimezoneOption {
        id: "America/Sao_Paulo",
        label: "São Paulo",
    },
    TimezoneOption {
        id: "Europe/London",
        label: "London",
    },
    TimezoneOption {
        id: "Europe/Paris",
        label: "Paris",
    },
    TimezoneOption {
        id: "Europe/Berlin",
        label: "Berlin",
    },
    TimezoneOption {
        id: "Europe/Madrid",
        label: "Madrid",
    },
    TimezoneOption {
        id: "Europe/Warsaw",
        label: "Warsaw",
    },
    TimezoneOption {
        id: "Asia/Dubai",
        label: "Dubai",
    },
    TimezoneOption {
        id: "Asia/Kolkata",
        label: "India Standard Time",
    },
    TimezoneOption {
        id: "Asia/Singapore",
        label: "Singapore",
    },
    TimezoneOption {
        id: "Asia/Shanghai",
        label: "China Standard Time",
    },
    TimezoneOption {
        id: "Asia/Tokyo",
        label: "Tokyo",
    },
    TimezoneOption {
        id: "Asia/Seoul",
        label: "Seoul",
    },
    TimezoneOption {
        id: "Australia/Sydney",
        label: "Sydney",
    },
    TimezoneOption {
        id: "Pacific/Auckland",
        label: "Auckland",
    },
];

/// Whether an identifier appears in the catalog.
#[must_use]
pub fn is_known(id: &str) -> bool {
    TIMEZONES.iter().any(|timezone| timezone.id == id)
}
