//! Schedule builder model for the Meridian insights platform.
//!
//! The dashboard lets users schedule recurring exports of reports, charts,
//! and audience data. Under the hood every schedule is a five-field cron
//! expression plus an IANA timezone string; this crate is the translation
//! layer between that storage form and the structured "simple mode" the
//! builder presents:
//!
//! - [`model`]: [`ScheduleSpec`] with a never-fail parser and a total
//!   builder. Malformed input degrades to a daily 09:00 fallback instead of
//!   erroring, so stored garbage can never break the editor.
//! - [`describe`]: the plain-English summary line ("Every weekday at
//!   09:00").
//! - [`editor`]: the widget state machine. Simple mode emits on every field
//!   change; advanced mode buffers free text and emits on commit.
//! - [`presets`] and [`timezones`]: the static catalogs the builder offers.
//!
//! The crate is synchronous and does no I/O. It also does no validation:
//! strict cron checking happens server-side in `meridian-exports` before a
//! schedule is persisted.

pub mod describe;
pub mod editor;
pub mod model;
pub mod presets;
pub mod timezones;

pub use describe::{describe, describe_expression};
pub use editor::{EditorMode, ScheduleEditor};
pub use model::{DEFAULT_EXPRESSION, Frequency, ScheduleSpec};
pub use presets::{PRESETS, SchedulePreset};
pub use timezones::{TIMEZONES, TimezoneOption, is_known};
