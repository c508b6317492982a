//! Core types for datebar.
//!
//! This crate provides the pure pieces of the date navigator: week window
//! math, week numbering, moment-style date format patterns and the user
//! settings every navbar reads.

mod calendar;
mod config;
mod error;
mod format;
mod types;
mod week;

pub use calendar::{
    CalendarDate, DAYS_IN_WEEK, date_key, dates_in_week, last_boundary_before, next_boundary_after,
    shift_weeks, today, week_start, weekly_anchor,
};
pub use config::{NavbarSettings, NavbarSettingsBuilder};
pub use error::{FormatError, SettingsError};
pub use format::{DateFormat, format_date, ordinal, parse_date_from_filename};
pub use types::{FirstDayOfWeek, OpenType, PaneType};
pub use week::{WeekNumber, WeekRule};
