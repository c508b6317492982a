//! References to daily and weekly notes.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use datebar_core::{CalendarDate, FirstDayOfWeek, NavbarSettings, format_date};

/// A note the navbar can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum NoteRef {
    /// The daily note for a calendar day.
    Daily(CalendarDate),
    /// The weekly note keyed on a week's anchor date.
    Weekly(CalendarDate),
}

impl NoteRef {
    /// The date this note is keyed on.
    pub fn date(&self) -> CalendarDate {
        match self {
            Self::Daily(date) | Self::Weekly(date) => *date,
        }
    }

    /// The note's file stem under the given settings.
    pub fn file_stem(&self, settings: &NavbarSettings) -> String {
        self.file_stem_with(
            &settings.daily_note_date_format,
            &settings.weekly_note_date_format,
            settings.first_day_of_week,
        )
    }

    /// The note's file stem for explicit daily/weekly patterns.
    pub fn file_stem_with(&self, daily: &str, weekly: &str, first_day: FirstDayOfWeek) -> String {
        match self {
            Self::Daily(date) => format_date(*date, daily, first_day),
            Self::Weekly(date) => format_date(*date, weekly, first_day),
        }
    }
}

impl fmt::Display for NoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily(date) => write!(f, "daily note {date}"),
            Self::Weekly(date) => write!(f, "weekly note {date}"),
        }
    }
}

/// A resolved note file, relative to the vault root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFile {
    pub path: PathBuf,
}

impl NoteFile {
    /// Create a note file from a vault-relative path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Vault-relative path with the extension dropped, `/`-separated.
    pub fn link_path(&self) -> String {
        let stem = self.path.with_extension("");
        stem.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_file_stem() {
        let settings = NavbarSettings::default();
        let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        assert_eq!(NoteRef::Daily(date).file_stem(&settings), "2024-06-12");
        assert_eq!(NoteRef::Weekly(date).file_stem(&settings), "2024-W24");
    }

    #[test]
    fn test_link_path_drops_extension() {
        assert_eq!(NoteFile::new("Journal/2024/2024-06-12.md").link_path(), "Journal/2024/2024-06-12");
        assert_eq!(NoteFile::new("2024-W24.md").link_path(), "2024-W24");
        assert_eq!(NoteFile::new("README").link_path(), "README");
    }

    #[test]
    fn test_display() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(NoteRef::Weekly(date).to_string(), "weekly note 2024-06-10");
    }
}
