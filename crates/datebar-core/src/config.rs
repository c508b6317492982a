//! Navbar settings.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::format::DateFormat;
use crate::types::{FirstDayOfWeek, OpenType};

const DEFAULT_DATE_FORMAT: &str = "ddd";
const DEFAULT_TOOLTIP_DATE_FORMAT: &str = "YYYY-MM-DD";
const DEFAULT_DAILY_NOTE_DATE_FORMAT: &str = "YYYY-MM-DD";
const DEFAULT_WEEKLY_NOTE_DATE_FORMAT: &str = "gggg-[W]ww";
const DEFAULT_WEEKLY_NOTE_DISPLAY_FORMAT: &str = "ww";

/// User settings for every navbar.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(default)]
pub struct NavbarSettings {
    /// Format of the date button labels.
    #[builder(default = "DEFAULT_DATE_FORMAT.to_string()")]
    pub date_format: String,

    /// Format of the date button tooltips.
    #[builder(default = "DEFAULT_TOOLTIP_DATE_FORMAT.to_string()")]
    pub tooltip_date_format: String,

    /// Format of daily note filenames.
    #[builder(default = "DEFAULT_DAILY_NOTE_DATE_FORMAT.to_string()")]
    pub daily_note_date_format: String,

    /// Where daily notes open on a plain click.
    #[builder(default)]
    pub default_open_type: OpenType,

    /// Show a button for the weekly note.
    #[builder(default = "false")]
    pub enable_weekly_note_button: bool,

    /// Format of weekly note filenames.
    #[builder(default = "DEFAULT_WEEKLY_NOTE_DATE_FORMAT.to_string()")]
    pub weekly_note_date_format: String,

    /// Format of the weekly button label.
    #[builder(default = "DEFAULT_WEEKLY_NOTE_DISPLAY_FORMAT.to_string()")]
    pub weekly_note_display_format: String,

    /// Where weekly notes open on a plain click.
    #[builder(default)]
    pub weekly_note_open_type: OpenType,

    /// First day of each displayed week.
    #[builder(default)]
    pub first_day_of_week: FirstDayOfWeek,

    /// Make opened notes the active leaf.
    #[builder(default = "true")]
    pub set_active: bool,

    /// Show buttons for the Sunday before and the Monday after the window.
    #[builder(default = "false")]
    pub show_extra_buttons: bool,
}

impl Default for NavbarSettings {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            tooltip_date_format: DEFAULT_TOOLTIP_DATE_FORMAT.to_string(),
            daily_note_date_format: DEFAULT_DAILY_NOTE_DATE_FORMAT.to_string(),
            default_open_type: OpenType::ActivePane,
            enable_weekly_note_button: false,
            weekly_note_date_format: DEFAULT_WEEKLY_NOTE_DATE_FORMAT.to_string(),
            weekly_note_display_format: DEFAULT_WEEKLY_NOTE_DISPLAY_FORMAT.to_string(),
            weekly_note_open_type: OpenType::ActivePane,
            first_day_of_week: FirstDayOfWeek::Monday,
            set_active: true,
            show_extra_buttons: false,
        }
    }
}

/// Replace an unusable pattern with its default.
fn sanitize_format(field: &'static str, value: &mut String, default: &str) -> bool {
    match DateFormat::compile(value) {
        Ok(_) => false,
        Err(e) => {
            tracing::warn!(field, value = %value, error = %e, "falling back to default date format");
            *value = default.to_string();
            true
        }
    }
}

impl NavbarSettings {
    /// Create a new settings builder.
    pub fn builder() -> NavbarSettingsBuilder {
        NavbarSettingsBuilder::default()
    }

    /// Reset empty or malformed format strings to their defaults.
    ///
    /// Returns `true` if anything was changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;
        changed |= sanitize_format("date_format", &mut self.date_format, DEFAULT_DATE_FORMAT);
        changed |= sanitize_format(
            "tooltip_date_format",
            &mut self.tooltip_date_format,
            DEFAULT_TOOLTIP_DATE_FORMAT,
        );
        changed |= sanitize_format(
            "daily_note_date_format",
            &mut self.daily_note_date_format,
            DEFAULT_DAILY_NOTE_DATE_FORMAT,
        );
        changed |= sanitize_format(
            "weekly_note_date_format",
            &mut self.weekly_note_date_format,
            DEFAULT_WEEKLY_NOTE_DATE_FORMAT,
        );
        changed |= sanitize_format(
            "weekly_note_display_format",
            &mut self.weekly_note_display_format,
            DEFAULT_WEEKLY_NOTE_DISPLAY_FORMAT,
        );
        changed
    }

    /// Builder-style sanitize.
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }

    /// Get the default config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("datebar").join("settings.toml"))
    }

    /// Load settings from the default path, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    /// Load and sanitize settings from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::io(path, e))?;
        let settings: Self = toml::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(settings.sanitized())
    }

    /// Save settings to the default path.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a TOML file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| SettingsError::Serialize {
            message: e.to_string(),
        })?;

        std::fs::write(path, content).map_err(|e| SettingsError::io(path, e))
    }
}
