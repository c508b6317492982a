//! Shared enums: first day of week, open types and pane types.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Which weekday starts a displayed week.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum FirstDayOfWeek {
    Sunday,
    #[default]
    Monday,
}

impl FirstDayOfWeek {
    /// The chrono weekday this convention starts on.
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }
}

/// Where a note gets opened.
///
/// Serialized with the labels the settings file has always used
/// (`"Active"`, `"New tab"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum OpenType {
    /// Replace the note in the active pane.
    #[default]
    #[serde(rename = "Active")]
    #[strum(to_string = "Active")]
    ActivePane,
    #[serde(rename = "New tab")]
    #[strum(to_string = "New tab")]
    NewTab,
    #[serde(rename = "New split")]
    #[strum(to_string = "New split")]
    NewSplit,
    #[serde(rename = "New window")]
    #[strum(to_string = "New window")]
    NewWindow,
}

impl OpenType {
    /// Context menu title for this open type.
    pub fn menu_title(self) -> &'static str {
        match self {
            Self::ActivePane => "Open",
            Self::NewTab => "Open in new tab",
            Self::NewSplit => "Open in new split",
            Self::NewWindow => "Open in new window",
        }
    }

    /// Context menu icon name for this open type.
    pub fn menu_icon(self) -> &'static str {
        match self {
            Self::ActivePane => "file",
            Self::NewTab => "file-plus",
            Self::NewSplit => "separator-vertical",
            Self::NewWindow => "app-window",
        }
    }

    /// The host pane type to open into, or `None` for the active pane.
    pub fn pane_type(self) -> Option<PaneType> {
        match self {
            Self::ActivePane => None,
            Self::NewTab => Some(PaneType::Tab),
            Self::NewSplit => Some(PaneType::Split),
            Self::NewWindow => Some(PaneType::Window),
        }
    }
}

/// A new pane the host can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaneType {
    Tab,
    Split,
    Window,
}

impl From<PaneType> for OpenType {
    fn from(pane: PaneType) -> Self {
        match pane {
            PaneType::Tab => Self::NewTab,
            PaneType::Split => Self::NewSplit,
            PaneType::Window => Self::NewWindow,
        }
    }
}
