//! Context menu model.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use datebar_core::OpenType;

use crate::interaction::NavAction;
use crate::note::NoteRef;

/// One entry of a note's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuItem {
    Open(OpenType),
    Separator,
    CopyLink,
}

impl MenuItem {
    /// Display title. Separators have none.
    pub fn title(self) -> Option<&'static str> {
        match self {
            Self::Open(open_type) => Some(open_type.menu_title()),
            Self::Separator => None,
            Self::CopyLink => Some("Copy Obsidian URL"),
        }
    }

    pub fn icon(self) -> Option<&'static str> {
        match self {
            Self::Open(open_type) => Some(open_type.menu_icon()),
            Self::Separator => None,
            Self::CopyLink => Some("copy"),
        }
    }
}

/// Context menu for a single note: every open type, a separator, then the
/// copy-link action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenu {
    pub note: NoteRef,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    pub fn for_note(note: NoteRef) -> Self {
        let items = OpenType::iter()
            .map(MenuItem::Open)
            .chain([MenuItem::Separator, MenuItem::CopyLink])
            .collect();
        Self { note, items }
    }

    /// Item at `index`, if any.
    pub fn item(&self, index: usize) -> Option<MenuItem> {
        self.items.get(index).copied()
    }

    /// The navigation action an item maps to. Copying the link is async and
    /// goes through `Navbar::copy_link` instead.
    pub fn action(&self, item: MenuItem) -> Option<NavAction> {
        match item {
            MenuItem::Open(open_type) => Some(NavAction::Open {
                note: self.note,
                open_type,
            }),
            MenuItem::Separator | MenuItem::CopyLink => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_menu_order() {
        let note = NoteRef::Daily(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());
        let menu = ContextMenu::for_note(note);

        assert_eq!(
            menu.items,
            vec![
                MenuItem::Open(OpenType::ActivePane),
                MenuItem::Open(OpenType::NewTab),
                MenuItem::Open(OpenType::NewSplit),
                MenuItem::Open(OpenType::NewWindow),
                MenuItem::Separator,
                MenuItem::CopyLink,
            ]
        );
        assert_eq!(menu.item(1).and_then(MenuItem::title), Some("Open in new tab"));
        assert_eq!(menu.item(5).and_then(MenuItem::icon), Some("copy"));
        assert_eq!(menu.item(4).and_then(MenuItem::title), None);
        assert_eq!(menu.item(6), None);
        assert_eq!(
            menu.action(MenuItem::Open(OpenType::NewWindow)),
            Some(NavAction::Open {
                note,
                open_type: OpenType::NewWindow
            })
        );
        assert_eq!(menu.action(MenuItem::CopyLink), None);
    }
}
