//! Interfaces the navbar calls into.
//!
//! The navbar decides what to show and what an interaction means. Finding
//! note files, opening them and building links is left to the host through
//! these traits.

use std::future::Future;
use std::pin::Pin;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use datebar_core::{CalendarDate, OpenType};

use crate::error::NavbarResult;
use crate::note::{NoteFile, NoteRef};

/// Type alias for boxed futures returned by async host methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Existence checks used while classifying buttons.
pub trait NoteIndex {
    /// Whether a daily note exists for `date`.
    fn daily_note_exists(&self, date: CalendarDate) -> NavbarResult<bool>;

    /// Whether a weekly note exists for the week keyed on `week_start`.
    fn weekly_note_exists(&self, week_start: CalendarDate) -> NavbarResult<bool>;
}

/// Resolves notes to files, possibly asynchronously.
pub trait NoteResolver: Send + Sync {
    /// Find the file backing `note`, failing with `NotFound` if there is none.
    fn resolve_note(&self, note: NoteRef) -> BoxFuture<'_, NavbarResult<NoteFile>>;
}

/// Opens notes in the host.
pub trait NoteOpener {
    /// Open `note` in the requested place.
    fn open_note(&self, note: NoteRef, open_type: OpenType, set_active: bool) -> NavbarResult<()>;
}

/// Builds a shareable link to a note file.
pub trait LinkBuilder: Send + Sync {
    fn build_link(&self, vault_name: &str, file: &NoteFile) -> String;
}

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `obsidian://open` links.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObsidianLinks;

impl LinkBuilder for ObsidianLinks {
    fn build_link(&self, vault_name: &str, file: &NoteFile) -> String {
        let path = file.link_path();
        let file = utf8_percent_encode(&path, URI_COMPONENT);
        format!("obsidian://open?vault={vault_name}&file={file}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obsidian_link() {
        let file = NoteFile::new("Daily Notes/2024-06-12.md");
        assert_eq!(
            ObsidianLinks.build_link("Work", &file),
            "obsidian://open?vault=Work&file=Daily%20Notes%2F2024-06-12"
        );
    }

    #[test]
    fn test_link_keeps_unreserved_marks() {
        let file = NoteFile::new("notes/(draft) it's~ok!.md");
        assert_eq!(
            ObsidianLinks.build_link("v", &file),
            "obsidian://open?vault=v&file=notes%2F(draft)%20it's~ok!"
        );
    }
}
