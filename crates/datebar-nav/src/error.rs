//! Error types for navbar operations.

use thiserror::Error;

use datebar_core::CalendarDate;

use crate::note::NoteRef;
use crate::state::ViewId;

/// Result type for navbar operations.
pub type NavbarResult<T> = Result<T, NavbarError>;

/// Errors that can occur while rendering or acting on a navbar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavbarError {
    /// The note does not exist.
    #[error("No file found for {note}")]
    NotFound { note: NoteRef },

    /// The host could not answer a lookup.
    #[error("Lookup failed for {note}: {message}")]
    Lookup { note: NoteRef, message: String },

    /// The host could not open the note.
    #[error("Failed to open {note}: {message}")]
    Open { note: NoteRef, message: String },

    /// The navbar was disposed while a request was pending.
    #[error("Navbar {view} was disposed")]
    Cancelled { view: ViewId },

    /// The week around this date runs past the supported calendar range.
    #[error("Week around {date} is out of range")]
    DateOutOfRange { date: CalendarDate },

    /// No navbar is registered for the view.
    #[error("No navbar for {view}")]
    UnknownView { view: ViewId },
}

impl NavbarError {
    /// Whether this error only reports a disposed navbar and can be ignored.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
