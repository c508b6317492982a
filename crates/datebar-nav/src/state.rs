//! Per-view navigation state.

use std::fmt;

use serde::{Deserialize, Serialize};

use datebar_core::{CalendarDate, shift_weeks};

/// Identifier of the editor view a navbar is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl ViewId {
    /// Create a new view id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Direction of a one-week shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekDirection {
    Previous,
    Next,
}

impl WeekDirection {
    /// Signed week delta.
    pub fn delta(self) -> i64 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// What a navbar currently shows.
///
/// `anchor_date` is the selected day, normally the date of the open file.
/// `week_offset` counts week shifts away from it and is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    view_id: ViewId,
    anchor_date: CalendarDate,
    week_offset: i64,
}

impl NavState {
    /// Create state for a newly attached view.
    pub fn new(view_id: ViewId, anchor_date: CalendarDate) -> Self {
        Self {
            view_id,
            anchor_date,
            week_offset: 0,
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn anchor_date(&self) -> CalendarDate {
        self.anchor_date
    }

    pub fn week_offset(&self) -> i64 {
        self.week_offset
    }

    /// React to the view's file date, as parsed from its name.
    ///
    /// A recognized date on a different day becomes the new anchor and
    /// clears the week offset. `None` (not a daily note) and the same day
    /// are no-ops. Returns `true` if the state was reset.
    pub fn file_changed(&mut self, file_date: Option<CalendarDate>) -> bool {
        match file_date {
            Some(date) if date != self.anchor_date => {
                tracing::debug!(
                    view = %self.view_id,
                    from = %self.anchor_date,
                    to = %date,
                    "file date changed, resetting anchor"
                );
                self.anchor_date = date;
                self.week_offset = 0;
                true
            }
            _ => false,
        }
    }

    /// Move the window one week without touching the anchor.
    pub fn shift_week(&mut self, direction: WeekDirection) {
        self.week_offset += direction.delta();
        tracing::debug!(view = %self.view_id, offset = self.week_offset, "shifted week");
    }

    /// The anchor advanced by `week_offset` weeks, or `None` past the
    /// calendar range.
    pub fn window_base_date(&self) -> Option<CalendarDate> {
        shift_weeks(self.anchor_date, self.week_offset)
    }

    /// Whether `date` is the selected day.
    pub fn is_active(&self, date: CalendarDate) -> bool {
        date == self.anchor_date
    }
}
