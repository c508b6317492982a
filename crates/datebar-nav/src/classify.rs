//! Button classification and render output.
//!
//! A render pass turns a [`NavState`] plus settings into an ordered list of
//! [`NavbarItem`]s. Nothing here is persisted; every render recomputes it.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use datebar_core::{
    CalendarDate, DateFormat, NavbarSettings, dates_in_week, last_boundary_before,
    next_boundary_after, weekly_anchor,
};

use crate::error::{NavbarError, NavbarResult};
use crate::host::NoteIndex;
use crate::note::NoteRef;
use crate::state::{NavState, ViewId, WeekDirection};

/// Base style of a button. Being today is tracked separately as `is_current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateTag {
    /// The navbar's selected day.
    Active,
    /// A note exists for the date.
    Default,
    /// No note exists (or the lookup failed).
    NotExists,
}

impl StateTag {
    /// Class name the host styles this state with.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Active => "daily-note-navbar__active",
            Self::Default => "daily-note-navbar__default",
            Self::NotExists => "daily-note-navbar__not-exists",
        }
    }
}

/// A daily note button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSpec {
    pub date: CalendarDate,
    pub label: String,
    pub tooltip: String,
    pub state: StateTag,
    /// The date is today.
    pub is_current: bool,
    /// One of the boundary buttons outside the week.
    pub is_extra: bool,
}

impl ButtonSpec {
    /// Class names for the button, in the order they are applied.
    pub fn class_names(&self) -> Vec<&'static str> {
        let mut classes = vec!["daily-note-navbar__date", self.state.class_name()];
        if self.is_current {
            classes.push("daily-note-navbar__current");
        }
        if self.is_extra {
            classes.push("daily-note-navbar__extra");
        }
        classes
    }
}

/// The weekly note button. It is never active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyButtonSpec {
    pub week_start: CalendarDate,
    pub label: String,
    pub tooltip: String,
    pub exists: bool,
}

impl WeeklyButtonSpec {
    pub fn state(&self) -> StateTag {
        if self.exists {
            StateTag::Default
        } else {
            StateTag::NotExists
        }
    }
}

/// One element of the rendered bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavbarItem {
    Weekly(WeeklyButtonSpec),
    Date(ButtonSpec),
    ChangeWeek { direction: WeekDirection },
}

impl NavbarItem {
    /// Tooltip of the item.
    pub fn tooltip(&self) -> &str {
        match self {
            Self::Weekly(button) => &button.tooltip,
            Self::Date(button) => &button.tooltip,
            Self::ChangeWeek {
                direction: WeekDirection::Previous,
            } => "Previous week",
            Self::ChangeWeek {
                direction: WeekDirection::Next,
            } => "Next week",
        }
    }

    /// The note behind the item, if it has one.
    pub fn note(&self) -> Option<NoteRef> {
        match self {
            Self::Weekly(button) => Some(NoteRef::Weekly(button.week_start)),
            Self::Date(button) => Some(NoteRef::Daily(button.date)),
            Self::ChangeWeek { .. } => None,
        }
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavbarView {
    pub view_id: ViewId,
    pub anchor_date: CalendarDate,
    pub week_offset: i64,
    pub items: Vec<NavbarItem>,
}

impl NavbarView {
    /// All daily note buttons, extras included, in display order.
    pub fn date_buttons(&self) -> impl Iterator<Item = &ButtonSpec> {
        self.items.iter().filter_map(|item| match item {
            NavbarItem::Date(button) => Some(button),
            _ => None,
        })
    }

    /// The seven in-window buttons.
    pub fn window_buttons(&self) -> impl Iterator<Item = &ButtonSpec> {
        self.date_buttons().filter(|button| !button.is_extra)
    }

    pub fn weekly_button(&self) -> Option<&WeeklyButtonSpec> {
        self.items.iter().find_map(|item| match item {
            NavbarItem::Weekly(button) => Some(button),
            _ => None,
        })
    }
}

/// Label and tooltip patterns, compiled once per render.
struct Formats {
    label: DateFormat,
    tooltip: DateFormat,
    weekly_label: DateFormat,
    weekly_name: DateFormat,
}

impl Formats {
    fn new(settings: &NavbarSettings) -> Self {
        Self {
            label: DateFormat::compile_lenient(&settings.date_format),
            tooltip: DateFormat::compile_lenient(&settings.tooltip_date_format),
            weekly_label: DateFormat::compile_lenient(&settings.weekly_note_display_format),
            weekly_name: DateFormat::compile_lenient(&settings.weekly_note_date_format),
        }
    }
}

fn exists_or_warn(note: NoteRef, result: NavbarResult<bool>) -> bool {
    result.unwrap_or_else(|e| {
        tracing::warn!(%note, error = %e, "note lookup failed, rendering as missing");
        false
    })
}

/// Classify a single daily note button.
pub fn classify_date(
    state: &NavState,
    date: CalendarDate,
    today: CalendarDate,
    settings: &NavbarSettings,
    index: &dyn NoteIndex,
    is_extra: bool,
) -> ButtonSpec {
    classify_with(state, date, today, settings, &Formats::new(settings), index, is_extra)
}

fn classify_with(
    state: &NavState,
    date: CalendarDate,
    today: CalendarDate,
    settings: &NavbarSettings,
    formats: &Formats,
    index: &dyn NoteIndex,
    is_extra: bool,
) -> ButtonSpec {
    let first_day = settings.first_day_of_week;
    let exists = exists_or_warn(NoteRef::Daily(date), index.daily_note_exists(date));

    let state_tag = if state.is_active(date) {
        StateTag::Active
    } else if exists {
        StateTag::Default
    } else {
        StateTag::NotExists
    };

    ButtonSpec {
        date,
        label: format!("{} {}", formats.label.format(date, first_day), date.day()),
        tooltip: formats.tooltip.format(date, first_day),
        state: state_tag,
        is_current: date == today,
        is_extra,
    }
}

/// Classify the weekly note button for the window around `base`.
pub fn classify_week(
    base: CalendarDate,
    settings: &NavbarSettings,
    index: &dyn NoteIndex,
) -> NavbarResult<WeeklyButtonSpec> {
    classify_week_with(base, settings, &Formats::new(settings), index)
}

fn classify_week_with(
    base: CalendarDate,
    settings: &NavbarSettings,
    formats: &Formats,
    index: &dyn NoteIndex,
) -> NavbarResult<WeeklyButtonSpec> {
    let first_day = settings.first_day_of_week;
    let week_start = weekly_anchor(base, first_day).ok_or(NavbarError::DateOutOfRange { date: base })?;
    let exists = exists_or_warn(NoteRef::Weekly(week_start), index.weekly_note_exists(week_start));

    Ok(WeeklyButtonSpec {
        week_start,
        label: formats.weekly_label.format(week_start, first_day),
        tooltip: formats.weekly_name.format(week_start, first_day),
        exists,
    })
}

/// Compute the full bar for `state`.
///
/// Layout: weekly button (if enabled), last Sunday (if extras are shown and
/// it is not already the first day of the window), previous week, the seven
/// window days, next week, next Monday (if extras are shown).
///
/// Fails with `DateOutOfRange` when the window would leave the calendar.
pub fn render(
    state: &NavState,
    settings: &NavbarSettings,
    today: CalendarDate,
    index: &dyn NoteIndex,
) -> NavbarResult<NavbarView> {
    let formats = Formats::new(settings);
    let first_day = settings.first_day_of_week;
    let out_of_range = |date| NavbarError::DateOutOfRange { date };

    let base = state
        .window_base_date()
        .ok_or(out_of_range(state.anchor_date()))?;
    let dates = dates_in_week(base, first_day).ok_or(out_of_range(base))?;
    let mut items = Vec::with_capacity(12);

    if settings.enable_weekly_note_button {
        items.push(NavbarItem::Weekly(classify_week_with(base, settings, &formats, index)?));
    }

    let extra = |date: CalendarDate| {
        NavbarItem::Date(classify_with(state, date, today, settings, &formats, index, true))
    };

    if settings.show_extra_buttons {
        let last_sunday = last_boundary_before(base, first_day).ok_or(out_of_range(base))?;
        if last_sunday != dates[0] {
            items.push(extra(last_sunday));
        }
    }

    items.push(NavbarItem::ChangeWeek {
        direction: WeekDirection::Previous,
    });
    items.extend(dates.into_iter().map(|date| {
        NavbarItem::Date(classify_with(state, date, today, settings, &formats, index, false))
    }));
    items.push(NavbarItem::ChangeWeek {
        direction: WeekDirection::Next,
    });

    if settings.show_extra_buttons {
        let next_monday = next_boundary_after(base, first_day).ok_or(out_of_range(base))?;
        items.push(extra(next_monday));
    }

    Ok(NavbarView {
        view_id: state.view_id(),
        anchor_date: state.anchor_date(),
        week_offset: state.week_offset(),
        items,
    })
}
