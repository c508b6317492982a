//! Week window math.
//!
//! Every function here is pure: the same inputs always give the same dates,
//! and all comparisons happen at day granularity. Results are `None` when a
//! date would leave the range chrono can represent.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

use crate::types::FirstDayOfWeek;

/// A calendar day with no time-of-day component.
pub type CalendarDate = NaiveDate;

/// Number of date buttons in a week window.
pub const DAYS_IN_WEEK: usize = 7;

/// Number of days from `first` forward to `day` (0..=6).
fn days_after(day: Weekday, first: Weekday) -> i64 {
    let day = day.num_days_from_monday() as i64;
    let first = first.num_days_from_monday() as i64;
    (day - first).rem_euclid(7)
}

fn add_days(date: CalendarDate, days: i64) -> Option<CalendarDate> {
    date.checked_add_signed(Duration::days(days))
}

/// First day of the week containing `base` under the given convention.
pub fn week_start(base: CalendarDate, first_day: FirstDayOfWeek) -> Option<CalendarDate> {
    add_days(base, -days_after(base.weekday(), first_day.weekday()))
}

/// The seven consecutive dates of the week containing `base`, ascending.
pub fn dates_in_week(base: CalendarDate, first_day: FirstDayOfWeek) -> Option<[CalendarDate; DAYS_IN_WEEK]> {
    let start = week_start(base, first_day)?;
    // The last day is in range, so every day before it is too.
    add_days(start, DAYS_IN_WEEK as i64 - 1)?;
    Some(std::array::from_fn(|i| start + Duration::days(i as i64)))
}

/// The Sunday shown as the leading extra button.
///
/// For a Monday-first window this is the day before the window. A
/// Sunday-first window already starts on a Sunday, so it is returned as is.
pub fn last_boundary_before(base: CalendarDate, first_day: FirstDayOfWeek) -> Option<CalendarDate> {
    let start = week_start(base, first_day)?;
    add_days(start, -(start.weekday().num_days_from_sunday() as i64))
}

/// The first Monday strictly after the week window.
pub fn next_boundary_after(base: CalendarDate, first_day: FirstDayOfWeek) -> Option<CalendarDate> {
    let end = add_days(week_start(base, first_day)?, DAYS_IN_WEEK as i64 - 1)?;
    add_days(end, 7 - end.weekday().num_days_from_monday() as i64)
}

/// The date a weekly note for the window around `base` is keyed on.
///
/// Starts from the ISO week (Monday) containing `base`. Sunday-first
/// displays move it back onto the Sunday that opens the displayed window,
/// which for a Sunday `base` is `base` itself.
pub fn weekly_anchor(base: CalendarDate, first_day: FirstDayOfWeek) -> Option<CalendarDate> {
    match first_day {
        FirstDayOfWeek::Monday => week_start(base, FirstDayOfWeek::Monday),
        FirstDayOfWeek::Sunday if base.weekday() == Weekday::Sun => Some(base),
        FirstDayOfWeek::Sunday => add_days(week_start(base, FirstDayOfWeek::Monday)?, -1),
    }
}

/// Advance `date` by a signed number of 7-day blocks.
pub fn shift_weeks(date: CalendarDate, weeks: i64) -> Option<CalendarDate> {
    date.checked_add_signed(Duration::try_weeks(weeks)?)
}

/// The local calendar day right now.
pub fn today() -> CalendarDate {
    Local::now().date_naive()
}

/// Canonical day key (`YYYY-MM-DD`) used for day-level identity checks.
pub fn date_key(date: CalendarDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_window() {
        let dates = dates_in_week(ymd(2024, 6, 12), FirstDayOfWeek::Monday).unwrap();
        assert_eq!(dates[0], ymd(2024, 6, 10));
        assert_eq!(dates[6], ymd(2024, 6, 16));
    }

    #[test]
    fn test_sunday_window() {
        let dates = dates_in_week(ymd(2024, 6, 12), FirstDayOfWeek::Sunday).unwrap();
        assert_eq!(dates[0], ymd(2024, 6, 9));
        assert_eq!(dates[6], ymd(2024, 6, 15));
    }

    #[test]
    fn test_window_on_its_own_start_day() {
        // 2024-06-09 is a Sunday
        let sunday = ymd(2024, 6, 9);
        assert_eq!(dates_in_week(sunday, FirstDayOfWeek::Sunday).unwrap()[0], sunday);
        assert_eq!(dates_in_week(sunday, FirstDayOfWeek::Monday).unwrap()[0], ymd(2024, 6, 3));
    }

    #[test]
    fn test_boundaries() {
        let base = ymd(2024, 6, 12);
        assert_eq!(last_boundary_before(base, FirstDayOfWeek::Monday), Some(ymd(2024, 6, 9)));
        assert_eq!(next_boundary_after(base, FirstDayOfWeek::Monday), Some(ymd(2024, 6, 17)));
        assert_eq!(last_boundary_before(base, FirstDayOfWeek::Sunday), Some(ymd(2024, 6, 9)));
        assert_eq!(next_boundary_after(base, FirstDayOfWeek::Sunday), Some(ymd(2024, 6, 17)));
    }

    #[test]
    fn test_weekly_anchor() {
        let base = ymd(2024, 6, 12);
        assert_eq!(weekly_anchor(base, FirstDayOfWeek::Monday), Some(ymd(2024, 6, 10)));
        assert_eq!(weekly_anchor(base, FirstDayOfWeek::Sunday), Some(ymd(2024, 6, 9)));
        assert_eq!(weekly_anchor(ymd(2024, 6, 16), FirstDayOfWeek::Monday), Some(ymd(2024, 6, 10)));
    }

    #[test]
    fn test_weekly_anchor_on_sunday_stays_in_window() {
        let sunday = ymd(2024, 6, 16);
        let window = dates_in_week(sunday, FirstDayOfWeek::Sunday).unwrap();
        assert_eq!(window[0], sunday);
        assert_eq!(weekly_anchor(sunday, FirstDayOfWeek::Sunday), Some(sunday));
    }

    #[test]
    fn test_shift_weeks() {
        let base = ymd(2023, 12, 25);
        assert_eq!(shift_weeks(base, 1), Some(ymd(2024, 1, 1)));
        assert_eq!(shift_weeks(base, -2), Some(ymd(2023, 12, 11)));
        assert_eq!(shift_weeks(base, 0), Some(base));
    }

    #[test]
    fn test_out_of_range_dates() {
        for first in [FirstDayOfWeek::Sunday, FirstDayOfWeek::Monday] {
            assert_eq!(dates_in_week(NaiveDate::MAX, first), None);
            assert_eq!(next_boundary_after(NaiveDate::MAX, first), None);
            assert_eq!(last_boundary_before(NaiveDate::MIN, first), None);
        }
        assert_eq!(shift_weeks(ymd(2024, 6, 12), i64::MAX), None);
        assert_eq!(shift_weeks(ymd(2024, 6, 12), 1 << 40), None);
    }

    #[test]
    fn test_date_key() {
        assert_eq!(date_key(ymd(2024, 1, 5)), "2024-01-05");
    }
}
