//! Week-of-year numbering.
//!
//! A [`WeekRule`] fixes which weekday starts a week and which January day is
//! always inside week 1. ISO weeks start on Monday and contain January 4th;
//! US-style weeks start on Sunday and contain January 1st.
//!
//! The ISO rule is answered by chrono's `IsoWeek`. Other rules are computed
//! from the weekday of January 1st.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::types::FirstDayOfWeek;

/// Week numbering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekRule {
    /// Weekday every week starts on.
    pub first_day: Weekday,
    /// Day of January (1-based) that always falls in week 1.
    pub january_anchor: u32,
}

/// A week number paired with the week-numbering year it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekNumber {
    pub year: i32,
    pub week: u32,
}

fn days_in_year(year: i32) -> i64 {
    let leap = NaiveDate::from_yo_opt(year, 1).is_some_and(|jan1| jan1.leap_year());
    if leap { 366 } else { 365 }
}

impl WeekRule {
    /// ISO 8601 weeks.
    pub const ISO: WeekRule = WeekRule {
        first_day: Weekday::Mon,
        january_anchor: 4,
    };

    /// Sunday-first weeks where week 1 contains January 1st.
    pub const US: WeekRule = WeekRule {
        first_day: Weekday::Sun,
        january_anchor: 1,
    };

    /// The locale rule matching a display convention.
    pub fn locale(first_day: FirstDayOfWeek) -> Self {
        match first_day {
            FirstDayOfWeek::Monday => Self::ISO,
            FirstDayOfWeek::Sunday => Self::US,
        }
    }

    /// Position of `day` within a week under this rule (0..=6).
    pub fn weekday_offset(&self, day: Weekday) -> u32 {
        let day = day.num_days_from_monday() as i64;
        let first = self.first_day.num_days_from_monday() as i64;
        (day - first).rem_euclid(7) as u32
    }

    /// Zero-based day-of-year on which week 1 starts, given the weekday of
    /// January 1st (as days from Monday). May be negative when week 1 begins
    /// in December.
    fn first_week_offset(&self, jan1_from_monday: i64) -> i64 {
        let anchor = self.january_anchor as i64 - 1;
        let anchor_weekday = (jan1_from_monday + anchor).rem_euclid(7);
        let back = (anchor_weekday - self.first_day.num_days_from_monday() as i64).rem_euclid(7);
        anchor - back
    }

    fn weeks_in_year_from(&self, year: i32, jan1_from_monday: i64) -> i64 {
        let next_jan1 = (jan1_from_monday + days_in_year(year)).rem_euclid(7);
        (days_in_year(year) - self.first_week_offset(jan1_from_monday)
            + self.first_week_offset(next_jan1))
            / 7
    }

    /// Week number and week-numbering year of `date`.
    pub fn week_of(&self, date: NaiveDate) -> WeekNumber {
        if *self == Self::ISO {
            let iso = date.iso_week();
            return WeekNumber {
                year: iso.year(),
                week: iso.week(),
            };
        }

        let year = date.year();
        let ordinal0 = date.ordinal0() as i64;
        let jan1 = (date.weekday().num_days_from_monday() as i64 - ordinal0).rem_euclid(7);

        let week = (ordinal0 - self.first_week_offset(jan1)).div_euclid(7) + 1;
        if week < 1 {
            let prev_jan1 = (jan1 - days_in_year(year - 1)).rem_euclid(7);
            return WeekNumber {
                year: year - 1,
                week: (week + self.weeks_in_year_from(year - 1, prev_jan1)) as u32,
            };
        }

        let weeks = self.weeks_in_year_from(year, jan1);
        if week > weeks {
            WeekNumber {
                year: year + 1,
                week: (week - weeks) as u32,
            }
        } else {
            WeekNumber {
                year,
                week: week as u32,
            }
        }
    }

    /// Number of weeks in a week-numbering year (52 or 53).
    pub fn weeks_in_year(&self, year: i32) -> Option<u32> {
        if *self == Self::ISO {
            // December 28th is always in the last ISO week
            return NaiveDate::from_ymd_opt(year, 12, 28).map(|date| date.iso_week().week());
        }
        let jan1 = NaiveDate::from_yo_opt(year, 1)?;
        let weeks = self.weeks_in_year_from(year, jan1.weekday().num_days_from_monday() as i64);
        Some(weeks as u32)
    }

    /// The date `weekday_offset` days into `week` of week-numbering `year`.
    ///
    /// Returns `None` for week 0, weeks past the end of the year, offsets
    /// beyond the week, or years chrono cannot represent.
    pub fn date_from_week(&self, year: i32, week: u32, weekday_offset: u32) -> Option<NaiveDate> {
        if week == 0 || weekday_offset > 6 {
            return None;
        }
        if *self == Self::ISO {
            let weekday = Weekday::try_from(weekday_offset as u8).ok()?;
            return NaiveDate::from_isoywd_opt(year, week, weekday);
        }
        if week > self.weeks_in_year(year)? {
            return None;
        }
        let jan1 = NaiveDate::from_yo_opt(year, 1)?;
        let start = self.first_week_offset(jan1.weekday().num_days_from_monday() as i64);
        let days = start + (week as i64 - 1) * 7 + weekday_offset as i64;
        jan1.checked_add_signed(Duration::days(days))
    }
}
