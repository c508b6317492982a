//! Date format patterns using the moment.js token vocabulary.
//!
//! Note names, button labels and tooltips are all described by user-supplied
//! patterns such as `YYYY-MM-DD`, `ddd` or `gggg-[W]ww`. A pattern is compiled
//! once into a token list, which can then both format dates and strictly parse
//! filenames back into dates.

use std::fmt::Write;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::FormatError;
use crate::types::FirstDayOfWeek;
use crate::week::WeekRule;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Indexed from Sunday.
const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const WEEKDAY_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const WEEKDAY_MIN: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// A single element of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    /// `YYYY`
    Year,
    /// `YY`
    YearShort,
    /// `Q`
    Quarter,
    /// `M`
    Month,
    /// `MM`
    MonthPadded,
    /// `Mo`
    MonthOrdinal,
    /// `MMM`
    MonthShort,
    /// `MMMM`
    MonthName,
    /// `D`
    Day,
    /// `DD`
    DayPadded,
    /// `Do`
    DayOrdinal,
    /// `DDD`
    DayOfYear,
    /// `DDDD`
    DayOfYearPadded,
    /// `d`
    WeekdayNumber,
    /// `dd`
    WeekdayMin,
    /// `ddd`
    WeekdayShort,
    /// `dddd`
    WeekdayName,
    /// `e`
    LocaleWeekday,
    /// `E`
    IsoWeekday,
    /// `w`
    Week,
    /// `ww`
    WeekPadded,
    /// `wo`
    WeekOrdinal,
    /// `W`
    IsoWeek,
    /// `WW`
    IsoWeekPadded,
    /// `Wo`
    IsoWeekOrdinal,
    /// `gg`
    WeekYearShort,
    /// `gggg`
    WeekYear,
    /// `GG`
    IsoWeekYearShort,
    /// `GGGG`
    IsoWeekYear,
}

// Longest first so that `DDDD` wins over `DD` + `DD`.
const TOKEN_TABLE: &[(&str, Token)] = &[
    ("YYYY", Token::Year),
    ("MMMM", Token::MonthName),
    ("DDDD", Token::DayOfYearPadded),
    ("dddd", Token::WeekdayName),
    ("gggg", Token::WeekYear),
    ("GGGG", Token::IsoWeekYear),
    ("MMM", Token::MonthShort),
    ("DDD", Token::DayOfYear),
    ("ddd", Token::WeekdayShort),
    ("YY", Token::YearShort),
    ("MM", Token::MonthPadded),
    ("Mo", Token::MonthOrdinal),
    ("DD", Token::DayPadded),
    ("Do", Token::DayOrdinal),
    ("dd", Token::WeekdayMin),
    ("ww", Token::WeekPadded),
    ("wo", Token::WeekOrdinal),
    ("WW", Token::IsoWeekPadded),
    ("Wo", Token::IsoWeekOrdinal),
    ("gg", Token::WeekYearShort),
    ("GG", Token::IsoWeekYearShort),
    ("Q", Token::Quarter),
    ("M", Token::Month),
    ("D", Token::Day),
    ("d", Token::WeekdayNumber),
    ("e", Token::LocaleWeekday),
    ("E", Token::IsoWeekday),
    ("w", Token::Week),
    ("W", Token::IsoWeek),
];

/// English ordinal for a number: `1st`, `2nd`, `11th`, `23rd`.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    tokens: Vec<Token>,
}

impl DateFormat {
    /// Compile a pattern, rejecting empty patterns and unterminated `[` escapes.
    pub fn compile(pattern: &str) -> Result<Self, FormatError> {
        if pattern.trim().is_empty() {
            return Err(FormatError::Empty);
        }
        Self::tokenize(pattern, true)
    }

    /// Compile a pattern the way the host's date library does: an
    /// unterminated `[` is just a literal character.
    pub fn compile_lenient(pattern: &str) -> Self {
        match Self::tokenize(pattern, false) {
            Ok(format) => format,
            Err(_) => Self {
                pattern: pattern.to_string(),
                tokens: vec![Token::Literal(pattern.to_string())],
            },
        }
    }

    fn tokenize(pattern: &str, strict: bool) -> Result<Self, FormatError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while let Some(c) = rest.chars().next() {
            if c == '[' {
                if let Some(end) = rest.find(']') {
                    literal.push_str(&rest[1..end]);
                    rest = &rest[end + 1..];
                    continue;
                }
                if strict {
                    return Err(FormatError::UnterminatedLiteral {
                        pattern: pattern.to_string(),
                        position: pattern.len() - rest.len(),
                    });
                }
            }

            if let Some((text, token)) = TOKEN_TABLE.iter().find(|(text, _)| rest.starts_with(text)) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(token.clone());
                rest = &rest[text.len()..];
            } else {
                literal.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            tokens,
        })
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern carries enough to identify a single day.
    pub fn identifies_day(&self) -> bool {
        let has = |t: &Token| self.tokens.contains(t);
        let year = has(&Token::Year) || has(&Token::YearShort);
        let month = [Token::Month, Token::MonthPadded, Token::MonthOrdinal, Token::MonthShort, Token::MonthName]
            .iter()
            .any(has);
        let day = [Token::Day, Token::DayPadded, Token::DayOrdinal].iter().any(has);
        let day_of_year = has(&Token::DayOfYear) || has(&Token::DayOfYearPadded);
        year && ((month && day) || day_of_year)
    }

    /// Render `date` with this pattern. Locale week tokens follow `first_day`.
    pub fn format(&self, date: NaiveDate, first_day: FirstDayOfWeek) -> String {
        let locale = WeekRule::locale(first_day);
        let mut out = String::new();

        for token in &self.tokens {
            // Writing into a String cannot fail.
            let _ = match token {
                Token::Literal(text) => out.write_str(text),
                Token::Year => write_year(&mut out, date.year()),
                Token::YearShort => write!(out, "{:02}", date.year().rem_euclid(100)),
                Token::Quarter => write!(out, "{}", date.month0() / 3 + 1),
                Token::Month => write!(out, "{}", date.month()),
                Token::MonthPadded => write!(out, "{:02}", date.month()),
                Token::MonthOrdinal => out.write_str(&ordinal(date.month())),
                Token::MonthShort => out.write_str(MONTH_SHORT[date.month0() as usize]),
                Token::MonthName => out.write_str(MONTH_NAMES[date.month0() as usize]),
                Token::Day => write!(out, "{}", date.day()),
                Token::DayPadded => write!(out, "{:02}", date.day()),
                Token::DayOrdinal => out.write_str(&ordinal(date.day())),
                Token::DayOfYear => write!(out, "{}", date.ordinal()),
                Token::DayOfYearPadded => write!(out, "{:03}", date.ordinal()),
                Token::WeekdayNumber => write!(out, "{}", date.weekday().num_days_from_sunday()),
                Token::WeekdayMin => out.write_str(WEEKDAY_MIN[sunday_index(date.weekday())]),
                Token::WeekdayShort => out.write_str(WEEKDAY_SHORT[sunday_index(date.weekday())]),
                Token::WeekdayName => out.write_str(WEEKDAY_NAMES[sunday_index(date.weekday())]),
                Token::LocaleWeekday => write!(out, "{}", locale.weekday_offset(date.weekday())),
                Token::IsoWeekday => write!(out, "{}", date.weekday().number_from_monday()),
                Token::Week => write!(out, "{}", locale.week_of(date).week),
                Token::WeekPadded => write!(out, "{:02}", locale.week_of(date).week),
                Token::WeekOrdinal => out.write_str(&ordinal(locale.week_of(date).week)),
                Token::IsoWeek => write!(out, "{}", WeekRule::ISO.week_of(date).week),
                Token::IsoWeekPadded => write!(out, "{:02}", WeekRule::ISO.week_of(date).week),
                Token::IsoWeekOrdinal => out.write_str(&ordinal(WeekRule::ISO.week_of(date).week)),
                Token::WeekYearShort => write!(out, "{:02}", locale.week_of(date).year.rem_euclid(100)),
                Token::WeekYear => write_year(&mut out, locale.week_of(date).year),
                Token::IsoWeekYearShort => {
                    write!(out, "{:02}", WeekRule::ISO.week_of(date).year.rem_euclid(100))
                }
                Token::IsoWeekYear => write_year(&mut out, WeekRule::ISO.week_of(date).year),
            };
        }

        out
    }

    /// Strictly parse `input` against this pattern.
    ///
    /// Every token must match exactly and the whole input must be consumed.
    /// Returns `None` when the input is not a date in this format.
    pub fn parse(&self, input: &str, first_day: FirstDayOfWeek) -> Option<NaiveDate> {
        let mut cursor = Cursor { rest: input };
        let mut fields = Fields::default();

        for token in &self.tokens {
            match token {
                Token::Literal(text) => cursor.literal(text)?,
                Token::Year => fields.year = Some(cursor.digits(4, 4)? as i32),
                Token::YearShort => fields.year = Some(two_digit_year(cursor.digits(2, 2)?)),
                Token::Quarter => fields.quarter = Some(cursor.digits(1, 1)?),
                Token::Month => fields.month = Some(cursor.digits(1, 2)?),
                Token::MonthPadded => fields.month = Some(cursor.digits(2, 2)?),
                Token::MonthOrdinal => fields.month = Some(cursor.ordinal()?),
                Token::MonthShort => fields.month = Some(cursor.name(&MONTH_SHORT)? as u32 + 1),
                Token::MonthName => fields.month = Some(cursor.name(&MONTH_NAMES)? as u32 + 1),
                Token::Day => fields.day = Some(cursor.digits(1, 2)?),
                Token::DayPadded => fields.day = Some(cursor.digits(2, 2)?),
                Token::DayOrdinal => fields.day = Some(cursor.ordinal()?),
                Token::DayOfYear => fields.day_of_year = Some(cursor.digits(1, 3)?),
                Token::DayOfYearPadded => fields.day_of_year = Some(cursor.digits(3, 3)?),
                Token::WeekdayNumber => {
                    fields.weekday = Some(weekday_from_sunday(cursor.digits(1, 1)?)?)
                }
                Token::WeekdayMin => fields.weekday = Some(weekday_from_sunday(cursor.name(&WEEKDAY_MIN)? as u32)?),
                Token::WeekdayShort => {
                    fields.weekday = Some(weekday_from_sunday(cursor.name(&WEEKDAY_SHORT)? as u32)?)
                }
                Token::WeekdayName => {
                    fields.weekday = Some(weekday_from_sunday(cursor.name(&WEEKDAY_NAMES)? as u32)?)
                }
                Token::LocaleWeekday => fields.locale_weekday = Some(cursor.digits(1, 1)?),
                Token::IsoWeekday => fields.iso_weekday = Some(cursor.digits(1, 1)?),
                Token::Week => fields.week = Some(cursor.digits(1, 2)?),
                Token::WeekPadded => fields.week = Some(cursor.digits(2, 2)?),
                Token::WeekOrdinal => fields.week = Some(cursor.ordinal()?),
                Token::IsoWeek => fields.iso_week = Some(cursor.digits(1, 2)?),
                Token::IsoWeekPadded => fields.iso_week = Some(cursor.digits(2, 2)?),
                Token::IsoWeekOrdinal => fields.iso_week = Some(cursor.ordinal()?),
                Token::WeekYearShort => fields.week_year = Some(two_digit_year(cursor.digits(2, 2)?)),
                Token::WeekYear => fields.week_year = Some(cursor.digits(4, 4)? as i32),
                Token::IsoWeekYearShort => {
                    fields.iso_week_year = Some(two_digit_year(cursor.digits(2, 2)?))
                }
                Token::IsoWeekYear => fields.iso_week_year = Some(cursor.digits(4, 4)? as i32),
            }
        }

        if !cursor.rest.is_empty() {
            return None;
        }

        fields.resolve(WeekRule::locale(first_day))
    }
}

fn write_year(out: &mut String, year: i32) -> std::fmt::Result {
    if year < 0 {
        write!(out, "-{:04}", -year)
    } else {
        write!(out, "{year:04}")
    }
}

fn sunday_index(day: Weekday) -> usize {
    day.num_days_from_sunday() as usize
}

fn weekday_from_sunday(n: u32) -> Option<Weekday> {
    const FROM_SUNDAY: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];
    FROM_SUNDAY.get(n as usize).copied()
}

/// Two-digit years map 69..=99 to the 1900s and 00..=68 to the 2000s.
fn two_digit_year(yy: u32) -> i32 {
    if yy > 68 { 1900 + yy as i32 } else { 2000 + yy as i32 }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl Cursor<'_> {
    fn literal(&mut self, text: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(text)?;
        Some(())
    }

    /// Between `min` and `max` ASCII digits, greedily.
    fn digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let len = self
            .rest
            .bytes()
            .take(max)
            .take_while(u8::is_ascii_digit)
            .count();
        if len < min {
            return None;
        }
        let value = self.rest[..len].parse().ok()?;
        self.rest = &self.rest[len..];
        Some(value)
    }

    fn ordinal(&mut self) -> Option<u32> {
        let n = self.digits(1, 2)?;
        let suffix = &ordinal(n)[n.to_string().len()..];
        self.literal(suffix)?;
        Some(n)
    }

    /// Case-insensitive match against a name table, returning its index.
    fn name(&mut self, names: &[&str]) -> Option<usize> {
        let (index, name) = names.iter().enumerate().find(|(_, name)| {
            self.rest
                .get(..name.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(name))
        })?;
        self.rest = &self.rest[name.len()..];
        Some(index)
    }
}

/// Raw values collected while parsing, before they are resolved to a date.
#[derive(Debug, Default)]
struct Fields {
    year: Option<i32>,
    quarter: Option<u32>,
    month: Option<u32>,
    day: Option<u32>,
    day_of_year: Option<u32>,
    weekday: Option<Weekday>,
    locale_weekday: Option<u32>,
    iso_weekday: Option<u32>,
    week: Option<u32>,
    week_year: Option<i32>,
    iso_week: Option<u32>,
    iso_week_year: Option<i32>,
}

impl Fields {
    fn resolve(&self, locale: WeekRule) -> Option<NaiveDate> {
        let date = if let Some(year) = self.year {
            match (self.month, self.day, self.day_of_year) {
                (None, None, Some(doy)) => NaiveDate::from_yo_opt(year, doy)?,
                (month, day, _) => NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1))?,
            }
        } else if let Some(year) = self.week_year {
            let offset = match (self.locale_weekday, self.weekday) {
                (Some(e), _) => e,
                (None, Some(day)) => locale.weekday_offset(day),
                (None, None) => 0,
            };
            locale.date_from_week(year, self.week.unwrap_or(1), offset)?
        } else if let Some(year) = self.iso_week_year {
            let offset = match (self.iso_weekday, self.weekday) {
                (Some(e), _) => e.checked_sub(1)?,
                (None, Some(day)) => WeekRule::ISO.weekday_offset(day),
                (None, None) => 0,
            };
            WeekRule::ISO.date_from_week(year, self.iso_week.unwrap_or(1), offset)?
        } else {
            return None;
        };

        self.consistent_with(date, locale).then_some(date)
    }

    /// Every redundant field that was parsed must agree with the date.
    fn consistent_with(&self, date: NaiveDate, locale: WeekRule) -> bool {
        let locale_week = locale.week_of(date);
        let iso_week = WeekRule::ISO.week_of(date);

        self.weekday.is_none_or(|day| day == date.weekday())
            && self.quarter.is_none_or(|q| q == date.month0() / 3 + 1)
            && self.day_of_year.is_none_or(|doy| doy == date.ordinal())
            && self.locale_weekday.is_none_or(|e| e == locale.weekday_offset(date.weekday()))
            && self.iso_weekday.is_none_or(|e| e == date.weekday().number_from_monday())
            && self.week.is_none_or(|w| w == locale_week.week)
            && self.week_year.is_none_or(|y| y == locale_week.year)
            && self.iso_week.is_none_or(|w| w == iso_week.week)
            && self.iso_week_year.is_none_or(|y| y == iso_week.year)
    }
}

/// Format `date` with `pattern`, treating malformed escapes leniently.
pub fn format_date(date: NaiveDate, pattern: &str, first_day: FirstDayOfWeek) -> String {
    DateFormat::compile_lenient(pattern).format(date, first_day)
}

/// Recognize the date encoded in a filename (without extension).
///
/// Returns `None` when the name does not strictly match `pattern`; callers
/// treat that as "not a daily note", never as a fault.
pub fn parse_date_from_filename(
    filename: &str,
    pattern: &str,
    first_day: FirstDayOfWeek,
) -> Option<NaiveDate> {
    DateFormat::compile_lenient(pattern).parse(filename, first_day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compile_merges_literals() {
        let format = DateFormat::compile("gggg-[W]ww").unwrap();
        assert_eq!(
            format.tokens,
            vec![Token::WeekYear, Token::Literal("-W".to_string()), Token::WeekPadded]
        );
    }

    #[test]
    fn test_compile_rejects_bad_patterns() {
        assert!(matches!(DateFormat::compile("   "), Err(FormatError::Empty)));
        assert!(matches!(
            DateFormat::compile("YYYY-[W"),
            Err(FormatError::UnterminatedLiteral { position: 5, .. })
        ));
        // The lenient compiler keeps the bracket as text
        assert_eq!(DateFormat::compile_lenient("YYYY [x").format(ymd(2024, 1, 2), FirstDayOfWeek::Monday), "2024 [x");
    }

    #[test]
    fn test_format_common_tokens() {
        let date = ymd(2024, 6, 12);
        let monday = FirstDayOfWeek::Monday;
        assert_eq!(format_date(date, "YYYY-MM-DD", monday), "2024-06-12");
        assert_eq!(format_date(date, "ddd", monday), "Wed");
        assert_eq!(format_date(date, "dddd, MMMM Do YYYY", monday), "Wednesday, June 12th 2024");
        assert_eq!(format_date(date, "D/M/YY", monday), "12/6/24");
        assert_eq!(format_date(date, "Q DDD DDDD", monday), "2 164 164");
        assert_eq!(format_date(date, "dd d e E", monday), "We 3 2 3");
        assert_eq!(format_date(date, "[Today is] ddd", monday), "Today is Wed");
    }

    #[test]
    fn test_format_week_tokens_follow_first_day() {
        // Sunday 2024-06-16 is the last day of ISO week 24 but starts US week 25
        let date = ymd(2024, 6, 16);
        assert_eq!(format_date(date, "gggg-[W]ww", FirstDayOfWeek::Monday), "2024-W24");
        assert_eq!(format_date(date, "gggg-[W]ww", FirstDayOfWeek::Sunday), "2024-W25");
        assert_eq!(format_date(date, "GGGG-[W]WW", FirstDayOfWeek::Sunday), "2024-W24");
        assert_eq!(format_date(ymd(2021, 1, 3), "GGGG [w]Wo", FirstDayOfWeek::Monday), "2020 w53rd");
    }

    #[test]
    fn test_parse_daily_names() {
        let monday = FirstDayOfWeek::Monday;
        assert_eq!(parse_date_from_filename("2024-06-12", "YYYY-MM-DD", monday), Some(ymd(2024, 6, 12)));
        assert_eq!(parse_date_from_filename("2024-6-12", "YYYY-MM-DD", monday), None);
        assert_eq!(parse_date_from_filename("2024-06-12 notes", "YYYY-MM-DD", monday), None);
        assert_eq!(parse_date_from_filename("2024-02-30", "YYYY-MM-DD", monday), None);
        assert_eq!(parse_date_from_filename("Meeting notes", "YYYY-MM-DD", monday), None);
        assert_eq!(
            parse_date_from_filename("Wednesday, june 12th 2024", "dddd, MMMM Do YYYY", monday),
            Some(ymd(2024, 6, 12))
        );
        // Weekday must agree with the date
        assert_eq!(parse_date_from_filename("Thu 2024-06-12", "ddd YYYY-MM-DD", monday), None);
    }

    #[test]
    fn test_parse_week_names() {
        assert_eq!(
            parse_date_from_filename("2024-W24", "gggg-[W]ww", FirstDayOfWeek::Monday),
            Some(ymd(2024, 6, 10))
        );
        assert_eq!(
            parse_date_from_filename("2024-W25", "gggg-[W]ww", FirstDayOfWeek::Sunday),
            Some(ymd(2024, 6, 16))
        );
        assert_eq!(parse_date_from_filename("2024-W60", "gggg-[W]ww", FirstDayOfWeek::Monday), None);
    }

    #[test]
    fn test_parse_without_year_is_unrecognized() {
        assert_eq!(parse_date_from_filename("06-12", "MM-DD", FirstDayOfWeek::Monday), None);
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(two_digit_year(24), 2024);
        assert_eq!(two_digit_year(68), 2068);
        assert_eq!(two_digit_year(69), 1969);
    }

    #[test]
    fn test_identifies_day() {
        assert!(DateFormat::compile("YYYY-MM-DD").unwrap().identifies_day());
        assert!(DateFormat::compile("YYYY-DDDD").unwrap().identifies_day());
        assert!(!DateFormat::compile("gggg-[W]ww").unwrap().identifies_day());
        assert!(!DateFormat::compile("ddd").unwrap().identifies_day());
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(22), "22nd");
        assert_eq!(ordinal(113), "113th");
    }
}
