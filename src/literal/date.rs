//! Date literals
//!
//! Three forms are accepted:
//!
//! * an integer, taken as milliseconds since the epoch and widened to a one second window
//! * a relative offset such as `-1d`, `+2h`, `-3months` (`today` and `yesterday` are
//!   shorthands for `-0d` and `-1d`)
//! * a short absolute date such as `01/02/2007`, read in the order the settings' locale uses
//!
//! Relative and absolute dates become a window `[start, end)` one unit long, starting at the
//! beginning of that unit in the user's time zone.

use std::ops::Bound;

use chrono::{Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, TimeZone, Timelike};

use crate::error::{QueryError, LiteralKind};
use crate::operation::RangeBound;
use crate::settings::{SearchSettings, DateLocale};

use super::Comparator;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}


impl DateUnit {
    /// Reads a unit word by its first letter. `m` is month, unless followed by `i` for minute.
    fn from_word(word: &str) -> Option<DateUnit> {
        let mut chars = word.chars();
        let first = chars.next()?;
        let second = chars.next();

        match first {
            'm' if second == Some('i') => Some(DateUnit::Minute),
            'm' => Some(DateUnit::Month),
            'h' => Some(DateUnit::Hour),
            'd' => Some(DateUnit::Day),
            'w' => Some(DateUnit::Week),
            'y' => Some(DateUnit::Year),
            _ => None,
        }
    }

    fn truncate(&self, time: NaiveDateTime) -> Option<NaiveDateTime> {
        let date = time.date();

        match *self {
            DateUnit::Minute => date.and_hms_opt(time.hour(), time.minute(), 0),
            DateUnit::Hour => date.and_hms_opt(time.hour(), 0, 0),
            DateUnit::Day => date.and_hms_opt(0, 0, 0),
            DateUnit::Week => {
                let sunday = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
                sunday.and_hms_opt(0, 0, 0)
            }
            DateUnit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_hms_opt(0, 0, 0),
            DateUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0),
        }
    }

    fn add(&self, time: NaiveDateTime, amount: i32) -> Option<NaiveDateTime> {
        let amount = amount as i64;

        match *self {
            DateUnit::Minute => time.checked_add_signed(Duration::minutes(amount)),
            DateUnit::Hour => time.checked_add_signed(Duration::hours(amount)),
            DateUnit::Day => time.checked_add_signed(Duration::days(amount)),
            DateUnit::Week => time.checked_add_signed(Duration::weeks(amount)),
            DateUnit::Month => add_months(time, amount),
            DateUnit::Year => add_months(time, amount.checked_mul(12)?),
        }
    }
}


fn add_months(time: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);

    if months < 0 {
        time.checked_sub_months(magnitude)
    } else {
        time.checked_add_months(magnitude)
    }
}


/// The half-open window `[start, end)` a date literal names, in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: i64,
    pub end: i64,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLiteral {
    pub comparator: Option<Comparator>,
    pub window: DateWindow,
}


impl DateLiteral {
    /// Parses `text`, using `default_unit` for relative offsets without a unit and as the
    /// length of the window around absolute dates
    pub fn parse(text: &str, default_unit: DateUnit, settings: &SearchSettings) -> Result<DateLiteral, QueryError> {
        let (comparator, rest) = Comparator::split(text.trim());
        if rest.is_empty() {
            return Err(QueryError::invalid(LiteralKind::Date, text, "missing date"));
        }

        let lowered = rest.to_lowercase();
        let value = match &lowered[..] {
            "today" => "-0d",
            "yesterday" => "-1d",
            other => other,
        };

        let window = if value.chars().all(|c| c.is_ascii_digit()) {
            let instant = value.parse::<i64>()
                .map_err(|_| QueryError::invalid(LiteralKind::Date, text, "timestamp is too large"))?;

            DateWindow {
                start: instant,
                end: instant.saturating_add(1000),
            }
        } else if let Some((amount, unit)) = parse_relative(value) {
            relative_window(text, amount, unit.unwrap_or(default_unit), settings)?
        } else {
            let unsigned = value.trim_start_matches(|c| c == '+' || c == '-');
            absolute_window(text, unsigned, default_unit, settings)?
        };

        Ok(DateLiteral {
            comparator: comparator,
            window: window,
        })
    }

    /// The range selected, using `implied` when the literal has no comparator of its own
    pub fn range(&self, implied: Comparator) -> RangeBound {
        let DateWindow { start, end } = self.window;

        match self.comparator.unwrap_or(implied) {
            Comparator::Eq => RangeBound::new(Bound::Included(start), Bound::Excluded(end)),
            Comparator::Lt => RangeBound::new(Bound::Unbounded, Bound::Excluded(start)),
            Comparator::Le => RangeBound::new(Bound::Unbounded, Bound::Excluded(end)),
            Comparator::Gt => RangeBound::new(Bound::Included(end), Bound::Unbounded),
            Comparator::Ge => RangeBound::new(Bound::Included(start), Bound::Unbounded),
        }
    }
}


/// Matches `[+-]digits[unit-word]`
fn parse_relative(value: &str) -> Option<(i32, Option<DateUnit>)> {
    let negative = match value.chars().next()? {
        '-' => true,
        '+' => false,
        _ => return None,
    };

    let rest = &value[1..];
    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let word = &rest[digits_end..];
    let unit = if word.is_empty() {
        None
    } else if word.chars().all(|c| c.is_ascii_lowercase()) {
        Some(DateUnit::from_word(word)?)
    } else {
        return None;
    };

    let amount = rest[..digits_end].parse::<i32>().ok()?;
    Some((if negative { -amount } else { amount }, unit))
}


fn to_epoch_millis(time: NaiveDateTime, time_zone: FixedOffset) -> Option<i64> {
    time_zone.from_local_datetime(&time).single().map(|time| time.timestamp_millis())
}


fn window_from(text: &str, start: NaiveDateTime, unit: DateUnit, time_zone: FixedOffset) -> Result<DateWindow, QueryError> {
    let out_of_range = || QueryError::invalid(LiteralKind::Date, text, "date is out of range");

    let end = unit.add(start, 1).ok_or_else(out_of_range)?;

    Ok(DateWindow {
        start: to_epoch_millis(start, time_zone).ok_or_else(out_of_range)?,
        end: to_epoch_millis(end, time_zone).ok_or_else(out_of_range)?,
    })
}


fn relative_window(text: &str, amount: i32, unit: DateUnit, settings: &SearchSettings) -> Result<DateWindow, QueryError> {
    let out_of_range = || QueryError::invalid(LiteralKind::Date, text, "date is out of range");
    let time_zone = settings.time_zone();

    let now = settings.now().with_timezone(&time_zone).naive_local();
    let pinned = unit.truncate(now).ok_or_else(out_of_range)?;
    let start = unit.add(pinned, amount).ok_or_else(out_of_range)?;

    window_from(text, start, unit, time_zone)
}


fn absolute_window(text: &str, value: &str, unit: DateUnit, settings: &SearchSettings) -> Result<DateWindow, QueryError> {
    let malformed = || QueryError::invalid(LiteralKind::Date, text, "expected a date such as 01/31/2007");

    let separator = value.chars().find(|c| *c == '/' || *c == '.' || *c == '-').ok_or_else(malformed)?;
    let parts = value.split(separator).collect::<Vec<&str>>();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit())) {
        return Err(malformed());
    }

    let (year, month, day) = match settings.date_locale {
        DateLocale::MonthFirst => (parts[2], parts[0], parts[1]),
        DateLocale::DayFirst => (parts[2], parts[1], parts[0]),
        DateLocale::YearFirst => (parts[0], parts[1], parts[2]),
    };

    let time_zone = settings.time_zone();
    let current_year = settings.now().with_timezone(&time_zone).year();

    let mut year = year.parse::<i32>().map_err(|_| malformed())?;
    if parts.iter().any(|part| part.len() > 4) {
        return Err(malformed());
    }
    if year < 100 {
        // Two digit years land within the 80 years before and 20 years after now
        year += current_year - current_year % 100;
        if year > current_year + 20 {
            year -= 100;
        }
    }

    let month = month.parse::<u32>().map_err(|_| malformed())?;
    let day = day.parse::<u32>().map_err(|_| malformed())?;

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| QueryError::invalid(LiteralKind::Date, text, "no such day"))?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(malformed)?;
    let start = unit.truncate(midnight).ok_or_else(malformed)?;

    window_from(text, start, unit, time_zone)
}
