//! Per-request search settings

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::operation::TextField;


/// Order of the day, month and year in a short absolute date such as `01/02/2007`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateLocale {
    MonthFirst,
    DayFirst,
    YearFirst,
}


impl Default for DateLocale {
    fn default() -> DateLocale {
        DateLocale::MonthFirst
    }
}


#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Offset of the searching user's time zone from UTC. Date windows start at local midnight.
    pub time_zone_offset_minutes: i32,
    pub date_locale: DateLocale,

    /// Pins the clock relative dates are computed from. Uses the wall clock when unset.
    pub now: Option<DateTime<Utc>>,
    pub mountpoint_depth_limit: usize,
    pub default_text_field: TextField,
}


impl Default for SearchSettings {
    fn default() -> SearchSettings {
        SearchSettings {
            time_zone_offset_minutes: 0,
            date_locale: DateLocale::MonthFirst,
            now: None,
            mountpoint_depth_limit: 16,
            default_text_field: TextField::Content,
        }
    }
}


impl SearchSettings {
    pub fn from_json_str(json: &str) -> Result<SearchSettings, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self.now {
            Some(now) => now,
            None => Utc::now(),
        }
    }

    /// The user's time zone, falling back to UTC for offsets chrono cannot represent
    pub fn time_zone(&self) -> FixedOffset {
        self.time_zone_offset_minutes.checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}


#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::operation::TextField;

    use super::{SearchSettings, DateLocale};

    #[test]
    fn test_defaults() {
        let settings = SearchSettings::default();

        assert_eq!(settings.mountpoint_depth_limit, 16);
        assert_eq!(settings.date_locale, DateLocale::MonthFirst);
        assert_eq!(settings.default_text_field, TextField::Content);
    }

    #[test]
    fn test_from_json_str() {
        let settings = SearchSettings::from_json_str("
        {
            \"time_zone_offset_minutes\": -300,
            \"date_locale\": \"day_first\",
            \"now\": \"2024-03-15T10:30:00Z\"
        }
        ").unwrap();

        assert_eq!(settings.time_zone_offset_minutes, -300);
        assert_eq!(settings.date_locale, DateLocale::DayFirst);
        assert_eq!(settings.now(), Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap());
        assert_eq!(settings.mountpoint_depth_limit, 16);
    }

    #[test]
    fn test_time_zone() {
        let settings = SearchSettings {
            time_zone_offset_minutes: 90,
            ..SearchSettings::default()
        };

        assert_eq!(settings.time_zone().local_minus_utc(), 5400);
    }

    #[test]
    fn test_out_of_range_time_zone_is_utc() {
        for &minutes in [i32::MAX, i32::MIN, 24 * 60].iter() {
            let settings = SearchSettings {
                time_zone_offset_minutes: minutes,
                ..SearchSettings::default()
            };

            assert_eq!(settings.time_zone().local_minus_utc(), 0, "{}", minutes);
        }
    }
}
