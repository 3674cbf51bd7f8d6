//! Timestamp parsing and calendar-month bucketing.
//!
//! Parsing never touches the frame: it reads the date columns and returns
//! derived vectors. Cells that cannot be parsed become `None` and are
//! excluded from date-dependent aggregates.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::column_as_strings;

const SECONDS_PER_DAY: i64 = 86_400;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Parse one cell as a timestamp. Date-only values are taken at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parse a whole column, one entry per row.
pub fn parse_timestamp_column(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    Ok(column_as_strings(df, column)?
        .into_iter()
        .map(|cell| cell.as_deref().and_then(parse_timestamp))
        .collect())
}

/// Whole days between two timestamps, floored.
///
/// Negative when discharge precedes admission; the value is not clamped.
pub fn stay_days(admission: NaiveDateTime, discharge: NaiveDateTime) -> i64 {
    (discharge - admission)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Month containing `ts`.
    pub fn of(ts: &NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// Midnight on the first day of the month.
    pub fn start(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(NaiveDateTime::MIN)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        let parsed = ts("2023-01-05");
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_datetime_variants() {
        assert_eq!(ts("2023-01-05 10:30:00"), ts("2023-01-05T10:30:00"));
        assert_eq!(ts("2023-01-05 10:30:00.000").date(), ts("2023-01-05").date());
        assert_eq!(ts("2023-01-05T10:30:00Z"), ts("2023-01-05 10:30:00"));
    }

    #[test]
    fn test_parse_other_date_layouts() {
        assert_eq!(ts("2023/01/05"), ts("2023-01-05"));
        assert_eq!(ts("01/05/2023"), ts("2023-01-05"));
        assert_eq!(ts("05-01-2023"), ts("2023-01-05"));
    }

    #[test]
    fn test_unparsable() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2023-13-45"), None);
    }

    #[test]
    fn test_stay_days() {
        assert_eq!(stay_days(ts("2023-01-01"), ts("2023-01-05")), 4);
        assert_eq!(stay_days(ts("2023-01-05"), ts("2023-01-01")), -4);
        assert_eq!(stay_days(ts("2023-01-01 08:00:00"), ts("2023-01-02 07:00:00")), 0);
        assert_eq!(stay_days(ts("2023-01-02 07:00:00"), ts("2023-01-01 08:00:00")), -1);
    }

    #[test]
    fn test_year_month() {
        let month = YearMonth::of(&ts("2023-02-10 13:00:00"));
        assert_eq!(month.to_string(), "2023-02");
        assert_eq!(month.start(), ts("2023-02-01"));
        assert!(YearMonth { year: 2022, month: 12 } < month);
    }

    #[test]
    fn test_parse_column() {
        let df = df!("adm" => &[Some("2023-01-01"), Some("garbage"), None]).unwrap();
        let parsed = parse_timestamp_column(&df, "adm").unwrap();
        assert!(parsed[0].is_some());
        assert!(parsed[1].is_none());
        assert!(parsed[2].is_none());
    }
}
