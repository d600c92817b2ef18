//! Day-granularity calendar dates used to select free replay ranges.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};

/// Earliest year accepted for a replay range.
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted for a replay range.
pub const MAX_YEAR: i32 = 2100;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a date or date range is rejected before any fetch happens.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DateRangeError {
    /// The text is not an existing `YYYY-MM-DD` date.
    #[error("'{text}' is not a YYYY-MM-DD date: {source}")]
    Malformed {
        /// Rejected input.
        text: String,
        /// Parser diagnostic.
        source: chrono::ParseError,
    },
    /// The month or day component does not exist in the calendar.
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate {
        /// Year component.
        year: i32,
        /// Month component.
        month: u32,
        /// Day component.
        day: u32,
    },
    /// The year lies outside the supported window.
    #[error("year {0} is outside {MIN_YEAR}..={MAX_YEAR}")]
    YearOutOfBounds(i32),
    /// The range ends before it starts.
    #[error("range ends ({end}) before it starts ({start})")]
    EndBeforeStart {
        /// First day of the rejected range.
        start: CalendarDate,
        /// Last day of the rejected range.
        end: CalendarDate,
    },
}

/// Calendar date within `MIN_YEAR..=MAX_YEAR`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Creates a validated calendar date.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateRangeError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(DateRangeError::InvalidDate { year, month, day })?;
        Self::within_bounds(date)
    }

    fn within_bounds(date: NaiveDate) -> Result<Self, DateRangeError> {
        if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            Ok(Self(date))
        } else {
            Err(DateRangeError::YearOutOfBounds(date.year()))
        }
    }

    /// Day after this one, which may fall outside the supported years.
    ///
    /// Used as the exclusive upper bound of remote range queries.
    #[must_use]
    pub fn next_day(&self) -> Option<NaiveDate> {
        self.0.succ_opt()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = DateRangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| {
            DateRangeError::Malformed {
                text: value.to_owned(),
                source,
            }
        })?;
        Self::within_bounds(date)
    }
}

/// Inclusive range of calendar days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: CalendarDate,
    end: CalendarDate,
}

impl DateRange {
    /// Creates a range, rejecting ranges that end before they start.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Number of whole days covered, both ends included.
    #[must_use]
    pub fn days(&self) -> i64 {
        self.end.0.signed_duration_since(self.start.0).num_days() + 1
    }

    /// Length of the range in milliseconds.
    #[must_use]
    pub fn span_millis(&self) -> i64 {
        chrono::Duration::days(self.days()).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(value: &str) -> CalendarDate {
        value.parse().expect("valid date")
    }

    #[test]
    fn parses_and_displays_iso_days() {
        let parsed = date(" 2011-03-11 ");
        assert_eq!(parsed, CalendarDate::new(2011, 3, 11).expect("date"));
        assert_eq!(parsed.to_string(), "2011-03-11");
    }

    #[test]
    fn next_day_rolls_over_leap_february() {
        let next = |value: &str| date(value).next_day().map(|day| day.to_string());
        assert_eq!(next("2024-02-28").as_deref(), Some("2024-02-29"));
        assert_eq!(next("2024-02-29").as_deref(), Some("2024-03-01"));
        assert_eq!(next("2023-12-31").as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn day_after_last_supported_date_is_not_a_calendar_date() {
        let last = CalendarDate::new(MAX_YEAR, 12, 31).expect("last supported day");
        let following = last.next_day().expect("chrono covers 2101");
        assert_eq!(following.to_string(), "2101-01-01");
        assert_eq!(
            CalendarDate::new(following.year(), following.month(), following.day()),
            Err(DateRangeError::YearOutOfBounds(2101))
        );
        assert_eq!(
            "2101-01-01".parse::<CalendarDate>(),
            Err(DateRangeError::YearOutOfBounds(2101))
        );
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(
            CalendarDate::new(2023, 2, 29),
            Err(DateRangeError::InvalidDate {
                year: 2023,
                month: 2,
                day: 29
            })
        );
        assert!(matches!(
            "2023-02-29".parse::<CalendarDate>(),
            Err(DateRangeError::Malformed { .. })
        ));
        assert!(matches!(
            "yesterday".parse::<CalendarDate>(),
            Err(DateRangeError::Malformed { .. })
        ));
        assert_eq!(
            "1850-01-01".parse::<CalendarDate>(),
            Err(DateRangeError::YearOutOfBounds(1850))
        );
    }

    #[test]
    fn range_rejects_reversed_bounds() {
        let result = DateRange::new(date("2024-05-02"), date("2024-05-01"));
        assert!(matches!(result, Err(DateRangeError::EndBeforeStart { .. })));
    }

    #[test]
    fn single_day_range_spans_one_day() {
        let range = DateRange::new(date("2024-05-01"), date("2024-05-01")).expect("valid range");
        assert_eq!(range.days(), 1);
        assert_eq!(range.span_millis(), 86_400_000);
    }

    #[test]
    fn range_across_leap_day_counts_every_day() {
        let range = DateRange::new(date("2024-02-01"), date("2024-03-01")).expect("valid range");
        assert_eq!(range.days(), 30);
    }
}
