use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use crate::enrich::EnrichedSession;

/// Inclusive bounds on session start time. `None` is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub lower: Option<DateTime<Utc>>,
    pub upper: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(lower: Option<DateTime<Utc>>, upper: Option<DateTime<Utc>>) -> Self {
        Self { lower, upper }
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.lower.is_none_or(|lower| lower <= instant) && self.upper.is_none_or(|upper| instant <= upper)
    }

    /// Builds a range from two calendar-date inputs. The upper date covers its
    /// whole day.
    pub fn from_dates(lower: &str, upper: &str) -> Result<Self, RangeError> {
        Ok(Self {
            lower: parse_date_bound(lower, Bound::Lower)?,
            upper: parse_date_bound(upper, Bound::Upper)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Parses a `YYYY-MM-DD` date input. An empty input is an open bound.
pub fn parse_date_bound(input: &str, bound: Bound) -> Result<Option<DateTime<Utc>>, RangeError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| RangeError::InvalidDate(input.to_string()))?;

    let time = match bound {
        Bound::Lower => NaiveTime::MIN,
        Bound::Upper => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN),
    };

    Ok(Some(date.and_time(time).and_utc()))
}

/// Rows whose start time lies within `range`, in their original order.
pub fn filter_by_range<'a>(rows: &'a [EnrichedSession], range: &DateRange) -> Cow<'a, [EnrichedSession]> {
    if range.is_unbounded() {
        return Cow::Borrowed(rows);
    }

    Cow::Owned(rows.iter().filter(|row| range.contains(row.start_time())).cloned().collect())
}
