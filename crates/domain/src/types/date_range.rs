//! Inclusive calendar date range
//!
//! All range operations iterate dates in ascending order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::errors::{CalendarError, Result};

/// Inclusive range `start..=end` with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct DateRange {
    #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
    start: NaiveDate,
    #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
    end: NaiveDate,
}

impl DateRange {
    /// Build a range from explicit bounds.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidInput` if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(CalendarError::InvalidInput(format!(
                "range end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a range from two dates in either order.
    pub fn between(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Single-day range.
    pub fn day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the range (always at least 1).
    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days()).map_or(usize::MAX, |d| d + 1)
    }

    /// Dates of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}
