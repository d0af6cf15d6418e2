//! Pure range selection state machine
//!
//! | state          | click on        | next state        | outcome         |
//! |----------------|-----------------|-------------------|-----------------|
//! | any            | past date       | unchanged         | `Ignored`       |
//! | Idle           | d               | StartSelected(d)  | `Anchored`      |
//! | StartSelected  | d < start       | StartSelected(d)  | `Anchored`      |
//! | StartSelected  | d == start      | Idle              | `Toggle`        |
//! | StartSelected  | d > start       | RangeSelected     | `RangeSelected` |
//! | RangeSelected  | d               | StartSelected(d)  | `Anchored`      |

use artistcal_domain::{DateRange, RangeClassification, SelectionState};
use chrono::NaiveDate;

/// What a click asks the caller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Anchored(NaiveDate),
    /// Same date clicked twice: toggle that single day
    Toggle(NaiveDate),
    RangeSelected(DateRange),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeSelection {
    state: SelectionState,
}

impl RangeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Apply a click on `date`; dates before `today` are ignored.
    pub fn click(&mut self, date: NaiveDate, today: NaiveDate) -> ClickOutcome {
        if date < today {
            return ClickOutcome::Ignored;
        }

        match self.state {
            SelectionState::StartSelected { start } if date == start => {
                self.state = SelectionState::Idle;
                ClickOutcome::Toggle(date)
            }
            SelectionState::StartSelected { start } if date > start => {
                self.state = SelectionState::RangeSelected { start, end: date };
                ClickOutcome::RangeSelected(DateRange::between(start, date))
            }
            _ => {
                self.state = SelectionState::StartSelected { start: date };
                ClickOutcome::Anchored(date)
            }
        }
    }

    /// Back to `Idle`, discarding any anchor or range.
    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
    }

    pub fn is_anchor(&self, date: NaiveDate) -> bool {
        self.state.anchor() == Some(date)
    }

    pub fn in_range(&self, date: NaiveDate) -> bool {
        self.state.range().is_some_and(|r| r.contains(date))
    }
}

/// Classify a range by how many of its dates are available.
pub fn classify_range(
    range: DateRange,
    is_available: impl Fn(NaiveDate) -> bool,
) -> RangeClassification {
    let available = range.days().filter(|d| is_available(*d)).count();
    RangeClassification::from_counts(available, range.len_days())
}
