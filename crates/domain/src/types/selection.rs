//! Range selection state and bulk action classification
//!
//! The selection is an explicit tagged union so "end without start" cannot be
//! represented.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::date_range::DateRange;
use crate::impl_domain_enum_conversions;

/// State of the two-click range selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum SelectionState {
    #[default]
    Idle,
    StartSelected {
        #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
        start: NaiveDate,
    },
    RangeSelected {
        #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
        start: NaiveDate,
        #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
        end: NaiveDate,
    },
}

impl SelectionState {
    /// The first clicked date, if any.
    pub fn anchor(&self) -> Option<NaiveDate> {
        match self {
            Self::Idle => None,
            Self::StartSelected { start } | Self::RangeSelected { start, .. } => Some(*start),
        }
    }

    /// The selected range once both ends are known.
    pub fn range(&self) -> Option<DateRange> {
        match self {
            Self::RangeSelected { start, end } => Some(DateRange::between(*start, *end)),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// How many dates of a selected range already have a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum RangeClassification {
    AllAvailable,
    NoneAvailable,
    Mixed,
}

impl_domain_enum_conversions!(RangeClassification {
    AllAvailable => "all_available",
    NoneAvailable => "none_available",
    Mixed => "mixed",
});

impl RangeClassification {
    /// Classify a range from its size and the number of dates with a slot.
    pub fn from_counts(available: usize, total: usize) -> Self {
        if available == 0 {
            Self::NoneAvailable
        } else if available >= total {
            Self::AllAvailable
        } else {
            Self::Mixed
        }
    }

    /// Bulk actions the calendar offers for this classification.
    pub fn offered_actions(self) -> &'static [BulkAction] {
        match self {
            Self::AllAvailable => &[BulkAction::MakeUnavailable],
            Self::NoneAvailable => &[BulkAction::MakeAvailable],
            Self::Mixed => &[BulkAction::MakeAvailable, BulkAction::MakeUnavailable],
        }
    }

    pub fn offers(self, action: BulkAction) -> bool {
        self.offered_actions().contains(&action)
    }
}

/// Bulk action applied to every date of a selected range
///
/// `MakeAvailable` adds only the missing dates; `MakeUnavailable` removes only
/// the present ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum BulkAction {
    MakeAvailable,
    MakeUnavailable,
}

impl_domain_enum_conversions!(BulkAction {
    MakeAvailable => "make_available",
    MakeUnavailable => "make_unavailable",
});

impl BulkAction {
    /// Button caption for the action in the context of a classification.
    pub fn label(self, classification: RangeClassification) -> &'static str {
        match (self, classification) {
            (Self::MakeAvailable, RangeClassification::Mixed) => "Set all available",
            (Self::MakeAvailable, _) => "Add availability for range",
            (Self::MakeUnavailable, RangeClassification::Mixed) => "Remove all",
            (Self::MakeUnavailable, _) => "Remove availability for range",
        }
    }
}
