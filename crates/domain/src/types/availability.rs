//! Availability slot types
//!
//! A slot marks one calendar date as available for one resource (an artist).
//! Slots are never edited: they are created or deleted.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// Backend identifier of an availability slot
///
/// Negative values are local placeholders synthesized during the optimistic
/// window before the backend confirms a create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct SlotId(#[cfg_attr(feature = "ts-gen", ts(type = "number"))] pub i64);

impl SlotId {
    /// True for locally-synthesized ids that the backend has not confirmed.
    pub fn is_placeholder(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend identifier of the resource (artist) that owns the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ResourceId(#[cfg_attr(feature = "ts-gen", ts(type = "number"))] pub i64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One calendar date marked available for a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct AvailabilitySlot {
    pub id: SlotId,
    /// Local calendar date, `YYYY-MM-DD` on the wire
    #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
    pub date: NaiveDate,
    pub resource_id: ResourceId,
}

impl AvailabilitySlot {
    pub fn new(id: SlotId, date: NaiveDate, resource_id: ResourceId) -> Self {
        Self { id, date, resource_id }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_placeholder()
    }
}

/// Date whose slot signals "availability extends at least this far".
///
/// Saturates at `NaiveDate::MAX` instead of overflowing.
pub fn horizon_marker(today: NaiveDate, horizon_days: u32) -> NaiveDate {
    today.checked_add_days(Days::new(u64::from(horizon_days))).unwrap_or(NaiveDate::MAX)
}
