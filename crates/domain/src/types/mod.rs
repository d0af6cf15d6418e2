//! Domain types and models
//!
//! - [`availability`]: slots, identifiers, and the horizon marker
//! - [`date_range`]: inclusive calendar date ranges
//! - [`selection`]: range selection state and bulk action classification

pub mod availability;
pub mod date_range;
pub mod selection;

pub use availability::{horizon_marker, AvailabilitySlot, ResourceId, SlotId};
pub use date_range::DateRange;
pub use selection::{BulkAction, RangeClassification, SelectionState};
