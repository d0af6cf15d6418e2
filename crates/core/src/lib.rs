//! # Artistcal Core
//!
//! Pure business logic for the artist availability calendar - no
//! infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the backend and the local clock
//! - [`ResourceLinker`]: resolves and heals the principal's resource link
//! - [`SlotStore`]: optimistic client-side slot cache with rollback
//! - [`HorizonMaintainer`]: keeps a slot at `today + horizon` once per day
//! - [`RangeSelection`] and [`AvailabilityCalendar`]: two-click selection and
//!   bulk actions
//!
//! ## Architecture Principles
//! - Only depends on `artistcal-domain`
//! - No HTTP or timer code; all external effects go through traits
//! - Pure, testable business logic

pub mod availability;
pub mod selection;

pub use availability::horizon::{HorizonMaintainer, HorizonOutcome};
pub use availability::linker::{HealBudget, ResourceLinker};
pub use availability::ports::{AvailabilityBackend, LocalClock, SystemClock};
pub use availability::slot_store::{SlotEvent, SlotStore};
pub use selection::machine::{classify_range, ClickOutcome, RangeSelection};
pub use selection::service::{
    AvailabilityCalendar, BatchReport, ClickResult, DateFailure, DayAvailability, DayState,
    OfferedAction, RangeOffer,
};
