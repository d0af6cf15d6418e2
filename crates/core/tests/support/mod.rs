//! Shared test helpers for `artistcal-core` integration tests.
//!
//! An in-memory backend with failure injection and call counters, and a clock
//! the tests move by hand.

#![allow(dead_code)]

pub mod backend;
pub mod clock;

use std::sync::Arc;

use artistcal_core::{AvailabilityCalendar, HorizonMaintainer, ResourceLinker, SlotStore};
use chrono::NaiveDate;

pub use backend::{CallCounts, ListGate, MockBackend};
pub use clock::FixedClock;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Fully wired core components over one mock backend and clock.
pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub clock: Arc<FixedClock>,
    pub linker: Arc<ResourceLinker>,
    pub store: Arc<SlotStore>,
    pub calendar: Arc<AvailabilityCalendar>,
    pub maintainer: HorizonMaintainer,
}

impl Harness {
    pub fn new(backend: MockBackend, today: &str) -> Self {
        Self::with_horizon(backend, today, 365)
    }

    pub fn with_horizon(backend: MockBackend, today: &str, horizon_days: u32) -> Self {
        let backend = Arc::new(backend);
        let clock = Arc::new(FixedClock::on(date(today)));
        let linker = Arc::new(ResourceLinker::new(backend.clone()));
        let store = Arc::new(SlotStore::new(backend.clone(), linker.clone()));
        let calendar = Arc::new(AvailabilityCalendar::new(store.clone(), clock.clone()));
        let maintainer = HorizonMaintainer::new(store.clone(), clock.clone(), horizon_days);

        Self { backend, clock, linker, store, calendar, maintainer }
    }

    /// Dates currently in the slot cache, ascending.
    pub fn cached_dates(&self) -> Vec<NaiveDate> {
        self.store.snapshot().into_iter().map(|s| s.date).collect()
    }
}
