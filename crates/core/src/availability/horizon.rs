//! Sliding availability horizon
//!
//! Keeps a slot on `today + horizon_days` so the published availability always
//! reaches a fixed distance into the future. A check runs at start-up and at
//! every local midnight; the last handled marker date guards against repeated
//! creates for the same day.

use std::sync::Arc;

use artistcal_domain::{horizon_marker, AvailabilitySlot, CalendarError};
use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use super::ports::LocalClock;
use super::slot_store::SlotStore;

/// Result of a single horizon check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HorizonOutcome {
    /// No resource link; nothing attempted
    Unavailable,
    /// The marker date already has a slot
    AlreadyPresent(NaiveDate),
    /// The marker date was already handled by an earlier check
    AlreadyHandled(NaiveDate),
    /// A slot was created on the marker date
    Extended(AvailabilitySlot),
    /// Loading or creating failed; the next check retries
    Failed { marker: NaiveDate, error: CalendarError },
}

/// Maintains the horizon marker slot
pub struct HorizonMaintainer {
    store: Arc<SlotStore>,
    clock: Arc<dyn LocalClock>,
    horizon_days: u32,
    last_marker: Mutex<Option<NaiveDate>>,
}

impl HorizonMaintainer {
    pub fn new(store: Arc<SlotStore>, clock: Arc<dyn LocalClock>, horizon_days: u32) -> Self {
        Self { store, clock, horizon_days, last_marker: Mutex::new(None) }
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// The marker date for the clock's current day.
    pub fn current_marker(&self) -> NaiveDate {
        horizon_marker(self.clock.today(), self.horizon_days)
    }

    /// The marker date most recently handled, if any.
    pub fn last_marker(&self) -> Option<NaiveDate> {
        *self.last_marker.lock()
    }

    /// Ensure the marker date for today has a slot.
    ///
    /// Never creates more than one slot per marker date, also when checks
    /// overlap. A failed create clears the guard so a later check retries.
    #[instrument(skip(self))]
    pub async fn check(&self) -> HorizonOutcome {
        let marker = self.current_marker();

        if self.store.linker().resolve().await.is_none() {
            debug!(%marker, "no resource link, skipping horizon check");
            return HorizonOutcome::Unavailable;
        }

        if !self.store.is_loaded() {
            if let Err(error) = self.store.list().await {
                warn!(%marker, error = %error, "could not load availability for horizon check");
                return HorizonOutcome::Failed { marker, error };
            }
        }

        if self.store.contains(marker) {
            *self.last_marker.lock() = Some(marker);
            debug!(%marker, "horizon marker already available");
            return HorizonOutcome::AlreadyPresent(marker);
        }

        {
            let mut last = self.last_marker.lock();
            if *last == Some(marker) {
                debug!(%marker, "horizon marker already handled");
                return HorizonOutcome::AlreadyHandled(marker);
            }
            *last = Some(marker);
        }

        match self.store.add(marker).await {
            Ok(slot) => {
                info!(%marker, slot_id = %slot.id, "availability horizon extended");
                HorizonOutcome::Extended(slot)
            }
            Err(error) => {
                let mut last = self.last_marker.lock();
                if *last == Some(marker) {
                    *last = None;
                }
                warn!(%marker, error = %error, "failed to extend availability horizon");
                HorizonOutcome::Failed { marker, error }
            }
        }
    }
}
