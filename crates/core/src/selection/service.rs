//! Calendar orchestration: day clicks, range offers, and bulk actions
//!
//! `AvailabilityCalendar` drives the [`RangeSelection`] machine and turns its
//! outcomes into [`SlotStore`] calls. Bulk actions run sequentially, one date
//! at a time, behind a busy flag. A click or cancel during a batch supersedes
//! it: the batch stops issuing calls and leaves the newer selection alone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use artistcal_domain::{
    AvailabilitySlot, BulkAction, CalendarError, DateRange, RangeClassification, ResourceId,
    Result, SelectionState,
};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::machine::{classify_range, ClickOutcome, RangeSelection};
use crate::availability::ports::LocalClock;
use crate::availability::slot_store::SlotStore;

/// How a single day renders in the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayAvailability {
    /// Before today; not clickable
    Past,
    Available,
    /// A change for this date is awaiting the backend
    Pending,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayState {
    pub date: NaiveDate,
    pub availability: DayAvailability,
    pub anchor: bool,
    pub in_range: bool,
}

/// One button of a range offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OfferedAction {
    pub action: BulkAction,
    pub label: &'static str,
}

/// Bulk actions offered for a selected range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeOffer {
    pub range: DateRange,
    pub classification: RangeClassification,
    pub actions: Vec<OfferedAction>,
}

impl RangeOffer {
    fn new(range: DateRange, classification: RangeClassification) -> Self {
        let actions = classification
            .offered_actions()
            .iter()
            .map(|&action| OfferedAction { action, label: action.label(classification) })
            .collect();
        Self { range, classification, actions }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickResult {
    /// Click on a past date
    Ignored,
    Anchored(NaiveDate),
    /// Single-day toggle finished; `slot` is the new slot or `None` after a removal
    Toggled { date: NaiveDate, slot: Option<AvailabilitySlot> },
    RangeOffered(RangeOffer),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFailure {
    pub date: NaiveDate,
    pub error: CalendarError,
}

/// Outcome of one bulk action pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub action: BulkAction,
    pub range: DateRange,
    pub applied: Vec<NaiveDate>,
    pub failed: Vec<DateFailure>,
    /// A newer selection superseded the batch before it covered every date
    pub superseded: bool,
}

impl BatchReport {
    fn new(action: BulkAction, range: DateRange) -> Self {
        Self { action, range, applied: Vec::new(), failed: Vec::new(), superseded: false }
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && !self.superseded
    }
}

#[derive(Debug, Default)]
struct SelectionSlot {
    machine: RangeSelection,
    generation: u64,
}

/// Clears the busy flag on drop
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| CalendarError::Busy("a range action is already running".to_string()))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct AvailabilityCalendar {
    store: Arc<SlotStore>,
    clock: Arc<dyn LocalClock>,
    selection: Mutex<SelectionSlot>,
    busy: AtomicBool,
}

impl AvailabilityCalendar {
    pub fn new(store: Arc<SlotStore>, clock: Arc<dyn LocalClock>) -> Self {
        Self {
            store,
            clock,
            selection: Mutex::new(SelectionSlot::default()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<SlotStore> {
        &self.store
    }

    /// False while the resource link is unresolved; mutating affordances
    /// should be disabled.
    pub fn is_enabled(&self) -> bool {
        self.store.linker().is_linked()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.lock().machine.state()
    }

    pub fn day_state(&self, date: NaiveDate) -> DayState {
        let today = self.clock.today();
        let (anchor, in_range) = {
            let slot = self.selection.lock();
            (slot.machine.is_anchor(date), slot.machine.in_range(date))
        };

        let availability = if date < today {
            DayAvailability::Past
        } else if self.store.is_pending(date) {
            DayAvailability::Pending
        } else if self.store.contains(date) {
            DayAvailability::Available
        } else {
            DayAvailability::Unavailable
        };

        DayState { date, availability, anchor, in_range }
    }

    /// Day states for every date of `range`, ascending.
    pub fn days(&self, range: DateRange) -> Vec<DayState> {
        range.days().map(|d| self.day_state(d)).collect()
    }

    /// Load the slot cache from the backend.
    pub async fn refresh(&self) -> Result<Vec<AvailabilitySlot>> {
        self.store.list().await
    }

    /// Handle a click on a calendar day.
    ///
    /// # Errors
    /// Only a same-day toggle touches the backend; its error is returned after
    /// the store rolled the day back.
    #[instrument(skip(self))]
    pub async fn click_day(&self, date: NaiveDate) -> Result<ClickResult> {
        let today = self.clock.today();
        let outcome = {
            let mut slot = self.selection.lock();
            let outcome = slot.machine.click(date, today);
            if outcome != ClickOutcome::Ignored {
                slot.generation += 1;
            }
            outcome
        };

        match outcome {
            ClickOutcome::Ignored => Ok(ClickResult::Ignored),
            ClickOutcome::Anchored(date) => Ok(ClickResult::Anchored(date)),
            ClickOutcome::Toggle(date) => {
                let slot = self.toggle_day(date).await?;
                Ok(ClickResult::Toggled { date, slot })
            }
            ClickOutcome::RangeSelected(range) => {
                Ok(ClickResult::RangeOffered(self.offer_for(range)))
            }
        }
    }

    /// Discard any anchor or range selection.
    pub fn cancel_selection(&self) {
        let mut slot = self.selection.lock();
        slot.machine.cancel();
        slot.generation += 1;
    }

    /// The offer for the current range selection, classified against the
    /// cache as it is now.
    pub fn pending_offer(&self) -> Option<RangeOffer> {
        let range = self.selection.lock().machine.state().range()?;
        Some(self.offer_for(range))
    }

    /// Add the date if it has no slot, remove it otherwise.
    ///
    /// Returns the new slot, or `None` if the date was made unavailable.
    #[instrument(skip(self))]
    pub async fn toggle_day(&self, date: NaiveDate) -> Result<Option<AvailabilitySlot>> {
        self.require_enabled().await?;

        match self.store.get(date) {
            Some(existing) => {
                self.store.remove(&existing).await?;
                Ok(None)
            }
            None => self.store.add(date).await.map(Some),
        }
    }

    /// Apply a bulk action to the selected range.
    ///
    /// Failures on individual dates are collected in the report; the pass
    /// continues over the remaining dates. The selection returns to `Idle`
    /// when the pass completes unless a newer selection superseded it.
    ///
    /// # Errors
    /// `Busy` while another batch runs, `InvalidInput` without a range
    /// selection or for an action the range does not offer, `Unavailable`
    /// without a resource link.
    #[instrument(skip(self))]
    pub async fn apply_range_action(&self, action: BulkAction) -> Result<BatchReport> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (range, generation) = {
            let slot = self.selection.lock();
            let range = slot.machine.state().range().ok_or_else(|| {
                CalendarError::InvalidInput("no date range is selected".to_string())
            })?;
            (range, slot.generation)
        };

        let classification = self.classify(range);
        if !classification.offers(action) {
            return Err(CalendarError::InvalidInput(format!(
                "{action} is not offered when the range is {classification}"
            )));
        }

        self.require_enabled().await?;

        let mut report = BatchReport::new(action, range);
        for date in range.days() {
            if self.selection.lock().generation != generation {
                report.superseded = true;
                info!(%date, "range action superseded by a newer selection");
                break;
            }

            let result = match action {
                BulkAction::MakeAvailable if self.store.contains(date) => continue,
                BulkAction::MakeAvailable => self.store.add(date).await.map(|_| ()),
                BulkAction::MakeUnavailable => match self.store.get(date) {
                    Some(existing) => self.store.remove(&existing).await,
                    None => continue,
                },
            };

            match result {
                Ok(()) => report.applied.push(date),
                Err(error) => {
                    warn!(%date, error = %error, "range action failed for date");
                    report.failed.push(DateFailure { date, error });
                }
            }
        }

        if !report.superseded {
            let mut slot = self.selection.lock();
            if slot.generation == generation {
                slot.machine.cancel();
                slot.generation += 1;
            }
        }

        info!(
            applied = report.applied.len(),
            failed = report.failed.len(),
            superseded = report.superseded,
            "range action finished"
        );
        Ok(report)
    }

    fn classify(&self, range: DateRange) -> RangeClassification {
        classify_range(range, |d| self.store.contains(d))
    }

    fn offer_for(&self, range: DateRange) -> RangeOffer {
        RangeOffer::new(range, self.classify(range))
    }

    async fn require_enabled(&self) -> Result<ResourceId> {
        self.store.linker().resolve().await.ok_or_else(|| {
            CalendarError::Unavailable("availability calendar is not linked".to_string())
        })
    }
}
