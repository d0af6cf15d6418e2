//! Optimistic client-side cache of availability slots
//!
//! The cache holds at most one slot per date for the linked resource. Adds
//! insert a negative-id placeholder immediately and swap it for the confirmed
//! slot once the backend answers; removes drop the slot immediately and put it
//! back if the backend refuses. A date with a mutation in flight rejects a
//! second mutation with `CalendarError::Pending`.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use artistcal_domain::constants::{FIRST_PLACEHOLDER_ID, SLOT_EVENT_CHANNEL_CAPACITY};
use artistcal_domain::{AvailabilitySlot, CalendarError, ResourceId, Result, SlotId};
use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use super::linker::{HealBudget, ResourceLinker};
use super::ports::AvailabilityBackend;

/// Change notification for views observing the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEvent {
    /// Placeholder inserted ahead of a create call
    Optimistic(AvailabilitySlot),
    /// Create confirmed; the placeholder was replaced by this slot
    Confirmed(AvailabilitySlot),
    /// Create failed; the placeholder for this date was dropped
    RolledBack { date: NaiveDate },
    /// Slot dropped ahead of a delete call
    Removed(AvailabilitySlot),
    /// Delete failed; the slot is back in the cache
    Restored(AvailabilitySlot),
    /// Cache replaced from a backend listing
    Reloaded { count: usize },
}

#[derive(Debug, Default)]
struct SlotCache {
    slots: BTreeMap<NaiveDate, AvailabilitySlot>,
    in_flight: HashSet<NaiveDate>,
    loaded: bool,
    /// Bumped whenever a mutation starts or settles
    epoch: u64,
    /// Epoch of the latest start or settle per date
    touched: BTreeMap<NaiveDate, u64>,
}

impl SlotCache {
    fn touch(&mut self, date: NaiveDate) {
        self.epoch += 1;
        self.touched.insert(date, self.epoch);
    }

    /// Whether `date` changed locally after `epoch`, or is changing now.
    fn changed_since(&self, date: NaiveDate, epoch: u64) -> bool {
        self.in_flight.contains(&date) || self.touched.get(&date).is_some_and(|e| *e > epoch)
    }
}

/// Slot cache backed by an [`AvailabilityBackend`]
pub struct SlotStore {
    backend: Arc<dyn AvailabilityBackend>,
    linker: Arc<ResourceLinker>,
    cache: Mutex<SlotCache>,
    next_placeholder: AtomicI64,
    events: broadcast::Sender<SlotEvent>,
}

impl SlotStore {
    pub fn new(backend: Arc<dyn AvailabilityBackend>, linker: Arc<ResourceLinker>) -> Self {
        let (events, _) = broadcast::channel(SLOT_EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            linker,
            cache: Mutex::new(SlotCache::default()),
            next_placeholder: AtomicI64::new(FIRST_PLACEHOLDER_ID),
            events,
        }
    }

    pub fn linker(&self) -> &Arc<ResourceLinker> {
        &self.linker
    }

    /// Subscribe to cache change events.
    pub fn subscribe(&self) -> broadcast::Receiver<SlotEvent> {
        self.events.subscribe()
    }

    /// Cached slots in ascending date order.
    pub fn snapshot(&self) -> Vec<AvailabilitySlot> {
        self.cache.lock().slots.values().cloned().collect()
    }

    pub fn get(&self, date: NaiveDate) -> Option<AvailabilitySlot> {
        self.cache.lock().slots.get(&date).cloned()
    }

    /// Whether the date is marked available, placeholders included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.cache.lock().slots.contains_key(&date)
    }

    /// Whether an add or remove for the date is awaiting the backend.
    pub fn is_pending(&self, date: NaiveDate) -> bool {
        self.cache.lock().in_flight.contains(&date)
    }

    /// Whether the cache has been populated from the backend at least once.
    pub fn is_loaded(&self) -> bool {
        self.cache.lock().loaded
    }

    pub fn len(&self) -> usize {
        self.cache.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch all slots of the linked resource and replace the cache.
    ///
    /// Dates mutated locally after the listing was requested keep their
    /// local entry, so a stale listing cannot undo a confirmed add or remove
    /// nor resurrect or drop an entry mid-flight.
    ///
    /// # Errors
    /// `CalendarError::Unavailable` if the link cannot be resolved or healed;
    /// any other backend error as returned.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<AvailabilitySlot>> {
        let mut budget = HealBudget::single();
        let resource = self.require_link(&mut budget).await?;
        let requested_at = self.cache.lock().epoch;

        let (resource, fetched) = self
            .call_with_heal(resource, &mut budget, |r| self.backend.list_slots(r))
            .await?;

        let count = self.replace(resource, fetched, requested_at);
        info!(resource_id = %resource, count, "availability loaded");
        self.emit(SlotEvent::Reloaded { count });
        Ok(self.snapshot())
    }

    /// Mark `date` available.
    ///
    /// Returns the existing entry without a network call if the date already
    /// has one, placeholder included.
    ///
    /// # Errors
    /// `CalendarError::Pending` while a remove for the date is in flight,
    /// `CalendarError::Unavailable` if the link cannot be healed, or the
    /// backend error after the placeholder has been rolled back.
    #[instrument(skip(self))]
    pub async fn add(&self, date: NaiveDate) -> Result<AvailabilitySlot> {
        let mut budget = HealBudget::single();
        let resource = self.require_link(&mut budget).await?;

        let placeholder = {
            let mut cache = self.cache.lock();
            if let Some(existing) = cache.slots.get(&date) {
                debug!(slot_id = %existing.id, "date already available");
                return Ok(existing.clone());
            }
            if cache.in_flight.contains(&date) {
                return Err(CalendarError::Pending(format!("a change for {date} is in flight")));
            }
            let placeholder = AvailabilitySlot::new(self.next_placeholder_id(), date, resource);
            cache.slots.insert(date, placeholder.clone());
            cache.in_flight.insert(date);
            cache.touch(date);
            placeholder
        };
        self.emit(SlotEvent::Optimistic(placeholder.clone()));

        let result = self
            .call_with_heal(resource, &mut budget, |r| self.backend.create_slot(r, date))
            .await;

        let mut cache = self.cache.lock();
        cache.in_flight.remove(&date);
        cache.touch(date);
        match result {
            Ok((_, confirmed)) => {
                cache.slots.insert(date, confirmed.clone());
                drop(cache);
                info!(slot_id = %confirmed.id, "availability added");
                self.emit(SlotEvent::Confirmed(confirmed.clone()));
                Ok(confirmed)
            }
            Err(err) => {
                if cache.slots.get(&date).is_some_and(|s| s.id == placeholder.id) {
                    cache.slots.remove(&date);
                }
                drop(cache);
                warn!(error = %err, "add failed, placeholder rolled back");
                self.emit(SlotEvent::RolledBack { date });
                Err(err)
            }
        }
    }

    /// Mark the slot's date unavailable.
    ///
    /// Backend errors are returned as-is after the slot is restored; there is
    /// no heal path for deletes. A backend "not found" means the slot is
    /// already gone and counts as success.
    ///
    /// # Errors
    /// `CalendarError::Pending` for a placeholder or a date with a mutation in
    /// flight, `CalendarError::InvalidInput` for a slot that no longer matches
    /// the cache.
    #[instrument(skip(self, slot), fields(slot_id = %slot.id, date = %slot.date))]
    pub async fn remove(&self, slot: &AvailabilitySlot) -> Result<()> {
        let date = slot.date;
        if slot.is_placeholder() {
            return Err(CalendarError::Pending(format!("slot for {date} is still being created")));
        }

        let removed = {
            let mut cache = self.cache.lock();
            if cache.in_flight.contains(&date) {
                return Err(CalendarError::Pending(format!("a change for {date} is in flight")));
            }
            let removed = match cache.slots.remove(&date) {
                Some(current) if current.id == slot.id => current,
                Some(current) => {
                    let held = current.id;
                    cache.slots.insert(date, current);
                    return Err(CalendarError::InvalidInput(format!(
                        "slot {} is stale, {date} is held by slot {held}",
                        slot.id
                    )));
                }
                None => {
                    return Err(CalendarError::InvalidInput(format!(
                        "slot {} is not cached for {date}",
                        slot.id
                    )));
                }
            };
            cache.in_flight.insert(date);
            cache.touch(date);
            removed
        };
        self.emit(SlotEvent::Removed(removed.clone()));

        let result = match self.backend.delete_slot(slot.id).await {
            Err(CalendarError::NotFound(msg)) => {
                debug!(%msg, "slot already deleted on backend");
                Ok(())
            }
            other => other,
        };

        let mut cache = self.cache.lock();
        cache.in_flight.remove(&date);
        cache.touch(date);
        match result {
            Ok(()) => {
                drop(cache);
                info!("availability removed");
                Ok(())
            }
            Err(err) => {
                let restored = if cache.slots.contains_key(&date) {
                    None
                } else {
                    cache.slots.insert(date, removed.clone());
                    Some(removed)
                };
                drop(cache);
                warn!(error = %err, "remove failed, slot restored");
                if let Some(restored) = restored {
                    self.emit(SlotEvent::Restored(restored));
                }
                Err(err)
            }
        }
    }

    async fn require_link(&self, budget: &mut HealBudget) -> Result<ResourceId> {
        self.linker.resolve_within(budget).await.ok_or_else(|| {
            CalendarError::Unavailable("availability calendar is not linked".to_string())
        })
    }

    /// Run `op` against `resource`; on a missing link, heal once and retry.
    async fn call_with_heal<T, F, Fut>(
        &self,
        resource: ResourceId,
        budget: &mut HealBudget,
        op: F,
    ) -> Result<(ResourceId, T)>
    where
        F: Fn(ResourceId) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match op(resource).await {
            Ok(value) => Ok((resource, value)),
            Err(err) if err.is_link_missing() => {
                warn!(error = %err, "backend reported missing link, healing");
                let healed = self.linker.heal(budget).await.ok_or_else(|| {
                    CalendarError::Unavailable(format!("link could not be healed: {err}"))
                })?;
                match op(healed).await {
                    Ok(value) => Ok((healed, value)),
                    Err(err) if err.is_link_missing() => Err(CalendarError::Unavailable(format!(
                        "link still missing after heal: {err}"
                    ))),
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    fn replace(
        &self,
        resource: ResourceId,
        fetched: Vec<AvailabilitySlot>,
        requested_at: u64,
    ) -> usize {
        let mut next: BTreeMap<NaiveDate, AvailabilitySlot> = BTreeMap::new();
        for slot in fetched {
            if slot.resource_id != resource {
                debug!(slot_id = %slot.id, "skipping slot of another resource");
                continue;
            }
            // Duplicate dates collapse onto the oldest id
            next.entry(slot.date)
                .and_modify(|kept| {
                    if slot.id < kept.id {
                        *kept = slot.clone();
                    }
                })
                .or_insert(slot);
        }

        let mut cache = self.cache.lock();
        let changed: Vec<NaiveDate> = cache
            .touched
            .keys()
            .chain(cache.in_flight.iter())
            .copied()
            .filter(|date| cache.changed_since(*date, requested_at))
            .collect();
        for date in changed {
            match cache.slots.get(&date) {
                Some(local) => {
                    next.insert(date, local.clone());
                }
                None => {
                    next.remove(&date);
                }
            }
        }
        cache.slots = next;
        cache.loaded = true;
        cache.slots.len()
    }

    fn next_placeholder_id(&self) -> SlotId {
        SlotId(self.next_placeholder.fetch_sub(1, Ordering::Relaxed))
    }

    fn emit(&self, event: SlotEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}
