use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use artistcal_core::AvailabilityBackend;
use artistcal_domain::{AvailabilitySlot, CalendarError, ResourceId, Result, SlotId};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Semaphore;

/// Number of calls per backend operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch_link: usize,
    pub ensure: usize,
    pub list: usize,
    pub create: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.fetch_link + self.ensure + self.list + self.create + self.delete
    }
}

#[derive(Debug)]
struct State {
    link: Option<ResourceId>,
    /// Resource the ensure call links, `None` if ensure never helps
    ensure_links: Option<ResourceId>,
    /// List and create calls report a missing link regardless of `link`
    writes_unlinked: bool,
    slots: Vec<AvailabilitySlot>,
    next_id: i64,
    fail_create: HashSet<NaiveDate>,
    fail_delete: HashSet<NaiveDate>,
    fail_list: Option<CalendarError>,
    calls: CallCounts,
}

/// Holds a listing after its snapshot was taken.
#[derive(Clone)]
pub struct ListGate {
    /// Gets a permit once the listing has read the server state
    pub entered: Arc<Semaphore>,
    /// Lets the listing return
    pub release: Arc<Semaphore>,
}

impl ListGate {
    pub async fn wait_entered(&self) {
        self.entered.acquire().await.unwrap().forget();
    }

    pub fn open(&self) {
        self.release.add_permits(1);
    }
}

/// In-memory `AvailabilityBackend` with failure injection.
pub struct MockBackend {
    state: Mutex<State>,
    create_gate: Option<Arc<Semaphore>>,
    list_gate: Option<ListGate>,
}

impl MockBackend {
    fn with_state(link: Option<ResourceId>, ensure_links: Option<ResourceId>) -> Self {
        Self {
            state: Mutex::new(State {
                link,
                ensure_links,
                writes_unlinked: false,
                slots: Vec::new(),
                next_id: 1,
                fail_create: HashSet::new(),
                fail_delete: HashSet::new(),
                fail_list: None,
                calls: CallCounts::default(),
            }),
            create_gate: None,
            list_gate: None,
        }
    }

    /// Principal already linked to `resource`.
    pub fn linked(resource: i64) -> Self {
        Self::with_state(Some(ResourceId(resource)), Some(ResourceId(resource)))
    }

    /// No link yet; the ensure call creates one for `resource`.
    pub fn unlinked(resource: i64) -> Self {
        Self::with_state(None, Some(ResourceId(resource)))
    }

    /// Every call reports a missing link, ensure included.
    pub fn always_unlinked() -> Self {
        let backend = Self::with_state(None, None);
        backend.state.lock().unwrap().writes_unlinked = true;
        backend
    }

    /// Link reads succeed but list and create report a missing link.
    pub fn stale_link(resource: i64) -> Self {
        let backend = Self::linked(resource);
        backend.state.lock().unwrap().writes_unlinked = true;
        backend
    }

    /// Seed a server-side slot.
    pub fn with_slot(self, date: NaiveDate) -> Self {
        self.insert_server_slot(date);
        self
    }

    pub fn with_slots(self, dates: &[NaiveDate]) -> Self {
        for date in dates {
            self.insert_server_slot(*date);
        }
        self
    }

    /// Seed a raw slot, duplicates and foreign resources included.
    pub fn with_raw_slot(self, slot: AvailabilitySlot) -> Self {
        self.state.lock().unwrap().slots.push(slot);
        self
    }

    pub fn failing_create_on(self, date: NaiveDate) -> Self {
        self.state.lock().unwrap().fail_create.insert(date);
        self
    }

    pub fn failing_delete_on(self, date: NaiveDate) -> Self {
        self.state.lock().unwrap().fail_delete.insert(date);
        self
    }

    pub fn failing_list(self, error: CalendarError) -> Self {
        self.state.lock().unwrap().fail_list = Some(error);
        self
    }

    /// Hold every create until the returned semaphore gets a permit.
    pub fn gated_creates(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.create_gate = Some(gate.clone());
        (self, gate)
    }

    /// Hold every listing between reading the server state and returning it.
    pub fn gated_lists(mut self) -> (Self, ListGate) {
        let gate = ListGate {
            entered: Arc::new(Semaphore::new(0)),
            release: Arc::new(Semaphore::new(0)),
        };
        self.list_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().unwrap().calls
    }

    pub fn reset_calls(&self) {
        self.state.lock().unwrap().calls = CallCounts::default();
    }

    pub fn set_create_failure(&self, date: NaiveDate, failing: bool) {
        let mut state = self.state.lock().unwrap();
        if failing {
            state.fail_create.insert(date);
        } else {
            state.fail_create.remove(&date);
        }
    }

    /// Delete a slot behind the client's back.
    pub fn remove_out_of_band(&self, date: NaiveDate) {
        self.state.lock().unwrap().slots.retain(|s| s.date != date);
    }

    /// Dates with a server-side slot, ascending, duplicates kept.
    pub fn server_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<_> = self.state.lock().unwrap().slots.iter().map(|s| s.date).collect();
        dates.sort();
        dates
    }

    fn insert_server_slot(&self, date: NaiveDate) {
        let mut state = self.state.lock().unwrap();
        let resource = state.link.or(state.ensure_links).unwrap_or(ResourceId(1));
        let id = SlotId(state.next_id);
        state.next_id += 1;
        state.slots.push(AvailabilitySlot::new(id, date, resource));
    }

    fn not_linked() -> CalendarError {
        CalendarError::LinkMissing("artist profile not linked".to_string())
    }
}

#[async_trait]
impl AvailabilityBackend for MockBackend {
    async fn fetch_link(&self) -> Result<ResourceId> {
        let mut state = self.state.lock().unwrap();
        state.calls.fetch_link += 1;
        state.link.ok_or_else(Self::not_linked)
    }

    async fn ensure_link(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.ensure += 1;
        if let Some(resource) = state.ensure_links {
            state.link = Some(resource);
        }
        Ok(())
    }

    async fn list_slots(&self, resource: ResourceId) -> Result<Vec<AvailabilitySlot>> {
        let listing = {
            let mut state = self.state.lock().unwrap();
            state.calls.list += 1;
            if state.writes_unlinked || state.link != Some(resource) {
                return Err(Self::not_linked());
            }
            if let Some(error) = &state.fail_list {
                return Err(error.clone());
            }
            state.slots.clone()
        };

        if let Some(gate) = &self.list_gate {
            gate.entered.add_permits(1);
            gate.release.acquire().await.unwrap().forget();
        }
        Ok(listing)
    }

    async fn create_slot(&self, resource: ResourceId, date: NaiveDate) -> Result<AvailabilitySlot> {
        self.state.lock().unwrap().calls.create += 1;

        if let Some(gate) = &self.create_gate {
            gate.acquire().await.unwrap().forget();
        }

        let mut state = self.state.lock().unwrap();
        if state.writes_unlinked || state.link != Some(resource) {
            return Err(Self::not_linked());
        }
        if state.fail_create.contains(&date) {
            return Err(CalendarError::Server(format!("create failed for {date}")));
        }
        if let Some(existing) =
            state.slots.iter().find(|s| s.resource_id == resource && s.date == date)
        {
            return Ok(existing.clone());
        }

        let slot = AvailabilitySlot::new(SlotId(state.next_id), date, resource);
        state.next_id += 1;
        state.slots.push(slot.clone());
        Ok(slot)
    }

    async fn delete_slot(&self, id: SlotId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.delete += 1;

        let Some(pos) = state.slots.iter().position(|s| s.id == id) else {
            return Err(CalendarError::NotFound(format!("availability {id} not found")));
        };
        if state.fail_delete.contains(&state.slots[pos].date) {
            return Err(CalendarError::Network("connection reset".to_string()));
        }
        state.slots.remove(pos);
        Ok(())
    }
}
