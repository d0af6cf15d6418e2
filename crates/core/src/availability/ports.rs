//! Port interfaces for availability operations

use std::time::Duration;

use artistcal_domain::{AvailabilitySlot, ResourceId, Result, SlotId};
use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Backend operations the availability calendar depends on
///
/// Implementations must report a missing resource link as
/// `CalendarError::LinkMissing` so callers can heal it.
#[async_trait]
pub trait AvailabilityBackend: Send + Sync {
    /// Read the resource linked to the current principal.
    async fn fetch_link(&self) -> Result<ResourceId>;

    /// Create the link if it does not exist yet. Idempotent.
    async fn ensure_link(&self) -> Result<()>;

    /// All slots of a resource.
    async fn list_slots(&self, resource: ResourceId) -> Result<Vec<AvailabilitySlot>>;

    /// Create a slot for `date`. Safe to call if one already exists.
    async fn create_slot(&self, resource: ResourceId, date: NaiveDate) -> Result<AvailabilitySlot>;

    /// Delete a slot by id.
    async fn delete_slot(&self, id: SlotId) -> Result<()>;
}

/// Local wall-clock time as seen by the calendar view
///
/// Dates carry no timezone; "today" is the local calendar date.
pub trait LocalClock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Time left until the next local midnight.
    fn until_next_midnight(&self) -> Duration {
        let now = self.now();
        let next = now
            .date()
            .checked_add_days(Days::new(1))
            .map_or(NaiveDateTime::MAX, |d| d.and_time(NaiveTime::MIN));
        (next - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// System clock in the machine's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl LocalClock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
