//! REST adapter for the availability backend port

use std::sync::Arc;

use artistcal_core::AvailabilityBackend;
use artistcal_domain::{AvailabilitySlot, CalendarError, ResourceId, Result, SlotId};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::client::ApiClient;
use super::errors::ApiError;

const LINK_PATH: &str = "/artists/me";
const ENSURE_LINK_PATH: &str = "/artists/me/ensure";

fn slots_path(resource: ResourceId) -> String {
    format!("/artists/{resource}/availabilities")
}

fn slot_path(slot: SlotId) -> String {
    format!("/availabilities/{slot}")
}

/* -------------------------------------------------------------------------- */
/* Wire types */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
struct ArtistDto {
    id: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct SlotDto {
    id: i64,
    date: NaiveDate,
    artist_id: i64,
}

impl From<SlotDto> for AvailabilitySlot {
    fn from(dto: SlotDto) -> Self {
        AvailabilitySlot::new(SlotId(dto.id), dto.date, ResourceId(dto.artist_id))
    }
}

#[derive(Debug, Deserialize)]
struct SlotListDto {
    #[serde(default)]
    data: Vec<SlotDto>,
}

#[derive(Debug, Serialize)]
struct CreateSlotDto {
    date: NaiveDate,
}

/* -------------------------------------------------------------------------- */
/* Adapter */
/* -------------------------------------------------------------------------- */

/// [`AvailabilityBackend`] backed by the booking platform's REST API
pub struct HttpAvailabilityBackend {
    client: Arc<ApiClient>,
}

impl HttpAvailabilityBackend {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AvailabilityBackend for HttpAvailabilityBackend {
    #[instrument(skip(self))]
    async fn fetch_link(&self) -> Result<ResourceId> {
        let artist: ArtistDto = self.client.get(LINK_PATH).await.map_err(|err| match err {
            // No artist behind this principal yet
            ApiError::NotFound(message) | ApiError::Auth(message) => {
                CalendarError::LinkMissing(message)
            }
            other => other.into(),
        })?;

        debug!(resource_id = artist.id, "resolved artist link");
        Ok(ResourceId(artist.id))
    }

    #[instrument(skip(self))]
    async fn ensure_link(&self) -> Result<()> {
        let _: serde_json::Value =
            self.client.post(ENSURE_LINK_PATH, &serde_json::json!({})).await?;
        info!("artist link ensured");
        Ok(())
    }

    #[instrument(skip(self), fields(resource_id = %resource))]
    async fn list_slots(&self, resource: ResourceId) -> Result<Vec<AvailabilitySlot>> {
        let list: SlotListDto = self.client.get(&slots_path(resource)).await?;
        debug!(count = list.data.len(), "fetched availability slots");
        Ok(list.data.into_iter().map(AvailabilitySlot::from).collect())
    }

    #[instrument(skip(self), fields(resource_id = %resource, date = %date))]
    async fn create_slot(&self, resource: ResourceId, date: NaiveDate) -> Result<AvailabilitySlot> {
        let created: SlotDto =
            self.client.post(&slots_path(resource), &CreateSlotDto { date }).await?;
        Ok(created.into())
    }

    #[instrument(skip(self), fields(slot_id = %slot))]
    async fn delete_slot(&self, slot: SlotId) -> Result<()> {
        self.client.delete(&slot_path(slot)).await?;
        Ok(())
    }
}
