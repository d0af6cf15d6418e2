//! Resource link resolution with a bounded self-heal
//!
//! The principal's resource id is resolved lazily and cached. When the backend
//! reports that no link exists, the linker issues one idempotent ensure call
//! and re-reads the link once. The number of heals per top-level operation is
//! bounded by a [`HealBudget`] that the caller threads through.

use std::sync::Arc;

use artistcal_domain::ResourceId;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::ports::AvailabilityBackend;

/// Number of heals a single top-level operation may perform
#[derive(Debug)]
pub struct HealBudget {
    remaining: u8,
}

impl HealBudget {
    /// Budget for one heal, the allowance of every list/add operation.
    pub fn single() -> Self {
        Self { remaining: 1 }
    }

    /// Consume one heal. Returns `false` if none is left.
    pub fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Resolves the resource id linked to the current principal
pub struct ResourceLinker {
    backend: Arc<dyn AvailabilityBackend>,
    cached: RwLock<Option<ResourceId>>,
    resolving: Mutex<()>,
}

impl ResourceLinker {
    pub fn new(backend: Arc<dyn AvailabilityBackend>) -> Self {
        Self { backend, cached: RwLock::new(None), resolving: Mutex::new(()) }
    }

    /// The cached resource id, without touching the network.
    pub fn cached(&self) -> Option<ResourceId> {
        *self.cached.read()
    }

    /// Whether a resource id is currently known.
    pub fn is_linked(&self) -> bool {
        self.cached().is_some()
    }

    /// Forget the cached id so the next resolution reads it again.
    pub fn invalidate(&self) {
        *self.cached.write() = None;
    }

    /// Resolve the resource id with a fresh single-heal budget.
    ///
    /// Returns `None` if the link cannot be read or healed; the caller treats
    /// the calendar as temporarily unavailable.
    pub async fn resolve(&self) -> Option<ResourceId> {
        let mut budget = HealBudget::single();
        self.resolve_within(&mut budget).await
    }

    /// Resolve the resource id, spending from the caller's heal budget.
    pub async fn resolve_within(&self, budget: &mut HealBudget) -> Option<ResourceId> {
        if let Some(id) = self.cached() {
            return Some(id);
        }

        let _guard = self.resolving.lock().await;
        // A concurrent caller may have finished while we waited
        if let Some(id) = self.cached() {
            return Some(id);
        }

        self.read_link(budget).await
    }

    /// Drop the cached id and resolve again.
    pub async fn refresh(&self) -> Option<ResourceId> {
        self.invalidate();
        self.resolve().await
    }

    /// Heal after a dependent call reported the link as missing.
    ///
    /// Spends one heal from `budget`; returns `None` without any network call
    /// once the budget is spent.
    #[instrument(skip(self, budget))]
    pub async fn heal(&self, budget: &mut HealBudget) -> Option<ResourceId> {
        let _guard = self.resolving.lock().await;
        if !budget.take() {
            debug!("heal budget spent, not retrying link");
            return None;
        }

        self.invalidate();
        self.ensure_and_reread().await
    }

    async fn read_link(&self, budget: &mut HealBudget) -> Option<ResourceId> {
        match self.backend.fetch_link().await {
            Ok(id) => {
                self.store(id);
                Some(id)
            }
            Err(err) if err.is_link_missing() => {
                if !budget.take() {
                    debug!(error = %err, "link missing and heal budget spent");
                    return None;
                }
                self.ensure_and_reread().await
            }
            Err(err) => {
                warn!(error = %err, "failed to read resource link");
                None
            }
        }
    }

    async fn ensure_and_reread(&self) -> Option<ResourceId> {
        info!("resource link missing, ensuring link");

        if let Err(err) = self.backend.ensure_link().await {
            warn!(error = %err, "ensure link call failed");
            return None;
        }

        match self.backend.fetch_link().await {
            Ok(id) => {
                info!(resource_id = %id, "resource link healed");
                self.store(id);
                Some(id)
            }
            Err(err) => {
                warn!(error = %err, "resource link still unresolved after ensure");
                None
            }
        }
    }

    fn store(&self, id: ResourceId) {
        *self.cached.write() = Some(id);
    }
}
