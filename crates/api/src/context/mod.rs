//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use artistcal_core::{
    AvailabilityBackend, AvailabilityCalendar, HorizonMaintainer, LocalClock, ResourceLinker,
    SlotStore, SystemClock,
};
use artistcal_domain::{CalendarError, Config, Result};
use artistcal_infra::api::{
    ApiClient, ApiClientConfig, HttpAvailabilityBackend, StaticTokenProvider,
};
use artistcal_infra::{config, HorizonScheduler, HorizonSchedulerConfig};
use tokio::sync::Mutex;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub clock: Arc<dyn LocalClock>,
    pub linker: Arc<ResourceLinker>,
    pub store: Arc<SlotStore>,
    pub calendar: Arc<AvailabilityCalendar>,
    pub maintainer: Arc<HorizonMaintainer>,

    horizon_scheduler: Mutex<HorizonScheduler>,
}

fn build_http_backend(config: &Config) -> Result<Arc<dyn AvailabilityBackend>> {
    let token = StaticTokenProvider::from_config(config.api.access_token.as_deref())
        .map_err(CalendarError::from)?;

    let client = ApiClient::new(ApiClientConfig::from(&config.api), Arc::new(token)).map_err(|err| {
        tracing::error!(error = %err, "failed to construct ApiClient");
        CalendarError::from(err)
    })?;

    Ok(Arc::new(HttpAvailabilityBackend::new(Arc::new(client))))
}

async fn start_horizon_scheduler(scheduler: &mut HorizonScheduler) -> Result<()> {
    let start_timeout = Duration::from_secs(10);
    tokio::time::timeout(start_timeout, scheduler.start())
        .await
        .map_err(|_| {
            tracing::error!(timeout_secs = 10, "HorizonScheduler start timed out");
            CalendarError::Internal("HorizonScheduler start timed out after 10s".into())
        })?
        .map_err(|err| {
            tracing::error!(error = %err, "failed to start HorizonScheduler");
            CalendarError::from(err)
        })
}

impl AppContext {
    /// Create a new application context from the environment or a config file
    pub async fn new() -> Result<Self> {
        Self::new_with_config(config::load()?).await
    }

    /// Create a new application context talking to the configured backend
    pub async fn new_with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let backend = build_http_backend(&config)?;
        Self::with_backend(config, backend, Arc::new(SystemClock)).await
    }

    /// Create a context around an explicit backend and clock
    ///
    /// Starts the horizon scheduler when `config.horizon.enabled` is set.
    pub async fn with_backend(
        config: Config,
        backend: Arc<dyn AvailabilityBackend>,
        clock: Arc<dyn LocalClock>,
    ) -> Result<Self> {
        let linker = Arc::new(ResourceLinker::new(Arc::clone(&backend)));
        let store = Arc::new(SlotStore::new(backend, Arc::clone(&linker)));
        let calendar = Arc::new(AvailabilityCalendar::new(Arc::clone(&store), Arc::clone(&clock)));
        let maintainer = Arc::new(HorizonMaintainer::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.horizon.days,
        ));

        let mut scheduler = HorizonScheduler::new(
            Arc::clone(&maintainer),
            Arc::clone(&clock),
            HorizonSchedulerConfig::default(),
        );
        if config.horizon.enabled {
            start_horizon_scheduler(&mut scheduler).await?;
        } else {
            tracing::info!("horizon maintenance disabled by configuration");
        }

        tracing::info!(
            base_url = %config.api.base_url,
            horizon_days = config.horizon.days,
            "application context initialised"
        );

        Ok(Self {
            config,
            clock,
            linker,
            store,
            calendar,
            maintainer,
            horizon_scheduler: Mutex::new(scheduler),
        })
    }

    pub async fn horizon_scheduler_running(&self) -> bool {
        self.horizon_scheduler.lock().await.is_running()
    }

    pub async fn horizon_checks_run(&self) -> u64 {
        self.horizon_scheduler.lock().await.checks_run()
    }

    /// Stop background tasks. Safe to call more than once.
    pub async fn shutdown(&self) -> Result<()> {
        let mut scheduler = self.horizon_scheduler.lock().await;
        if scheduler.is_running() {
            scheduler.stop().await?;
        }
        tracing::info!("application context shut down");
        Ok(())
    }
}
