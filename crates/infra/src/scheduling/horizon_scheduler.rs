//! Midnight scheduler for the availability horizon
//!
//! Runs [`HorizonMaintainer::check`] once on start and again at every local
//! midnight until stopped. The next wake-up is armed before each check runs,
//! so a slow check never shifts the schedule.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use artistcal_core::{HorizonMaintainer, SystemClock};
//! use artistcal_infra::scheduling::{HorizonScheduler, HorizonSchedulerConfig};
//!
//! # type BoxError = Box<dyn std::error::Error>;
//! # async fn example(maintainer: Arc<HorizonMaintainer>) -> Result<(), BoxError> {
//! let mut scheduler = HorizonScheduler::new(
//!     maintainer,
//!     Arc::new(SystemClock),
//!     HorizonSchedulerConfig::default(),
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use artistcal_core::{HorizonMaintainer, HorizonOutcome, LocalClock};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Shortest delay between two checks, in case the clock reports a midnight
/// that has already passed
const MIN_REARM_DELAY: Duration = Duration::from_secs(1);

type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the horizon scheduler
#[derive(Debug, Clone)]
pub struct HorizonSchedulerConfig {
    /// Upper bound for one horizon check (link resolution, load, create)
    pub check_timeout: Duration,
    /// How long `stop` waits for the background task
    pub join_timeout: Duration,
}

impl Default for HorizonSchedulerConfig {
    fn default() -> Self {
        Self { check_timeout: Duration::from_secs(120), join_timeout: Duration::from_secs(5) }
    }
}

/// Background task keeping the horizon marker current
pub struct HorizonScheduler {
    maintainer: Arc<HorizonMaintainer>,
    clock: Arc<dyn LocalClock>,
    config: HorizonSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
    checks_run: Arc<AtomicU64>,
}

impl HorizonScheduler {
    pub fn new(
        maintainer: Arc<HorizonMaintainer>,
        clock: Arc<dyn LocalClock>,
        config: HorizonSchedulerConfig,
    ) -> Self {
        Self {
            maintainer,
            clock,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
            checks_run: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start the scheduler
    ///
    /// The first check runs immediately; later checks run at local midnight.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(horizon_days = self.maintainer.horizon_days(), "Starting horizon scheduler");

        // Fresh token so the scheduler can restart after stop
        self.cancellation_token = CancellationToken::new();

        let maintainer = Arc::clone(&self.maintainer);
        let clock = Arc::clone(&self.clock);
        let config = self.config.clone();
        let cancel = self.cancellation_token.clone();
        let checks_run = Arc::clone(&self.checks_run);

        let handle = tokio::spawn(async move {
            Self::run_loop(maintainer, clock, config, cancel, checks_run).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Horizon scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the background task and awaits completion. A check already
    /// in progress runs to completion on its own.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is not running or the task does not finish
    /// within the join timeout
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping horizon scheduler");
        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|source| SchedulerError::Timeout { duration: join_timeout, source })??;
        }

        info!("Horizon scheduler stopped");
        Ok(())
    }

    /// Check if scheduler is running
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Number of checks completed since construction.
    pub fn checks_run(&self) -> u64 {
        self.checks_run.load(Ordering::Acquire)
    }

    async fn run_loop(
        maintainer: Arc<HorizonMaintainer>,
        clock: Arc<dyn LocalClock>,
        config: HorizonSchedulerConfig,
        cancel: CancellationToken,
        checks_run: Arc<AtomicU64>,
    ) {
        let mut next_check = Instant::now();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Horizon loop cancelled");
                    break;
                }
                _ = tokio::time::sleep_until(next_check) => {
                    let delay = clock.until_next_midnight().max(MIN_REARM_DELAY);
                    next_check = Instant::now() + delay;
                    debug!(next_in_secs = delay.as_secs(), "Horizon check re-armed");

                    // Detached so cancellation or a timeout never drops a
                    // store mutation halfway through
                    let running = Arc::clone(&maintainer);
                    let check = tokio::spawn(async move { running.check().await });

                    tokio::select! {
                        _ = cancel.cancelled() => {
                            debug!("Horizon loop cancelled while a check is in flight");
                            break;
                        }
                        joined = tokio::time::timeout(config.check_timeout, check) => {
                            Self::log_outcome(joined, config.check_timeout);
                            checks_run.fetch_add(1, Ordering::AcqRel);
                        }
                    }
                }
            }
        }
    }

    fn log_outcome(
        joined: Result<Result<HorizonOutcome, tokio::task::JoinError>, tokio::time::error::Elapsed>,
        timeout: Duration,
    ) {
        match joined {
            Ok(Ok(HorizonOutcome::Extended(slot))) => {
                info!(date = %slot.date, "Horizon check extended availability");
            }
            Ok(Ok(HorizonOutcome::Failed { marker, error })) => {
                warn!(%marker, error = %error, error_type = error.label(), "Horizon check failed");
            }
            Ok(Ok(HorizonOutcome::Unavailable)) => {
                debug!("Horizon check skipped: resource link unavailable");
            }
            Ok(Ok(outcome)) => {
                debug!(?outcome, "Horizon check made no change");
            }
            Ok(Err(join_err)) => {
                error!(error = %join_err, "Horizon check task failed");
            }
            Err(_) => {
                warn!(
                    timeout_secs = timeout.as_secs(),
                    "Horizon check still running after timeout"
                );
            }
        }
    }
}
