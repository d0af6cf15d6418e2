//! Scheduling infrastructure for background tasks
//!
//! The horizon scheduler follows the runtime rules used across this crate:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on all async operations

pub mod error;
pub mod horizon_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use horizon_scheduler::{HorizonScheduler, HorizonSchedulerConfig};
