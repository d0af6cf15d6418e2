use std::time::Duration;

use artistcal_domain::CalendarError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,artistcal=debug";

/// Install the global tracing subscriber.
///
/// Honours `RUST_LOG`; `ARTISTCAL_LOG_JSON=1` switches to JSON lines. Calling
/// it again after a subscriber is installed is a no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("ARTISTCAL_LOG_JSON")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if json { builder.json().try_init() } else { builder.try_init() };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"availability::click_day"`).
/// * `elapsed` - Duration the command execution took.
/// * `error_type` - Stable error label for failures, `None` on success.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error_type: Option<&str>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error_type {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_type) => warn!(command, duration_ms, error_type, "command_execution_failure"),
    }
}

/// Convert a `CalendarError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &CalendarError) -> &'static str {
    error.label()
}
