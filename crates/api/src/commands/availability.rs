//! Availability calendar commands
//!
//! The calendar view calls these with ISO `YYYY-MM-DD` strings and renders
//! the camelCase JSON they return. Every command is timed and logged through
//! [`execute_command`].

use std::sync::Arc;

use artistcal_core::{BatchReport, ClickResult, DayState, HorizonOutcome, RangeOffer};
use artistcal_domain::constants::ISO_DATE_FORMAT;
use artistcal_domain::{
    AvailabilitySlot, BulkAction, CalendarError, DateRange, Result, SelectionState,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Everything the calendar needs to render a visible date span
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    /// False while the artist link is unresolved; mutating controls are disabled
    pub enabled: bool,
    /// A range action is running
    pub busy: bool,
    pub selection: SelectionState,
    pub offer: Option<RangeOffer>,
    pub days: Vec<DayState>,
}

/// Outcome of a day click
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickResponse {
    Ignored,
    Anchored { date: NaiveDate },
    Toggled { date: NaiveDate, slot: Option<AvailabilitySlot> },
    RangeOffered { offer: RangeOffer },
}

impl From<ClickResult> for ClickResponse {
    fn from(result: ClickResult) -> Self {
        match result {
            ClickResult::Ignored => Self::Ignored,
            ClickResult::Anchored(date) => Self::Anchored { date },
            ClickResult::Toggled { date, slot } => Self::Toggled { date, slot },
            ClickResult::RangeOffered(offer) => Self::RangeOffered { offer },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonStatus {
    pub horizon_days: u32,
    pub current_marker: NaiveDate,
    pub last_marker: Option<NaiveDate>,
    pub scheduler_running: bool,
    pub checks_run: u64,
}

/// Result of an on-demand horizon check
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HorizonCheckResponse {
    Unavailable,
    AlreadyPresent { marker: NaiveDate },
    AlreadyHandled { marker: NaiveDate },
    Extended { slot: AvailabilitySlot },
    Failed { marker: NaiveDate, error: CalendarError },
}

impl From<HorizonOutcome> for HorizonCheckResponse {
    fn from(outcome: HorizonOutcome) -> Self {
        match outcome {
            HorizonOutcome::Unavailable => Self::Unavailable,
            HorizonOutcome::AlreadyPresent(marker) => Self::AlreadyPresent { marker },
            HorizonOutcome::AlreadyHandled(marker) => Self::AlreadyHandled { marker },
            HorizonOutcome::Extended(slot) => Self::Extended { slot },
            HorizonOutcome::Failed { marker, error } => Self::Failed { marker, error },
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT)
        .map_err(|e| CalendarError::InvalidInput(format!("invalid date '{raw}': {e}")))
}

fn render_view(ctx: &AppContext, range: DateRange) -> CalendarView {
    let calendar = &ctx.calendar;
    CalendarView {
        enabled: calendar.is_enabled(),
        busy: calendar.is_busy(),
        selection: calendar.selection(),
        offer: calendar.pending_offer(),
        days: calendar.days(range),
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Render the calendar for `start..=end`
///
/// The first call loads availability from the backend. Without an artist link
/// the view comes back disabled instead of failing.
pub async fn get_availability(
    context: &Arc<AppContext>,
    start: &str,
    end: &str,
) -> Result<CalendarView> {
    execute_command("availability::get_availability", || async {
        let range = DateRange::new(parse_date(start)?, parse_date(end)?)?;

        if !context.store.is_loaded() {
            match context.calendar.refresh().await {
                Ok(slots) => debug!(count = slots.len(), "initial availability load"),
                Err(CalendarError::Unavailable(reason)) => {
                    info!(%reason, "calendar disabled: no artist link");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(render_view(context, range))
    })
    .await
}

/// Reload availability from the backend
pub async fn refresh_availability(context: &Arc<AppContext>) -> Result<Vec<AvailabilitySlot>> {
    execute_command("availability::refresh_availability", || context.calendar.refresh()).await
}

/// Handle a click on a calendar day
pub async fn click_day(context: &Arc<AppContext>, date: &str) -> Result<ClickResponse> {
    execute_command("availability::click_day", || async {
        let date = parse_date(date)?;
        context.calendar.click_day(date).await.map(ClickResponse::from)
    })
    .await
}

/// Drop the current anchor or range selection
pub async fn cancel_selection(context: &Arc<AppContext>) -> Result<SelectionState> {
    execute_command("availability::cancel_selection", || async {
        context.calendar.cancel_selection();
        Ok(context.calendar.selection())
    })
    .await
}

/// Apply `make_available` or `make_unavailable` to the selected range
pub async fn apply_range_action(context: &Arc<AppContext>, action: &str) -> Result<BatchReport> {
    execute_command("availability::apply_range_action", || async {
        let action: BulkAction = action.parse().map_err(CalendarError::InvalidInput)?;
        context.calendar.apply_range_action(action).await
    })
    .await
}

/// Flip a single day between available and unavailable
pub async fn toggle_day(
    context: &Arc<AppContext>,
    date: &str,
) -> Result<Option<AvailabilitySlot>> {
    execute_command("availability::toggle_day", || async {
        let date = parse_date(date)?;
        context.calendar.toggle_day(date).await
    })
    .await
}

/// Report the horizon marker and scheduler state
pub async fn get_horizon_status(context: &Arc<AppContext>) -> Result<HorizonStatus> {
    execute_command("availability::get_horizon_status", || async {
        Ok(HorizonStatus {
            horizon_days: context.maintainer.horizon_days(),
            current_marker: context.maintainer.current_marker(),
            last_marker: context.maintainer.last_marker(),
            scheduler_running: context.horizon_scheduler_running().await,
            checks_run: context.horizon_checks_run().await,
        })
    })
    .await
}

/// Run a horizon check now instead of waiting for midnight
pub async fn check_horizon(context: &Arc<AppContext>) -> Result<HorizonCheckResponse> {
    execute_command("availability::check_horizon", || async {
        Ok(context.maintainer.check().await.into())
    })
    .await
}
