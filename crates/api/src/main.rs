//! Artistcal - headless availability maintainer
//!
//! Loads configuration, resolves the artist link, and keeps the availability
//! horizon extended at every local midnight until interrupted.

use std::sync::Arc;

use anyhow::Context;
use artistcal_lib::utils::logging::init_tracing;
use artistcal_lib::{get_horizon_status, refresh_availability, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Read .env before the subscriber so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();
    init_tracing();
    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Artistcal starting...");

    let ctx = Arc::new(AppContext::new().await.context("failed to initialise application")?);

    match refresh_availability(&ctx).await {
        Ok(slots) => tracing::info!(count = slots.len(), "availability loaded"),
        Err(e) => tracing::warn!(error = %e, "availability not loaded; horizon checks will retry"),
    }

    if let Ok(status) = get_horizon_status(&ctx).await {
        tracing::info!(
            marker = %status.current_marker,
            scheduler_running = status.scheduler_running,
            "Artistcal initialized successfully"
        );
    }

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    tracing::info!("shutdown requested");

    ctx.shutdown().await.context("failed to stop background tasks")?;
    Ok(())
}
