//! # Artistcal App
//!
//! Application layer - commands and the headless entry point.
//!
//! This crate contains:
//! - Commands the calendar view calls (date clicks, range actions, refresh)
//! - Application context (dependency injection)
//! - Logging initialisation
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the availability backend, slot store, calendar, and horizon
//!   scheduler together

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
