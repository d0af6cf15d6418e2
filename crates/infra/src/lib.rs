//! # Artistcal Infrastructure
//!
//! Infrastructure implementations of the core availability ports.
//!
//! This crate contains:
//! - HTTP client with retry for idempotent requests
//! - Authenticated API client and the REST availability backend
//! - Configuration loading from environment and files
//! - The midnight horizon scheduler
//!
//! ## Architecture
//! - Implements traits defined in `artistcal-core`
//! - Contains all "impure" code (network, timers, environment, files)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod scheduling;

pub use api::{ApiClient, ApiClientConfig, ApiError, HttpAvailabilityBackend, StaticTokenProvider};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use scheduling::{HorizonScheduler, HorizonSchedulerConfig, SchedulerError};
