//! Booking platform API client
//!
//! HTTP adapter for the availability backend: bearer authentication, status
//! classification (including the "not linked" class that drives link
//! healing), and the REST mapping of the [`artistcal_core::AvailabilityBackend`]
//! port.
//!
//! # Architecture
//!
//! - Uses [`crate::http::HttpClient`] (no direct reqwest elsewhere)
//! - Transport retries only for idempotent methods
//! - Timeout on every external call

pub mod auth;
pub mod availability;
pub mod client;
pub mod errors;

pub use auth::{AccessTokenProvider, StaticTokenProvider};
pub use availability::HttpAvailabilityBackend;
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
