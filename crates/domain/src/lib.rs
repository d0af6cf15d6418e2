//! # Artistcal Domain
//!
//! Business domain types for the artist availability calendar.
//!
//! This crate contains:
//! - Availability slots and their identifiers
//! - Range selection state and bulk action classification
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other artistcal crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
