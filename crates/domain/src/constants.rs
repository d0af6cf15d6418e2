//! Application constants
//!
//! Centralized location for domain-level constants.

// Sliding window
pub const DEFAULT_HORIZON_DAYS: u32 = 365;

// Optimistic placeholders count down from here; backend ids are positive.
pub const FIRST_PLACEHOLDER_ID: i64 = -1;

// API defaults
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:1337/api";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_MAX_ATTEMPTS: usize = 3;

// Wire format for calendar dates
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// Capacity of the slot event broadcast channel
pub const SLOT_EVENT_CHANNEL_CAPACITY: usize = 256;
