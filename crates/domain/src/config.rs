//! Configuration structures
//!
//! Loaded by the infrastructure layer from environment variables or a
//! JSON/TOML file. Every section has defaults so partial files are accepted.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_API_MAX_ATTEMPTS, DEFAULT_API_TIMEOUT_SECS, DEFAULT_HORIZON_DAYS,
};
use crate::errors::{CalendarError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub horizon: HorizonConfig,
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns `CalendarError::Config` if any section is invalid.
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.horizon.validate()
    }
}

/// Backend REST API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Total attempts for idempotent requests (initial try + retries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Bearer credential. Usually supplied by the auth collaborator instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            max_attempts: default_max_attempts(),
            access_token: None,
        }
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(CalendarError::Config("api.base_url must not be empty".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(CalendarError::Config("api.timeout_seconds must be positive".into()));
        }
        if self.max_attempts == 0 {
            return Err(CalendarError::Config("api.max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

/// Sliding window maintenance settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonConfig {
    /// Distance of the horizon marker from today, in days.
    #[serde(default = "default_horizon_days")]
    pub days: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self { days: default_horizon_days(), enabled: true }
    }
}

impl HorizonConfig {
    fn validate(&self) -> Result<()> {
        if self.days == 0 {
            return Err(CalendarError::Config("horizon.days must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_API_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_API_MAX_ATTEMPTS
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

fn default_true() -> bool {
    true
}
