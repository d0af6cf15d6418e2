//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `ARTISTCAL_API_BASE_URL` is absent, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! - `ARTISTCAL_API_BASE_URL`: Backend API base URL (required for env loading)
//! - `ARTISTCAL_API_TOKEN`: Bearer credential
//! - `ARTISTCAL_API_TIMEOUT`: Per-attempt timeout in seconds
//! - `ARTISTCAL_API_MAX_ATTEMPTS`: Attempts for idempotent requests
//! - `ARTISTCAL_HORIZON_DAYS`: Horizon marker distance in days
//! - `ARTISTCAL_HORIZON_ENABLED`: Whether horizon maintenance runs (true/false)
//!
//! ## File Locations
//! The loader probes `artistcal.{toml,json}` then `config.{toml,json}` in the
//! working directory, its two parents, and the same three levels relative to
//! the executable.

use std::path::{Path, PathBuf};

use artistcal_domain::{ApiConfig, CalendarError, Config, HorizonConfig, Result};

const CONFIG_FILE_NAMES: &[&str] =
    &["artistcal.toml", "artistcal.json", "config.toml", "config.json"];
const PROBE_DIRS: &[&str] = &[".", "..", "../.."];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CalendarError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `ARTISTCAL_API_BASE_URL` is required; every other setting falls back
/// to its default.
///
/// # Errors
/// Returns `CalendarError::Config` if the base URL is missing or any value
/// fails to parse or validate.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let base_url = env_var("ARTISTCAL_API_BASE_URL")?;
    let access_token = std::env::var("ARTISTCAL_API_TOKEN").ok().filter(|t| !t.trim().is_empty());
    let timeout_seconds =
        env_parse("ARTISTCAL_API_TIMEOUT", defaults.api.timeout_seconds, "API timeout")?;
    let max_attempts =
        env_parse("ARTISTCAL_API_MAX_ATTEMPTS", defaults.api.max_attempts, "max attempts")?;
    let horizon_days =
        env_parse("ARTISTCAL_HORIZON_DAYS", defaults.horizon.days, "horizon days")?;
    let horizon_enabled = env_bool("ARTISTCAL_HORIZON_ENABLED", defaults.horizon.enabled);

    let config = Config {
        api: ApiConfig { base_url, timeout_seconds, max_attempts, access_token },
        horizon: HorizonConfig { days: horizon_days, enabled: horizon_enabled },
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. The format is chosen by file extension.
///
/// # Errors
/// Returns `CalendarError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The parsed configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CalendarError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CalendarError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalendarError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CalendarError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CalendarError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CalendarError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn validate(config: &Config) -> Result<()> {
    config.validate()?;

    let url = url::Url::parse(&config.api.base_url).map_err(|e| {
        CalendarError::Config(format!("Invalid api.base_url '{}': {}", config.api.base_url, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CalendarError::Config(format!(
            "api.base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| PROBE_DIRS.iter().map(move |dir| root.join(dir)))
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        CalendarError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_parse<T>(key: &str, default: T, what: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| CalendarError::Config(format!("Invalid {} in {}: {}", what, key, e))),
        Err(_) => Ok(default),
    }
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
