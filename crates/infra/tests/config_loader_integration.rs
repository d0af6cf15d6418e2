//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and the
//! process environment.

use std::io::Write;
use std::path::PathBuf;

use artistcal_domain::CalendarError;
use artistcal_infra::config;
use serial_test::serial;
use tempfile::TempDir;

const ENV_KEYS: &[&str] = &[
    "ARTISTCAL_API_BASE_URL",
    "ARTISTCAL_API_TOKEN",
    "ARTISTCAL_API_TIMEOUT",
    "ARTISTCAL_API_MAX_ATTEMPTS",
    "ARTISTCAL_HORIZON_DAYS",
    "ARTISTCAL_HORIZON_ENABLED",
];

/// Clears the loader's variables on creation and on drop
struct EnvGuard;

impl EnvGuard {
    fn clean() -> Self {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
        Self
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }
}

fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create config file");
    file.write_all(contents.as_bytes()).expect("Failed to write config file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "artistcal.json",
        r#"{
            "api": {
                "base_url": "https://booking.example.com/api",
                "timeout_seconds": 10,
                "max_attempts": 4,
                "access_token": "json-token"
            },
            "horizon": { "days": 180, "enabled": true }
        }"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from JSON file");

    assert_eq!(config.api.base_url, "https://booking.example.com/api");
    assert_eq!(config.api.timeout_seconds, 10);
    assert_eq!(config.api.max_attempts, 4);
    assert_eq!(config.api.access_token.as_deref(), Some("json-token"));
    assert_eq!(config.horizon.days, 180);
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "artistcal.toml",
        r#"
[api]
base_url = "http://localhost:1337/api"

[horizon]
enabled = false
"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from TOML file");

    assert_eq!(config.api.base_url, "http://localhost:1337/api");
    assert_eq!(config.api.access_token, None);
    assert_eq!(config.horizon.days, 365);
    assert!(!config.horizon.enabled);
}

#[test]
fn test_file_failing_validation_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "config.toml", "[horizon]\ndays = 0\n");

    let result = config::load_from_file(Some(path));
    assert!(matches!(result, Err(CalendarError::Config(_))));
}

#[test]
fn test_missing_file_is_config_error() {
    let result = config::load_from_file(Some(PathBuf::from("/nonexistent/artistcal.toml")));
    assert!(matches!(result, Err(CalendarError::Config(_))));
}

#[test]
#[serial]
fn test_load_from_env_with_all_variables() {
    let _env = EnvGuard::clean();
    std::env::set_var("ARTISTCAL_API_BASE_URL", "https://cms.example.com/api");
    std::env::set_var("ARTISTCAL_API_TOKEN", "env-token");
    std::env::set_var("ARTISTCAL_API_TIMEOUT", "12");
    std::env::set_var("ARTISTCAL_API_MAX_ATTEMPTS", "5");
    std::env::set_var("ARTISTCAL_HORIZON_DAYS", "90");
    std::env::set_var("ARTISTCAL_HORIZON_ENABLED", "off");

    let config = config::load_from_env().expect("Should load config from env vars");

    assert_eq!(config.api.base_url, "https://cms.example.com/api");
    assert_eq!(config.api.access_token.as_deref(), Some("env-token"));
    assert_eq!(config.api.timeout_seconds, 12);
    assert_eq!(config.api.max_attempts, 5);
    assert_eq!(config.horizon.days, 90);
    assert!(!config.horizon.enabled);
}

#[test]
#[serial]
fn test_load_from_env_defaults_optional_variables() {
    let _env = EnvGuard::clean();
    std::env::set_var("ARTISTCAL_API_BASE_URL", "https://cms.example.com/api");

    let config = config::load_from_env().unwrap();

    assert_eq!(config.api.access_token, None);
    assert_eq!(config.horizon.days, 365);
    assert!(config.horizon.enabled);
}

#[test]
#[serial]
fn test_load_from_env_requires_base_url() {
    let _env = EnvGuard::clean();

    let result = config::load_from_env();
    match result {
        Err(CalendarError::Config(msg)) => assert!(msg.contains("ARTISTCAL_API_BASE_URL")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_load_from_env_rejects_invalid_values() {
    let _env = EnvGuard::clean();
    std::env::set_var("ARTISTCAL_API_BASE_URL", "https://cms.example.com/api");
    std::env::set_var("ARTISTCAL_HORIZON_DAYS", "a year");
    assert!(matches!(config::load_from_env(), Err(CalendarError::Config(_))));

    std::env::set_var("ARTISTCAL_HORIZON_DAYS", "0");
    assert!(matches!(config::load_from_env(), Err(CalendarError::Config(_))));

    std::env::remove_var("ARTISTCAL_HORIZON_DAYS");
    std::env::set_var("ARTISTCAL_API_BASE_URL", "definitely not a url");
    assert!(matches!(config::load_from_env(), Err(CalendarError::Config(_))));
}

#[test]
#[serial]
fn test_load_prefers_environment() {
    let _env = EnvGuard::clean();
    std::env::set_var("ARTISTCAL_API_BASE_URL", "https://from-env.example.com/api");

    let config = config::load().unwrap();
    assert_eq!(config.api.base_url, "https://from-env.example.com/api");
}
