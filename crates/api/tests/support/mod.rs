#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use artistcal_core::LocalClock;
use artistcal_domain::Config;
use artistcal_infra::api::{
    ApiClient, ApiClientConfig, HttpAvailabilityBackend, StaticTokenProvider,
};
use artistcal_lib::AppContext;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const ARTIST_ID: i64 = 7;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Clock pinned to noon of a given day
pub struct FixedClock(Mutex<NaiveDateTime>);

impl FixedClock {
    pub fn on(day: &str) -> Arc<Self> {
        Arc::new(Self(Mutex::new(date(day).and_hms_opt(12, 0, 0).unwrap())))
    }
}

impl LocalClock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}

pub fn config_for(server: &MockServer, horizon_enabled: bool) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.access_token = Some("test-token".into());
    config.api.max_attempts = 1;
    config.horizon.enabled = horizon_enabled;
    config
}

/// Build a context whose backend talks HTTP to `server` and whose clock is
/// pinned to `today`.
pub async fn context_for(
    server: &MockServer,
    today: &str,
    horizon_enabled: bool,
) -> Arc<AppContext> {
    let config = config_for(server, horizon_enabled);
    let client = ApiClient::new(
        ApiClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            max_attempts: 1,
        },
        Arc::new(StaticTokenProvider::new("test-token")),
    )
    .unwrap();
    let backend = Arc::new(HttpAvailabilityBackend::new(Arc::new(client)));

    Arc::new(
        AppContext::with_backend(config, backend, FixedClock::on(today))
            .await
            .expect("failed to create test context"),
    )
}

pub async fn mount_link(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/artists/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": ARTIST_ID })))
        .mount(server)
        .await;
}

pub async fn mount_listing(server: &MockServer, dates: &[&str]) {
    let data: Vec<_> = dates
        .iter()
        .enumerate()
        .map(|(i, d)| json!({ "id": 100 + i as i64, "date": d, "artistId": ARTIST_ID }))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/artists/{ARTIST_ID}/availabilities")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// Creates echo the posted date back with a fresh id.
pub async fn mount_creates(server: &MockServer) {
    let next_id = Arc::new(AtomicI64::new(500));
    Mock::given(method("POST"))
        .and(path(format!("/artists/{ARTIST_ID}/availabilities")))
        .respond_with(move |request: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            let id = next_id.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(201).set_body_json(json!({
                "id": id,
                "date": body["date"],
                "artistId": ARTIST_ID
            }))
        })
        .mount(server)
        .await;
}

pub async fn mount_deletes(server: &MockServer) {
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

pub async fn posted_dates(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path().ends_with("/availabilities"))
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["date"].as_str().unwrap_or_default().to_string()
        })
        .collect()
}
