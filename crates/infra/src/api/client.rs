//! Authenticated JSON API client
//!
//! Wraps [`HttpClient`] with bearer authentication, base-URL handling, and
//! status-to-error mapping. Responses carrying a "not linked" indication are
//! reported as [`ApiError::LinkMissing`] so the caller can heal the link.

use std::sync::Arc;
use std::time::Duration;

use artistcal_domain::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_API_MAX_ATTEMPTS, DEFAULT_API_TIMEOUT_SECS,
};
use artistcal_domain::{ApiConfig, CalendarError};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::HttpClient;

/// Body fragments the backend uses to say the principal has no artist yet
const LINK_MISSING_MARKERS: &[&str] = &["not linked", "no artist", "artist_not_linked"];

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "https://cms.example.com/api")
    pub base_url: String,
    /// Timeout for a single HTTP attempt
    pub timeout: Duration,
    /// Attempts for idempotent requests
    pub max_attempts: usize,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            max_attempts: DEFAULT_API_MAX_ATTEMPTS,
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
            max_attempts: config.max_attempts,
        }
    }
}

/// API client with bearer authentication
pub struct ApiClient {
    http_client: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the HTTP client cannot be built
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts)
            .user_agent(concat!("artistcal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        Ok(Self { http_client, auth, config })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Execute a GET request
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    /// Execute a POST request with a JSON body
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let body_json = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("Failed to serialize body: {}", e)))?;
        self.execute(Method::POST, path, Some(body_json)).await
    }

    /// Execute a DELETE request, discarding any response body
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.execute(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<R, ApiError> {
        let url = self.url(path);
        debug!(%method, url = %url, "API request");

        let token = self.auth.access_token().await?;
        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header("Accept", "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        // Covers every attempt plus backoff
        let overall =
            self.config.timeout.saturating_mul(self.config.max_attempts.max(1) as u32 + 1);
        let response = match tokio::time::timeout(overall, self.http_client.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(Self::map_calendar_error(err)),
            Err(_) => return Err(ApiError::Timeout(overall)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = Self::map_status_error(status, &url, body);
            warn!(
                %method,
                path = %path,
                %status,
                category = ?err.category(),
                retryable = err.should_retry(),
                retry_after_secs = err.retry_delay_secs(),
                "API request failed"
            );
            return Err(err);
        }

        // Handle 204/205 No Content responses
        let result: R = if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Client(format!(
                    "No content response ({}), but response type cannot be deserialized from empty body",
                    status.as_u16()
                ))
            })?
        } else {
            response
                .json()
                .await
                .map_err(|e| ApiError::Server(format!("Failed to parse response: {}", e)))?
        };

        debug!(%method, path = %path, %status, "API request successful");
        Ok(result)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn map_status_error(status: StatusCode, url: &str, body: String) -> ApiError {
        let message = if body.is_empty() {
            format!("{} returned status {}", url, status)
        } else {
            format!("{} returned status {}: {}", url, status, body)
        };

        let link_class = matches!(status.as_u16(), 400 | 401 | 403 | 404);
        if link_class && indicates_missing_link(&body) {
            ApiError::LinkMissing(message)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ApiError::Auth(message)
        } else if status == StatusCode::NOT_FOUND {
            ApiError::NotFound(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            ApiError::RateLimit(message)
        } else if status.is_server_error() {
            ApiError::Server(message)
        } else if status.is_client_error() {
            ApiError::Client(message)
        } else {
            ApiError::Network(message)
        }
    }

    fn map_calendar_error(err: CalendarError) -> ApiError {
        ApiError::from(err)
    }
}

fn indicates_missing_link(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    LINK_MISSING_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let auth =
            self.auth.ok_or_else(|| ApiError::Config("Auth provider not set".to_string()))?;

        ApiClient::new(config, auth)
    }
}
