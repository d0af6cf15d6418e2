//! API-specific error types
//!
//! Provides error classification for API operations with retry metadata.

use std::time::Duration;

use artistcal_domain::CalendarError;
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403) - retry after token refresh
    Authentication,
    /// The principal has no artist yet - heal by ensuring the link
    Link,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth) - non-retryable
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Configuration errors - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Artist link missing: {0}")]
    LinkMissing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::LinkMissing(_) => ApiErrorCategory::Link,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) | Self::NotFound(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Check if this error should be retried
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::Authentication
                | ApiErrorCategory::RateLimit
                | ApiErrorCategory::Server
                | ApiErrorCategory::Network
        )
    }

    /// Get suggested retry delay in seconds
    pub fn retry_delay_secs(&self) -> u64 {
        match self.category() {
            ApiErrorCategory::Authentication => 5,
            ApiErrorCategory::RateLimit => 60,
            ApiErrorCategory::Server => 10,
            ApiErrorCategory::Network => 5,
            ApiErrorCategory::Link | ApiErrorCategory::Client | ApiErrorCategory::Config => 0,
        }
    }
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::Network(message) => Self::Network(message),
            CalendarError::Server(message) => Self::Server(message),
            CalendarError::Auth(message) => Self::Auth(message),
            CalendarError::LinkMissing(message) => Self::LinkMissing(message),
            CalendarError::NotFound(message) => Self::NotFound(message),
            CalendarError::Config(message) => Self::Config(message),
            other => Self::Client(other.to_string()),
        }
    }
}

impl From<ApiError> for CalendarError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(message) => Self::Auth(message),
            ApiError::LinkMissing(message) => Self::LinkMissing(message),
            ApiError::NotFound(message) => Self::NotFound(message),
            ApiError::RateLimit(message) | ApiError::Network(message) => Self::Network(message),
            ApiError::Server(message) => Self::Server(message),
            ApiError::Client(message) => Self::InvalidInput(message),
            ApiError::Config(message) => Self::Config(message),
            ApiError::Timeout(after) => Self::Network(format!("request timed out after {after:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(ApiError::Auth("test".to_string()).category(), ApiErrorCategory::Authentication);
        assert_eq!(ApiError::LinkMissing("test".to_string()).category(), ApiErrorCategory::Link);
        assert_eq!(ApiError::RateLimit("test".to_string()).category(), ApiErrorCategory::RateLimit);
        assert_eq!(ApiError::Server("test".to_string()).category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::NotFound("test".to_string()).category(), ApiErrorCategory::Client);
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(1)).category(),
            ApiErrorCategory::Network
        );
    }

    #[test]
    fn test_should_retry() {
        assert!(ApiError::Auth("test".to_string()).should_retry());
        assert!(ApiError::Server("test".to_string()).should_retry());
        assert!(ApiError::Network("test".to_string()).should_retry());
        assert!(!ApiError::LinkMissing("test".to_string()).should_retry());
        assert!(!ApiError::Client("test".to_string()).should_retry());
        assert!(!ApiError::Config("test".to_string()).should_retry());
    }

    #[test]
    fn test_retry_delays() {
        assert_eq!(ApiError::RateLimit("test".to_string()).retry_delay_secs(), 60);
        assert_eq!(ApiError::Server("test".to_string()).retry_delay_secs(), 10);
        assert_eq!(ApiError::LinkMissing("test".to_string()).retry_delay_secs(), 0);
    }

    #[test]
    fn link_missing_survives_domain_conversion() {
        let domain: CalendarError = ApiError::LinkMissing("no artist".into()).into();
        assert!(domain.is_link_missing());

        let back: ApiError = domain.into();
        assert!(matches!(back, ApiError::LinkMissing(_)));
    }

    #[test]
    fn rate_limit_is_reported_as_network() {
        let domain: CalendarError = ApiError::RateLimit("slow down".into()).into();
        assert!(matches!(domain, CalendarError::Network(_)));
        assert!(domain.is_retryable());
    }
}
