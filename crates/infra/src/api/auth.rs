//! Bearer credential supply
//!
//! The API client asks an [`AccessTokenProvider`] for a token before every
//! request. Token acquisition and refresh belong to the auth collaborator;
//! [`StaticTokenProvider`] covers configured tokens and tests.

use async_trait::async_trait;

use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    ///
    /// This method should handle token refresh if needed.
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// Provider returning a fixed token
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    /// Build from an optional configured token.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if no token is configured or it is blank.
    pub fn from_config(token: Option<&str>) -> Result<Self, ApiError> {
        match token.map(str::trim) {
            Some(token) if !token.is_empty() => Ok(Self::new(token)),
            _ => Err(ApiError::Config("no API access token configured".to_string())),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.token.clone())
    }
}
