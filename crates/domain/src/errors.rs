//! Error types used throughout the availability calendar

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the availability calendar
///
/// Serialized as `{ "type": ..., "message": ... }` so the calendar view can
/// branch on the variant without parsing the message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CalendarError {
    /// The principal has no backend resource yet. Recoverable through the
    /// ensure-and-retry-once heal path.
    #[error("Resource link missing: {0}")]
    LinkMissing(String),

    /// The heal path was attempted and the operation still cannot proceed.
    #[error("Currently unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Another call for the same date is still in flight.
    #[error("Mutation pending: {0}")]
    Pending(String),

    /// A bulk action is already running.
    #[error("Busy: {0}")]
    Busy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CalendarError {
    /// True for the "not linked" class of failures that trigger a heal.
    pub fn is_link_missing(&self) -> bool {
        matches!(self, Self::LinkMissing(_))
    }

    /// Whether the user should be offered a retry affordance.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server(_) | Self::Unavailable(_) | Self::Pending(_))
    }

    /// Stable label suitable for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LinkMissing(_) => "link_missing",
            Self::Unavailable(_) => "unavailable",
            Self::Network(_) => "network",
            Self::Server(_) => "server",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Pending(_) => "pending",
            Self::Busy(_) => "busy",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for availability calendar operations
pub type Result<T> = std::result::Result<T, CalendarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = CalendarError::LinkMissing("artist not linked".into());
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["type"], "LinkMissing");
        assert_eq!(json["message"], "artist not linked");

        let back: CalendarError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn classifies_retryable_errors() {
        assert!(CalendarError::Network("down".into()).is_retryable());
        assert!(CalendarError::Unavailable("heal failed".into()).is_retryable());
        assert!(!CalendarError::InvalidInput("past date".into()).is_retryable());
        assert!(!CalendarError::Busy("batch".into()).is_retryable());
    }

    #[test]
    fn only_link_missing_triggers_heal() {
        assert!(CalendarError::LinkMissing("x".into()).is_link_missing());
        assert!(!CalendarError::Auth("x".into()).is_link_missing());
        assert!(!CalendarError::NotFound("x".into()).is_link_missing());
    }
}
