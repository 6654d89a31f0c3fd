//! Error types.

use thiserror::Error;

/// The main error type for chatty operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The two participants cannot form a conversation.
    #[error("Invalid participants: {0}")]
    InvalidParticipants(String),

    /// Invalid argument passed to an API method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation requires a signed-in user but none was provided.
    #[error("Authentication required")]
    AuthRequired,

    /// The remote store refused access to a path.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The remote store failed to complete an operation.
    #[error("Store error: {0}")]
    Store(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The subscription was released or the store went away.
    #[error("Subscription closed")]
    Closed,
}

impl Error {
    /// Create an invalid participants error.
    pub fn participants(msg: impl Into<String>) -> Self {
        Error::InvalidParticipants(msg.into())
    }

    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    /// Check if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::AuthRequired | Error::PermissionDenied(_))
    }
}

/// Result type alias for chatty operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::participants("u1 and u1 are the same user");
        assert_eq!(
            format!("{}", e),
            "Invalid participants: u1 and u1 are the same user"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(Error::store("connection reset").is_retryable());
        assert!(!Error::PermissionDenied("users".into()).is_retryable());
    }

    #[test]
    fn test_auth_error() {
        assert!(Error::AuthRequired.is_auth_error());
        assert!(Error::PermissionDenied("chats".into()).is_auth_error());
        assert!(!Error::Closed.is_auth_error());
    }
}
