//! Client error types

use shared::store::StoreError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote side throttled the request
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => StoreError::Unavailable(e.to_string()),
            ClientError::Internal(msg) | ClientError::RateLimited(msg) => {
                StoreError::Unavailable(msg)
            }
            ClientError::NotFound(msg) => StoreError::Rejected(format!("not found: {}", msg)),
            ClientError::Unauthorized => StoreError::Rejected("unauthorized".to_string()),
            ClientError::Forbidden(msg) | ClientError::Validation(msg) => {
                StoreError::Rejected(msg)
            }
            ClientError::InvalidResponse(msg) => StoreError::InvalidDocument(msg),
            ClientError::Serialization(e) => StoreError::InvalidDocument(e.to_string()),
        }
    }
}
