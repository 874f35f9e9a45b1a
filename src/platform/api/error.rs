//! Error types for the platform and code-host API clients
//!
//! Both clients speak JSON over HTTP and share the same status taxonomy.

use thiserror::Error;

/// Errors that can occur when talking to the platform API or GitHub
#[derive(Debug, Error)]
pub enum PlatformApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse the API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// No session token, or the token was rejected
    #[error("Not authenticated - run `prov-ctl auth login` first")]
    Unauthorized,

    /// Requested resource was not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// User does not have permission for the requested operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded - please try again later")]
    RateLimited,

    /// Server error
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code (5xx)
        status: u16,
        /// Error message
        message: String,
    },
}

impl PlatformApiError {
    /// Map a non-success status and its already-extracted message to an error
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => PlatformApiError::Unauthorized,
            403 => PlatformApiError::PermissionDenied(message),
            404 => PlatformApiError::NotFound(message),
            429 => PlatformApiError::RateLimited,
            500..=599 => PlatformApiError::ServerError { status, message },
            _ => PlatformApiError::ApiError { status, message },
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, PlatformApiError>;
