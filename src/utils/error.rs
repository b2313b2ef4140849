//! Error types and handling
//!
//! Common error types used across the plugin.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plugin-wide error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("Platform unsupported: {0}")]
    PlatformUnsupported(String),

    #[error("Listener not found: {0}")]
    NotFound(String),

    #[error("Observer creation failed: {0}")]
    ObserverCreationFailed(String),

    #[error("Permission query failed: {0}")]
    QueryFailed(String),

    #[error("Permission request failed: {0}")]
    RequestFailed(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Event emit failed: {0}")]
    EventEmitFailed(String),
}

impl PermissionError {
    /// Stable code the frontend can match on
    pub fn code(&self) -> &'static str {
        match self {
            PermissionError::PlatformUnsupported(_) => "PLATFORM_UNSUPPORTED",
            PermissionError::NotFound(_) => "NOT_FOUND",
            PermissionError::ObserverCreationFailed(_) => "OBSERVER_CREATION_FAILED",
            PermissionError::QueryFailed(_) => "QUERY_FAILED",
            PermissionError::RequestFailed(_) => "REQUEST_FAILED",
            PermissionError::PermissionDenied(_) => "PERMISSION_DENIED",
            PermissionError::EventEmitFailed(_) => "EVENT_EMIT_FAILED",
        }
    }
}

/// Error response for frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<PermissionError> for ErrorResponse {
    fn from(error: PermissionError) -> Self {
        ErrorResponse {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using PermissionError
pub type PermissionResult<T> = Result<T, PermissionError>;
