//! Custom error types for the common library
//!
//! This module defines the failure taxonomy shared by every client crate.
//! Each user-triggered action ends in one of these variants, which is then
//! turned into a [`Notice`](crate::notice::Notice) for display.

use thiserror::Error;

/// HTTP status the backend uses for duplicate ratings and library entries
pub const CONFLICT_STATUS: u16 = 409;

/// Custom error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request could not be completed (connection refused, timeout, ...)
    #[error("Backend not reachable: {0}")]
    NetworkUnreachable(String),

    /// The backend answered with a non-success status
    #[error("Server rejected request (HTTP {status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// A local precondition failed and no request was issued
    #[error("{0}")]
    ValidationFailed(String),

    /// A success response carried a body we could not decode
    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration error
    #[error("Client configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Shorthand for a local validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::ValidationFailed(message.into())
    }

    /// True when the backend reported a duplicate (HTTP 409)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ClientError::ServerRejected { status, .. } if *status == CONFLICT_STATUS
        )
    }

    /// True when the failure was detected locally, before any request
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::ValidationFailed(_))
    }

    /// The backend's own message for rejected requests
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::ServerRejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Type alias for Result with ClientError
pub type ClientResult<T> = Result<T, ClientError>;
