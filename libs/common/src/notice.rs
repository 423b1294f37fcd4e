//! User-visible notices
//!
//! Every action a user triggers ends with exactly one notice, either a
//! confirmation or a failure. Rendering (alert box, status line, ...) is up
//! to the caller.

use std::fmt;

use crate::error::{CONFLICT_STATUS, ClientError, ClientResult};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// Message shown to the user after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.level == NoticeLevel::Failure
    }

    /// Collapse an action's result into the notice the user sees
    pub fn from_result(result: ClientResult<Notice>) -> Notice {
        result.unwrap_or_else(|err| Notice::from(&err))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&ClientError> for Notice {
    fn from(err: &ClientError) -> Self {
        let message = match err {
            ClientError::ValidationFailed(msg) => msg.clone(),
            // Reconcilers rewrite conflicts into guidance for the user
            ClientError::ServerRejected { status, message } if *status == CONFLICT_STATUS => {
                message.clone()
            }
            ClientError::ServerRejected { message, .. } => format!("Server says: {message}"),
            ClientError::NetworkUnreachable(_) => {
                "Server not reachable. Please try again later.".to_string()
            }
            other => other.to_string(),
        };
        Notice::failure(message)
    }
}

impl From<ClientError> for Notice {
    fn from(err: ClientError) -> Self {
        Notice::from(&err)
    }
}
