//! Authentication context passed into every user-scoped operation

use serde::{Deserialize, Serialize};

/// An authenticated user and the bearer token issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub token: String,
}

/// Either an authenticated identity or anonymous
///
/// Held by the caller for the lifetime of a session and handed to the
/// reconcilers explicitly; nothing here is process-global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    identity: Option<Identity>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity {
                user_id: user_id.into(),
                token: token.into(),
            }),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.user_id.as_str())
    }

    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// True when the context belongs to `owner`; anonymous owns nothing
    pub fn owns(&self, owner: Option<&str>) -> bool {
        match (self.user_id(), owner) {
            (Some(me), Some(owner)) => me == owner,
            _ => false,
        }
    }
}
