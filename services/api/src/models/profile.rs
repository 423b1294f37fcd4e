//! Profile models

use catalog::models::null_as_empty;
use serde::{Deserialize, Serialize};

use crate::models::LibraryEntry;

/// Public profile of a user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bio: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub avatar_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub wishlist: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub library: Vec<LibraryEntry>,
}

/// Body of `POST /profile/{id}/update`; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
    }
}
