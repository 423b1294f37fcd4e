//! Community thread and comment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::parse_timestamp;

/// Content the backend leaves behind when a comment is removed
pub const DELETED_COMMENT: &str = "Comment has been deleted";

/// Discussion thread
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Thread {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Identifiers of the thread's comments
    #[serde(default)]
    pub comments: Vec<String>,
}

impl Thread {
    pub fn author(&self) -> String {
        self.username.clone().unwrap_or_else(|| {
            format!("User {}", self.user_id.as_deref().unwrap_or("unknown"))
        })
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or("General")
    }
}

/// Body of `POST /threads` and `PUT /threads/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct NewThread {
    pub title: String,
    pub content: String,
    pub user_id: String,
}

/// Comment on a thread
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

impl Comment {
    pub fn is_deleted(&self) -> bool {
        self.deleted || self.content == DELETED_COMMENT
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.date_created.as_deref().and_then(parse_timestamp)
    }
}

/// Body of `POST /comments`
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub content: String,
    pub thread_id: String,
    pub user_id: String,
}
