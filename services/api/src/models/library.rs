//! Library (watchlist) models

use catalog::MediaItem;
use catalog::models::{null_as_empty, string_or_number};
use serde::{Deserialize, Serialize};

/// One item in a user's library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub year: String,
    #[serde(rename = "coverUrl", default, deserialize_with = "null_as_empty")]
    pub cover_url: String,
}

impl From<&MediaItem> for LibraryEntry {
    fn from(item: &MediaItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            media_type: item.media_type.to_string(),
            year: item.year.clone().unwrap_or_default(),
            cover_url: item.cover_url.clone(),
        }
    }
}
