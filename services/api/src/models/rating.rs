//! Rating models

use catalog::MediaItem;
use catalog::models::{null_as_empty, string_or_number};
use serde::{Deserialize, Serialize};

/// A rating stored by the backend, as listed under `/profile/{id}/ratings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    /// Server-assigned identifier; `_id` in older payloads
    #[serde(default, alias = "_id")]
    pub rating_id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub media_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cover_url: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub media_type: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stars: u8,
    #[serde(rename = "review_text", default, deserialize_with = "null_as_empty")]
    pub review: String,
    #[serde(default)]
    pub date_created: Option<String>,
    /// Owner of the rating
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body of `POST /ratings`
#[derive(Debug, Clone, Serialize)]
pub struct NewRating {
    pub user_id: String,
    pub media_id: String,
    pub title: String,
    pub cover_url: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub year: Option<String>,
    pub stars: u8,
    pub review_text: String,
}

impl NewRating {
    pub fn for_item(user_id: &str, item: &MediaItem, stars: u8, review: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            media_id: item.id.clone(),
            title: item.title.clone(),
            cover_url: item.cover_url.clone(),
            media_type: item.media_type.to_string(),
            year: item.year.clone(),
            stars,
            review_text: review.to_string(),
        }
    }

    /// The record the backend holds once this payload is accepted
    pub fn into_record(self, rating_id: String) -> RatingRecord {
        RatingRecord {
            rating_id: Some(rating_id),
            media_id: self.media_id,
            title: self.title,
            cover_url: self.cover_url,
            media_type: self.media_type,
            year: self.year,
            stars: self.stars,
            review: self.review_text,
            date_created: None,
            user_id: Some(self.user_id),
        }
    }
}

/// Body of `PUT /ratings/{rating_id}`
#[derive(Debug, Clone, Serialize)]
pub struct RatingUpdate {
    pub stars: u8,
    pub review_text: String,
}

/// Response of `POST /ratings`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRating {
    pub rating_id: String,
}
