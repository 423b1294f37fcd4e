//! Rating reconciliation
//!
//! Each media identifier is `Unrated`, `Draft` or `Persisted`. Network calls
//! happen in [`RatingReconciler::submit`] and [`RatingReconciler::delete`];
//! only after the backend confirms a write is the matching
//! [`RatingTransition`] applied. A failed call leaves the map untouched.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use auth::AuthContext;
use catalog::MediaItem;
use common::http::{execute, fetch_json};
use common::{ApiRequest, ClientError, ClientResult, Notice, Transport};

use crate::models::{CreatedRating, NewRating, RatingRecord, RatingUpdate};

pub const LOGIN_REQUIRED: &str = "Please log in to rate items.";
pub const STARS_REQUIRED: &str = "Please select a star rating first.";
pub const ALREADY_RATED: &str =
    "You already rated this item. You can edit or delete it from your profile.";

/// Lowest and highest selectable star counts
pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

/// Where a media item stands for the current user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingState {
    Unrated,
    /// A rating form is open; any persisted record is still in place
    Draft,
    Persisted,
}

/// Unsaved star/review pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingDraft {
    pub stars: u8,
    pub review: String,
}

/// A confirmed change to apply to the local map
#[derive(Debug, Clone, PartialEq)]
pub enum RatingTransition {
    /// Replace everything with a fresh server read
    Seeded(Vec<RatingRecord>),
    Created(RatingRecord),
    Updated {
        media_id: String,
        stars: u8,
        review: String,
    },
    Deleted { media_id: String },
}

/// Local view of the user's ratings
#[derive(Debug, Default)]
pub struct RatingReconciler {
    records: HashMap<String, RatingRecord>,
    drafts: HashMap<String, RatingDraft>,
}

impl RatingReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a confirmed transition
    pub fn apply(&mut self, transition: RatingTransition) {
        match transition {
            RatingTransition::Seeded(records) => {
                self.drafts.clear();
                self.records = records
                    .into_iter()
                    .map(|record| (record.media_id.clone(), record))
                    .collect();
            }
            RatingTransition::Created(record) => {
                self.drafts.remove(&record.media_id);
                self.records.insert(record.media_id.clone(), record);
            }
            RatingTransition::Updated {
                media_id,
                stars,
                review,
            } => {
                self.drafts.remove(&media_id);
                if let Some(record) = self.records.get_mut(&media_id) {
                    record.stars = stars;
                    record.review = review;
                }
            }
            RatingTransition::Deleted { media_id } => {
                self.drafts.remove(&media_id);
                self.records.remove(&media_id);
            }
        }
    }

    pub fn state(&self, media_id: &str) -> RatingState {
        if self.drafts.contains_key(media_id) {
            RatingState::Draft
        } else if self.records.contains_key(media_id) {
            RatingState::Persisted
        } else {
            RatingState::Unrated
        }
    }

    pub fn record(&self, media_id: &str) -> Option<&RatingRecord> {
        self.records.get(media_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &RatingRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn draft(&self, media_id: &str) -> Option<&RatingDraft> {
        self.drafts.get(media_id)
    }

    /// Open the rating form, seeded from the persisted record if any
    pub fn open_draft(&mut self, media_id: &str) -> &mut RatingDraft {
        let seed = self
            .records
            .get(media_id)
            .map(|record| RatingDraft {
                stars: record.stars,
                review: record.review.clone(),
            })
            .unwrap_or_default();
        self.drafts.entry(media_id.to_string()).or_insert(seed)
    }

    /// Mutable access to an open draft
    pub fn draft_mut(&mut self, media_id: &str) -> Option<&mut RatingDraft> {
        self.drafts.get_mut(media_id)
    }

    /// Close the form without saving
    pub fn cancel_draft(&mut self, media_id: &str) -> Option<RatingDraft> {
        self.drafts.remove(media_id)
    }

    /// Whether edit/delete may be offered for `media_id`
    pub fn can_modify(&self, media_id: &str, auth: &AuthContext) -> bool {
        self.records
            .get(media_id)
            .is_some_and(|record| auth.owns(record.user_id.as_deref()))
    }

    /// Replace the map with the user's ratings from the backend
    pub async fn load<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
    ) -> ClientResult<usize> {
        let Some(user_id) = auth.user_id() else {
            return Err(ClientError::validation(LOGIN_REQUIRED));
        };

        let request = ApiRequest::get(format!("/profile/{user_id}/ratings")).bearer(auth.token());
        let records: Option<Vec<RatingRecord>> = fetch_json(transport, request).await?;
        let records: Vec<RatingRecord> = records
            .unwrap_or_default()
            .into_iter()
            .map(|mut record| {
                // listed under the user's profile, so the user owns them
                record.user_id.get_or_insert_with(|| user_id.to_string());
                record
            })
            .collect();

        let count = records.len();
        self.apply(RatingTransition::Seeded(records));
        info!("Loaded {} ratings for user {}", count, user_id);
        Ok(count)
    }

    /// Save the open draft for `item`
    ///
    /// Creates a rating when none is persisted, otherwise updates it.
    /// Authentication and star selection are checked before any request.
    pub async fn submit<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        item: &MediaItem,
    ) -> ClientResult<Notice> {
        let Some(user_id) = auth.user_id() else {
            return Err(ClientError::validation(LOGIN_REQUIRED));
        };

        let draft = self.drafts.get(&item.id).cloned().unwrap_or_default();
        if draft.stars == 0 {
            return Err(ClientError::validation(STARS_REQUIRED));
        }
        if !(MIN_STARS..=MAX_STARS).contains(&draft.stars) {
            return Err(ClientError::validation(format!(
                "Star rating must be between {MIN_STARS} and {MAX_STARS}."
            )));
        }

        if let Some(record) = self.records.get(&item.id) {
            if !auth.owns(record.user_id.as_deref()) {
                return Err(ClientError::validation("You can only edit your own ratings."));
            }
            let Some(rating_id) = record.rating_id.clone() else {
                return Err(ClientError::validation(
                    "This rating has not been saved yet and cannot be updated.",
                ));
            };
            return self.update(transport, auth, &item.id, &rating_id, draft).await;
        }

        let payload = NewRating::for_item(user_id, item, draft.stars, &draft.review);
        let request = ApiRequest::post("/ratings")
            .bearer(auth.token())
            .json(&payload)?;

        let created: CreatedRating = fetch_json(transport, request).await.map_err(|e| {
            if e.is_conflict() {
                warn!("User {} already rated {}: {}", user_id, item.id, e);
                ClientError::ServerRejected {
                    status: common::error::CONFLICT_STATUS,
                    message: ALREADY_RATED.to_string(),
                }
            } else {
                warn!("Failed to create rating for {}: {}", item.id, e);
                e
            }
        })?;

        info!("Created rating {} for {}", created.rating_id, item.id);
        self.apply(RatingTransition::Created(payload.into_record(created.rating_id)));
        Ok(Notice::success("Thanks for rating!"))
    }

    async fn update<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        media_id: &str,
        rating_id: &str,
        draft: RatingDraft,
    ) -> ClientResult<Notice> {
        let payload = RatingUpdate {
            stars: draft.stars,
            review_text: draft.review,
        };
        let request = ApiRequest::put(format!("/ratings/{rating_id}"))
            .bearer(auth.token())
            .json(&payload)?;

        execute(transport, request).await.map_err(|e| {
            warn!("Failed to update rating {}: {}", rating_id, e);
            e
        })?;

        debug!("Updated rating {} to {} stars", rating_id, payload.stars);
        self.apply(RatingTransition::Updated {
            media_id: media_id.to_string(),
            stars: payload.stars,
            review: payload.review_text,
        });
        Ok(Notice::success("Rating updated!"))
    }

    /// Delete the persisted rating for `media_id`
    pub async fn delete<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        media_id: &str,
    ) -> ClientResult<Notice> {
        if !auth.is_authenticated() {
            return Err(ClientError::validation(LOGIN_REQUIRED));
        }
        let Some(record) = self.records.get(media_id) else {
            return Err(ClientError::validation("There is no rating to delete."));
        };
        if !auth.owns(record.user_id.as_deref()) {
            return Err(ClientError::validation("You can only delete your own ratings."));
        }
        let Some(rating_id) = record.rating_id.clone() else {
            return Err(ClientError::validation("There is no rating to delete."));
        };

        let request = ApiRequest::delete(format!("/ratings/{rating_id}")).bearer(auth.token());
        execute(transport, request).await.map_err(|e| {
            warn!("Failed to delete rating {}: {}", rating_id, e);
            e
        })?;

        info!("Deleted rating {} for {}", rating_id, media_id);
        self.apply(RatingTransition::Deleted {
            media_id: media_id.to_string(),
        });
        Ok(Notice::success("Deleted!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::sample::sample_items;
    use common::ApiResponse;
    use common::stub::StubTransport;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn halo() -> MediaItem {
        sample_items().remove(0)
    }

    fn user() -> AuthContext {
        AuthContext::authenticated("user123", "token_user123")
    }

    fn persisted(media_id: &str, owner: &str) -> RatingRecord {
        RatingRecord {
            rating_id: Some("r1".to_string()),
            media_id: media_id.to_string(),
            title: "Halo: Combat Evolved".to_string(),
            cover_url: String::new(),
            media_type: "Game".to_string(),
            year: None,
            stars: 3,
            review: "Solid".to_string(),
            date_created: None,
            user_id: Some(owner.to_string()),
        }
    }

    #[test]
    fn test_draft_lifecycle_without_network() {
        let mut ratings = RatingReconciler::new();
        assert_eq!(ratings.state("1"), RatingState::Unrated);

        let draft = ratings.open_draft("1");
        assert_eq!(*draft, RatingDraft::default());
        assert_eq!(ratings.state("1"), RatingState::Draft);

        ratings.cancel_draft("1");
        assert_eq!(ratings.state("1"), RatingState::Unrated);
    }

    #[test]
    fn test_draft_is_seeded_from_persisted_record() {
        let mut ratings = RatingReconciler::new();
        ratings.apply(RatingTransition::Seeded(vec![persisted("1", "user123")]));

        let draft = ratings.open_draft("1");
        assert_eq!(draft.stars, 3);
        assert_eq!(draft.review, "Solid");

        ratings.cancel_draft("1");
        assert_eq!(ratings.state("1"), RatingState::Persisted);
    }

    #[tokio::test]
    async fn test_zero_stars_never_hits_network() {
        let stub = StubTransport::always(201, json!({"rating_id": "r9"}));
        let mut ratings = RatingReconciler::new();
        ratings.open_draft("1");

        let err = assert_err!(ratings.submit(&stub, &user(), &halo()).await);
        assert_eq!(err.to_string(), STARS_REQUIRED);
        assert_eq!(stub.request_count(), 0);
        assert_eq!(ratings.state("1"), RatingState::Draft);

        // no draft at all behaves the same
        let err = assert_err!(ratings.submit(&stub, &user(), &sample_items()[1]).await);
        assert!(err.is_validation());
        assert_eq!(ratings.state("2"), RatingState::Unrated);
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_stars_rejected() {
        let stub = StubTransport::always(201, json!({"rating_id": "r9"}));
        let mut ratings = RatingReconciler::new();
        ratings.open_draft("1").stars = 6;

        assert_err!(ratings.submit(&stub, &user(), &halo()).await);
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rating() {
        let stub = StubTransport::always(201, json!({"message": "Rating added", "rating_id": "r42"}));
        let mut ratings = RatingReconciler::new();
        let draft = ratings.open_draft("1");
        draft.stars = 4;
        draft.review = "Classic".to_string();

        let notice = assert_ok!(ratings.submit(&stub, &user(), &halo()).await);
        assert_eq!(notice, Notice::success("Thanks for rating!"));
        assert_eq!(ratings.state("1"), RatingState::Persisted);

        let record = ratings.record("1").expect("missing record");
        assert_eq!(record.rating_id.as_deref(), Some("r42"));
        assert_eq!(record.stars, 4);
        assert!(ratings.can_modify("1", &user()));

        let sent = stub.requests();
        assert_eq!(sent[0].method, "POST");
        assert_eq!(sent[0].path, "/ratings");
        assert_eq!(sent[0].bearer.as_deref(), Some("token_user123"));
        let body = sent[0].body.as_ref().expect("missing body");
        assert_eq!(body["user_id"], "user123");
        assert_eq!(body["media_id"], "1");
        assert_eq!(body["type"], "Game");
        assert_eq!(body["stars"], 4);
        assert_eq!(body["review_text"], "Classic");
    }

    #[tokio::test]
    async fn test_conflict_leaves_no_entry() {
        let stub = StubTransport::always(409, json!({"error": "already_rated", "rating_id": "r1"}));
        let mut ratings = RatingReconciler::new();
        ratings.open_draft("1").stars = 5;

        let err = assert_err!(ratings.submit(&stub, &user(), &halo()).await);
        assert!(err.is_conflict());
        assert_eq!(Notice::from(&err).message, ALREADY_RATED);
        assert!(ratings.record("1").is_none());
        assert_eq!(ratings.state("1"), RatingState::Draft);
    }

    #[tokio::test]
    async fn test_update_existing_rating() {
        let stub = StubTransport::always(200, json!({"message": "Rating updated"}));
        let mut ratings = RatingReconciler::new();
        ratings.apply(RatingTransition::Seeded(vec![persisted("1", "user123")]));
        ratings.open_draft("1").stars = 5;

        let notice = assert_ok!(ratings.submit(&stub, &user(), &halo()).await);
        assert_eq!(notice.message, "Rating updated!");
        assert_eq!(ratings.record("1").map(|r| r.stars), Some(5));
        assert_eq!(ratings.record("1").map(|r| r.review.as_str()), Some("Solid"));

        let sent = stub.requests();
        assert_eq!(sent[0].method, "PUT");
        assert_eq!(sent[0].path, "/ratings/r1");
        assert_eq!(sent[0].body, Some(json!({"stars": 5, "review_text": "Solid"})));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_prior_state() {
        let stub = StubTransport::always(500, json!({"error": "server_error"}));
        let mut ratings = RatingReconciler::new();
        ratings.apply(RatingTransition::Seeded(vec![persisted("1", "user123")]));
        ratings.open_draft("1").stars = 1;

        let err = assert_err!(ratings.submit(&stub, &user(), &halo()).await);
        assert_eq!(Notice::from(&err).message, "Server says: server_error");
        assert_eq!(ratings.record("1").map(|r| r.stars), Some(3));
        assert_eq!(ratings.draft("1").map(|d| d.stars), Some(1));
    }

    #[tokio::test]
    async fn test_foreign_rating_cannot_be_changed() {
        let stub = StubTransport::always(200, json!({}));
        let mut ratings = RatingReconciler::new();
        ratings.apply(RatingTransition::Seeded(vec![persisted("1", "someone_else")]));
        assert!(!ratings.can_modify("1", &user()));

        ratings.open_draft("1").stars = 2;
        assert_err!(ratings.submit(&stub, &user(), &halo()).await);
        assert_err!(ratings.delete(&stub, &user(), "1").await);
        assert_eq!(stub.request_count(), 0);
        assert_eq!(ratings.state("1"), RatingState::Draft);
    }

    #[tokio::test]
    async fn test_delete_rating() {
        let stub = StubTransport::always(200, json!({"message": "Rating deleted"}));
        let mut ratings = RatingReconciler::new();
        ratings.apply(RatingTransition::Seeded(vec![persisted("1", "user123")]));

        let notice = assert_ok!(ratings.delete(&stub, &user(), "1").await);
        assert_eq!(notice.message, "Deleted!");
        assert_eq!(ratings.state("1"), RatingState::Unrated);
        assert_eq!(stub.requests()[0].path, "/ratings/r1");
        assert_eq!(stub.requests()[0].method, "DELETE");
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record() {
        let mut ratings = RatingReconciler::new();
        ratings.apply(RatingTransition::Seeded(vec![persisted("1", "user123")]));

        let err = assert_err!(ratings.delete(&StubTransport::unreachable(), &user(), "1").await);
        assert!(matches!(err, ClientError::NetworkUnreachable(_)));
        assert_eq!(ratings.state("1"), RatingState::Persisted);
    }

    #[tokio::test]
    async fn test_load_seeds_map_by_media_id() {
        let stub = StubTransport::new(|req| {
            assert_eq!(req.path, "/profile/user123/ratings");
            Ok(ApiResponse::json(
                200,
                &json!([
                    {"_id": "r1", "media_id": 740, "title": "Halo", "type": "Game",
                     "stars": 4, "review_text": "Great", "date_created": "2024-01-01T00:00:00Z"},
                    {"rating_id": "r2", "media_id": "tt0133093", "title": "The Matrix",
                     "type": "Movie", "stars": 5, "review_text": null}
                ]),
            ))
        });
        let mut ratings = RatingReconciler::new();
        ratings.open_draft("stale");

        let count = assert_ok!(ratings.load(&stub, &user()).await);
        assert_eq!(count, 2);
        assert_eq!(ratings.record("740").and_then(|r| r.rating_id.as_deref()), Some("r1"));
        assert_eq!(ratings.record("tt0133093").map(|r| r.review.as_str()), Some(""));
        assert!(ratings.can_modify("740", &user()));
        assert_eq!(ratings.state("stale"), RatingState::Unrated);
        assert_eq!(stub.requests()[0].bearer.as_deref(), Some("token_user123"));
    }
}
