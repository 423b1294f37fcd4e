//! Library membership
//!
//! Two states per identifier, absent or present. Like ratings, the local
//! set only changes after the backend confirms a write.

use std::collections::BTreeMap;

use tracing::{info, warn};

use auth::AuthContext;
use catalog::MediaItem;
use common::error::CONFLICT_STATUS;
use common::http::{execute, fetch_json};
use common::{ApiRequest, ClientError, ClientResult, Notice, Transport};

use crate::models::{LibraryEntry, Removal};

pub const LOGIN_REQUIRED: &str = "Please log in to add items to your library.";
pub const ALREADY_IN_LIBRARY: &str = "That item is already in your library.";

/// Local copy of the user's library
#[derive(Debug, Default)]
pub struct LibraryReconciler {
    entries: BTreeMap<String, LibraryEntry>,
}

impl LibraryReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, media_id: &str) -> bool {
        self.entries.contains_key(media_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the set with the backend's copy
    pub async fn load<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
    ) -> ClientResult<usize> {
        let Some(user_id) = auth.user_id() else {
            return Err(ClientError::validation(LOGIN_REQUIRED));
        };

        let request = ApiRequest::get(format!("/profile/{user_id}/library")).bearer(auth.token());
        let entries: Option<Vec<LibraryEntry>> = fetch_json(transport, request).await?;

        self.entries = entries
            .unwrap_or_default()
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect();
        info!("Loaded {} library entries for user {}", self.entries.len(), user_id);
        Ok(self.entries.len())
    }

    /// Add `item` to the library
    ///
    /// A duplicate add comes back from the backend as a conflict; the local
    /// set is left as it was.
    pub async fn add<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        item: &MediaItem,
    ) -> ClientResult<Notice> {
        let Some(user_id) = auth.user_id() else {
            return Err(ClientError::validation(LOGIN_REQUIRED));
        };

        let entry = LibraryEntry::from(item);
        let request = ApiRequest::post(format!("/profile/{user_id}/library/add"))
            .bearer(auth.token())
            .json(&entry)?;

        execute(transport, request).await.map_err(|e| {
            warn!("Adding {} to library of {} failed: {}", item.id, user_id, e);
            if e.is_conflict() {
                ClientError::ServerRejected {
                    status: CONFLICT_STATUS,
                    message: ALREADY_IN_LIBRARY.to_string(),
                }
            } else {
                e
            }
        })?;

        info!("Added {} to library of {}", item.id, user_id);
        self.entries.entry(entry.id.clone()).or_insert(entry);
        Ok(Notice::success("Added to your library!"))
    }

    /// Remove `media_id` after `confirm` agrees
    ///
    /// `confirm` receives the prompt to show. Declining issues no request.
    pub async fn remove<T, F>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        media_id: &str,
        confirm: F,
    ) -> ClientResult<Removal<Notice>>
    where
        T: Transport,
        F: FnOnce(&str) -> bool,
    {
        let Some(user_id) = auth.user_id() else {
            return Err(ClientError::validation(
                "Please log in to manage your library.",
            ));
        };
        let Some(entry) = self.entries.get(media_id) else {
            return Err(ClientError::validation("That item is not in your library."));
        };

        let prompt = format!("Remove \"{}\" from your library?", entry.title);
        if !confirm(&prompt) {
            return Ok(Removal::Cancelled);
        }

        let request = ApiRequest::delete(format!("/profile/{user_id}/library/{media_id}"))
            .bearer(auth.token());
        execute(transport, request).await.map_err(|e| {
            warn!("Removing {} from library of {} failed: {}", media_id, user_id, e);
            e
        })?;

        self.entries.remove(media_id);
        info!("Removed {} from library of {}", media_id, user_id);
        Ok(Removal::Removed(Notice::success("Removed from your library.")))
    }
}
