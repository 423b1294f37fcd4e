//! Profile read and update

use tracing::{info, warn};

use auth::AuthContext;
use common::http::{execute, fetch_json};
use common::{ApiRequest, ClientError, ClientResult, Notice, Transport};

use crate::models::{Profile, ProfileUpdate};

/// Profile endpoints
pub struct ProfileClient<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> ProfileClient<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Get a user's profile
    pub async fn fetch(&self, user_id: &str, auth: &AuthContext) -> ClientResult<Profile> {
        let request = ApiRequest::get(format!("/profile/{user_id}")).bearer(auth.token());
        fetch_json(self.transport, request).await
    }

    /// Update the profile of the logged-in user
    pub async fn update(
        &self,
        user_id: &str,
        auth: &AuthContext,
        update: &ProfileUpdate,
    ) -> ClientResult<Notice> {
        if !auth.owns(Some(user_id)) {
            return Err(ClientError::validation("You can only edit your own profile."));
        }
        if update.is_empty() {
            return Err(ClientError::validation("Nothing to update."));
        }

        let request = ApiRequest::post(format!("/profile/{user_id}/update"))
            .bearer(auth.token())
            .json(update)?;
        execute(self.transport, request).await.map_err(|e| {
            warn!("Profile update for {} failed: {}", user_id, e);
            e
        })?;

        info!("Updated profile for {}", user_id);
        Ok(Notice::success("Profile updated!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::stub::StubTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_profile() {
        let stub = StubTransport::always(
            200,
            json!({
                "username": "RetroFan42",
                "email": "retrofan@example.com",
                "bio": null,
                "avatar_url": "",
                "wishlist": [],
                "library": [{"id": "tt0133093", "title": "The Matrix", "type": "Movie", "year": "1999"}]
            }),
        );
        let profile = ProfileClient::new(&stub)
            .fetch("user123", &AuthContext::anonymous())
            .await
            .expect("fetch failed");

        assert_eq!(profile.username, "RetroFan42");
        assert!(profile.bio.is_empty());
        assert_eq!(profile.library[0].id, "tt0133093");
        assert_eq!(stub.requests()[0].path, "/profile/user123");
    }

    #[tokio::test]
    async fn test_update_only_sends_set_fields() {
        let stub = StubTransport::always(200, json!({"message": "Profile updated"}));
        let auth = AuthContext::authenticated("user123", "token_user123");
        let update = ProfileUpdate {
            bio: Some("Speedrunner".to_string()),
            ..Default::default()
        };

        let notice = ProfileClient::new(&stub)
            .update("user123", &auth, &update)
            .await
            .expect("update failed");
        assert!(!notice.is_failure());
        assert_eq!(stub.requests()[0].path, "/profile/user123/update");
        assert_eq!(stub.requests()[0].body, Some(json!({"bio": "Speedrunner"})));
    }

    #[tokio::test]
    async fn test_update_rejected_locally() {
        let stub = StubTransport::always(200, json!({}));
        let client = ProfileClient::new(&stub);
        let auth = AuthContext::authenticated("user123", "token_user123");

        let err = client
            .update("user123", &auth, &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let update = ProfileUpdate {
            username: Some("Impostor".to_string()),
            ..Default::default()
        };
        let err = client.update("someone_else", &auth, &update).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(stub.request_count(), 0);
    }
}
