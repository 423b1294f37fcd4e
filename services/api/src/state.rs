//! Client state shared by every view

use tracing::{info, warn};

use auth::{AuthContext, LoginCredentials, SessionManager};
use catalog::{FilterCriteria, MediaItem, SearchSession};
use common::{ClientResult, Notice, Transport};

use crate::library::LibraryReconciler;
use crate::models::Removal;
use crate::ratings::{LOGIN_REQUIRED, RatingReconciler, RatingState};

/// Session, search results and the user's ratings and library
pub struct AppState<T> {
    pub session: SessionManager<T>,
    pub search: SearchSession,
    pub ratings: RatingReconciler,
    pub library: LibraryReconciler,
}

impl<T: Transport> AppState<T> {
    pub fn new(transport: T) -> Self {
        Self {
            session: SessionManager::new(transport),
            search: SearchSession::new(),
            ratings: RatingReconciler::new(),
            library: LibraryReconciler::new(),
        }
    }

    pub fn auth(&self) -> &AuthContext {
        self.session.context()
    }

    pub fn transport(&self) -> &T {
        self.session.transport()
    }

    /// Log in, then seed ratings and library from the backend
    ///
    /// Failing to seed is logged but does not fail the login.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> Notice {
        if let Err(e) = self.session.login(credentials).await {
            return Notice::from(&e);
        }

        let transport = self.session.transport();
        let auth = self.session.context();
        if let Err(e) = self.ratings.load(transport, auth).await {
            warn!("Could not load ratings after login: {}", e);
        }
        if let Err(e) = self.library.load(transport, auth).await {
            warn!("Could not load library after login: {}", e);
        }
        Notice::success("Logged in!")
    }

    pub fn logout(&mut self) -> Notice {
        self.session.logout();
        self.ratings = RatingReconciler::new();
        self.library.clear();
        info!("Cleared local ratings and library");
        Notice::success("Logged out!")
    }

    /// Run a search; the failure notice, if any, is on [`SearchSession::notice`]
    pub async fn run_search(&mut self, query: &str) -> &[MediaItem] {
        self.search.search(self.session.transport(), query).await;
        self.search.items()
    }

    /// Change filters and narrow the displayed results without fetching
    pub fn refine(&mut self, criteria: FilterCriteria) -> &[MediaItem] {
        self.search.set_criteria(criteria);
        self.search.reapply_filters();
        self.search.items()
    }

    pub fn rating_state(&self, media_id: &str) -> RatingState {
        self.ratings.state(media_id)
    }

    /// Set stars and review on the draft for `item` and submit it
    ///
    /// A draft opened here is closed again when the submit is rejected
    /// locally, so the item keeps the state it had before the call.
    pub async fn rate(&mut self, item: &MediaItem, stars: u8, review: &str) -> Notice {
        if !self.auth().is_authenticated() {
            return Notice::failure(LOGIN_REQUIRED);
        }
        let had_draft = self.ratings.draft(&item.id).is_some();
        let draft = self.ratings.open_draft(&item.id);
        draft.stars = stars;
        draft.review = review.to_string();

        let result = self
            .ratings
            .submit(self.session.transport(), self.session.context(), item)
            .await;
        if !had_draft && matches!(&result, Err(e) if e.is_validation()) {
            self.ratings.cancel_draft(&item.id);
        }
        Notice::from_result(result)
    }

    pub async fn delete_rating(&mut self, media_id: &str) -> Notice {
        let result = self
            .ratings
            .delete(self.session.transport(), self.session.context(), media_id)
            .await;
        Notice::from_result(result)
    }

    pub async fn add_to_library(&mut self, item: &MediaItem) -> Notice {
        let result = self
            .library
            .add(self.session.transport(), self.session.context(), item)
            .await;
        Notice::from_result(result)
    }

    /// `None` when the user declined the confirmation
    pub async fn remove_from_library<F>(&mut self, media_id: &str, confirm: F) -> Option<Notice>
    where
        F: FnOnce(&str) -> bool,
    {
        let result: ClientResult<Removal<Notice>> = self
            .library
            .remove(self.session.transport(), self.session.context(), media_id, confirm)
            .await;
        match result {
            Ok(Removal::Cancelled) => None,
            Ok(Removal::Removed(notice)) => Some(notice),
            Err(e) => Some(Notice::from(&e)),
        }
    }
}
