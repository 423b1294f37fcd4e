//! Community threads and comments
//!
//! Writes are strictly sequential: send the write, then re-read the list.
//! Local lists are only ever replaced by a re-read, never patched.

use tracing::{debug, info, warn};

use auth::AuthContext;
use common::http::{execute, fetch_json};
use common::{ApiRequest, ClientError, ClientResult, Notice, Transport};

use crate::models::{Comment, NewComment, NewThread, Removal, Thread};

pub const DELETE_COMMENT_PROMPT: &str = "Delete this comment?";
pub const DELETE_THREAD_PROMPT: &str = "Delete this thread?";
/// Appended to a success notice when the list could not be re-read
pub const REFRESH_FAILED: &str = "The list could not be refreshed.";

/// Decode a list endpoint, treating anything but an array as empty
async fn fetch_list<T, R>(transport: &T, request: ApiRequest) -> ClientResult<Vec<R>>
where
    T: Transport,
    R: serde::de::DeserializeOwned,
{
    let value: serde_json::Value = fetch_json(transport, request).await?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        debug!("Expected a list, got: {}", value);
        Ok(Vec::new())
    }
}

fn require_user(auth: &AuthContext, message: &str) -> ClientResult<String> {
    auth.user_id()
        .map(str::to_string)
        .ok_or_else(|| ClientError::validation(message))
}

fn require_text(value: &str, what: &str) -> ClientResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::validation(format!("{what} cannot be empty.")));
    }
    Ok(value.to_string())
}

/// Notice for a committed write, noting when the follow-up read failed
fn saved_notice(message: &str, refreshed: ClientResult<()>) -> Notice {
    match refreshed {
        Ok(()) => Notice::success(message),
        Err(e) => {
            warn!("Write succeeded but re-read failed: {}", e);
            Notice::success(format!("{message} {REFRESH_FAILED}"))
        }
    }
}

/// Thread list behind the community page
#[derive(Debug, Default)]
pub struct ThreadBoard {
    threads: Vec<Thread>,
}

impl ThreadBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn find(&self, thread_id: &str) -> Option<&Thread> {
        self.threads
            .iter()
            .find(|t| t.id.as_deref() == Some(thread_id))
    }

    /// Re-read every thread; a failed read keeps the current list
    pub async fn load<T: Transport>(&mut self, transport: &T) -> ClientResult<usize> {
        self.threads = fetch_list(transport, ApiRequest::get("/threads")).await?;
        debug!("Loaded {} threads", self.threads.len());
        Ok(self.threads.len())
    }

    async fn refresh<T: Transport>(&mut self, transport: &T) -> ClientResult<()> {
        self.load(transport).await.map(|_| ())
    }

    /// Start a new thread
    pub async fn create<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        title: &str,
        content: &str,
    ) -> ClientResult<Notice> {
        let user_id = require_user(auth, "You must be logged in to start a thread.")?;
        let payload = NewThread {
            title: require_text(title, "Title")?,
            content: require_text(content, "Content")?,
            user_id,
        };

        let request = ApiRequest::post("/threads")
            .bearer(auth.token())
            .json(&payload)?;
        execute(transport, request).await.map_err(|e| {
            warn!("Failed to create thread {}: {}", payload.title, e);
            e
        })?;
        info!("Created thread: {}", payload.title);

        Ok(saved_notice("Thread created!", self.refresh(transport).await))
    }

    /// Edit a thread owned by the current user
    pub async fn update<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        thread_id: &str,
        title: &str,
        content: &str,
    ) -> ClientResult<Notice> {
        let user_id = self.owned_thread(auth, thread_id)?;
        let payload = NewThread {
            title: require_text(title, "Title")?,
            content: require_text(content, "Content")?,
            user_id,
        };

        let request = ApiRequest::put(format!("/threads/{thread_id}"))
            .bearer(auth.token())
            .json(&payload)?;
        execute(transport, request).await?;
        info!("Updated thread {}", thread_id);

        Ok(saved_notice("Thread updated!", self.refresh(transport).await))
    }

    /// Delete a thread owned by the current user, after confirmation
    pub async fn delete<T, F>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        thread_id: &str,
        confirm: F,
    ) -> ClientResult<Removal<Notice>>
    where
        T: Transport,
        F: FnOnce(&str) -> bool,
    {
        let user_id = self.owned_thread(auth, thread_id)?;
        if !confirm(DELETE_THREAD_PROMPT) {
            return Ok(Removal::Cancelled);
        }

        let request = ApiRequest::delete(format!("/threads/{thread_id}"))
            .bearer(auth.token())
            .json(&serde_json::json!({ "user_id": user_id }))?;
        execute(transport, request).await?;
        info!("Deleted thread {}", thread_id);

        Ok(Removal::Removed(saved_notice(
            "Deleted!",
            self.refresh(transport).await,
        )))
    }

    fn owned_thread(&self, auth: &AuthContext, thread_id: &str) -> ClientResult<String> {
        let user_id = require_user(auth, "You must be logged in to manage threads.")?;
        let thread = self
            .find(thread_id)
            .ok_or_else(|| ClientError::validation("Thread not found."))?;
        if !auth.owns(thread.user_id.as_deref()) {
            return Err(ClientError::validation("You can only change your own threads."));
        }
        Ok(user_id)
    }
}

/// One thread and its comments
#[derive(Debug)]
pub struct ThreadView {
    thread_id: String,
    thread: Thread,
    comments: Vec<Comment>,
}

impl ThreadView {
    /// Load a thread and its comments
    ///
    /// `known` skips the thread request when the caller already has it.
    pub async fn open<T: Transport>(
        transport: &T,
        thread_id: &str,
        known: Option<Thread>,
    ) -> ClientResult<Self> {
        let thread_id = thread_id.trim();
        if thread_id.is_empty() {
            return Err(ClientError::validation("Missing thread id."));
        }

        let thread = match known {
            Some(thread) => thread,
            None => fetch_json(transport, ApiRequest::get(format!("/threads/{thread_id}"))).await?,
        };

        let mut view = Self {
            thread_id: thread_id.to_string(),
            thread,
            comments: Vec::new(),
        };
        view.reload_comments(transport).await?;
        Ok(view)
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments
            .iter()
            .find(|c| c.id.as_deref() == Some(comment_id))
    }

    /// Whether edit/delete may be offered for a comment
    pub fn can_modify(&self, comment: &Comment, auth: &AuthContext) -> bool {
        !comment.is_deleted() && auth.owns(comment.user_id.as_deref())
    }

    pub async fn reload_comments<T: Transport>(&mut self, transport: &T) -> ClientResult<()> {
        let request = ApiRequest::get(format!("/comments/{}", self.thread_id));
        self.comments = fetch_list(transport, request).await?;
        debug!("Thread {} has {} comments", self.thread_id, self.comments.len());
        Ok(())
    }

    /// Post a comment and re-read the list
    pub async fn post_comment<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        content: &str,
    ) -> ClientResult<Notice> {
        let content = require_text(content, "Comment")?;
        let user_id = require_user(auth, "You must be logged in to comment.")?;

        let payload = NewComment {
            content,
            thread_id: self.thread_id.clone(),
            user_id,
        };
        let request = ApiRequest::post("/comments")
            .bearer(auth.token())
            .json(&payload)?;
        execute(transport, request).await.map_err(|e| {
            warn!("Failed to post comment on {}: {}", self.thread_id, e);
            e
        })?;

        Ok(saved_notice("Comment posted!", self.reload_comments(transport).await))
    }

    /// Replace the content of one of the user's comments
    pub async fn edit_comment<T: Transport>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        comment_id: &str,
        content: &str,
    ) -> ClientResult<Notice> {
        let content = require_text(content, "Comment")?;
        let user_id = self.owned_comment(auth, comment_id)?;

        let request = ApiRequest::put(format!("/comment/{comment_id}"))
            .bearer(auth.token())
            .json(&serde_json::json!({ "content": content, "user_id": user_id }))?;
        execute(transport, request).await.map_err(|e| {
            warn!("Failed to edit comment {}: {}", comment_id, e);
            e
        })?;

        Ok(saved_notice("Comment updated!", self.reload_comments(transport).await))
    }

    /// Delete one of the user's comments after confirmation
    pub async fn delete_comment<T, F>(
        &mut self,
        transport: &T,
        auth: &AuthContext,
        comment_id: &str,
        confirm: F,
    ) -> ClientResult<Removal<Notice>>
    where
        T: Transport,
        F: FnOnce(&str) -> bool,
    {
        let user_id = self.owned_comment(auth, comment_id)?;
        if !confirm(DELETE_COMMENT_PROMPT) {
            return Ok(Removal::Cancelled);
        }

        let request = ApiRequest::delete(format!("/comment/{comment_id}"))
            .bearer(auth.token())
            .json(&serde_json::json!({ "user_id": user_id }))?;
        execute(transport, request).await.map_err(|e| {
            warn!("Failed to delete comment {}: {}", comment_id, e);
            e
        })?;

        Ok(Removal::Removed(saved_notice(
            "Deleted!",
            self.reload_comments(transport).await,
        )))
    }

    fn owned_comment(&self, auth: &AuthContext, comment_id: &str) -> ClientResult<String> {
        let user_id = require_user(auth, "You must be logged in to comment.")?;
        let comment = self
            .comment(comment_id)
            .ok_or_else(|| ClientError::validation("Comment not found."))?;
        if comment.is_deleted() {
            return Err(ClientError::validation("This comment has been deleted."));
        }
        if !auth.owns(comment.user_id.as_deref()) {
            return Err(ClientError::validation("You can only change your own comments."));
        }
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ApiResponse;
    use common::stub::StubTransport;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tokio_test::{assert_err, assert_ok};

    fn user() -> AuthContext {
        AuthContext::authenticated("user123", "token_user123")
    }

    fn thread() -> Thread {
        serde_json::from_value(json!({
            "id": "t1", "title": "Best SNES RPG?", "content": "Discuss.",
            "user_id": "user123", "comments": []
        }))
        .expect("Failed to decode thread")
    }

    /// Backend double that keeps comments in memory
    fn comment_backend() -> StubTransport {
        let comments = Arc::new(Mutex::new(vec![
            json!({"id": "c1", "content": "Chrono Trigger", "thread_id": "t1",
                   "user_id": "user123", "date_created": "2024-01-01T00:00:00Z"}),
            json!({"id": "c2", "content": "Comment has been deleted", "thread_id": "t1",
                   "user_id": "user123"}),
            json!({"id": "c3", "content": "Earthbound", "thread_id": "t1",
                   "user_id": "someone_else"}),
        ]));

        StubTransport::new(move |req| {
            let mut list = comments.lock().expect("poisoned");
            match (req.method.as_str(), req.path.as_str()) {
                ("GET", "/comments/t1") => Ok(ApiResponse::json(200, &json!(*list))),
                ("POST", "/comments") => {
                    let mut comment = req.body.clone().unwrap_or_default();
                    comment["id"] = json!(format!("c{}", list.len() + 1));
                    list.push(comment);
                    Ok(ApiResponse::json(201, &json!({"message": "Comment added"})))
                }
                ("DELETE", "/comment/c1") => {
                    list[0]["content"] = json!("Comment has been deleted");
                    list[0]["deleted"] = json!(true);
                    Ok(ApiResponse::json(200, &json!({"message": "deleted"})))
                }
                _ => Ok(ApiResponse::json(404, &json!({"error": "not_found"}))),
            }
        })
    }

    #[tokio::test]
    async fn test_open_uses_known_thread() {
        let stub = comment_backend();
        let view = assert_ok!(ThreadView::open(&stub, "t1", Some(thread())).await);

        assert_eq!(view.comments().len(), 3);
        assert_eq!(stub.request_count(), 1);
        assert!(view.comment("c2").is_some_and(Comment::is_deleted));
        assert!(!view.comment("c1").is_some_and(Comment::is_deleted));
    }

    #[tokio::test]
    async fn test_missing_thread_id() {
        let stub = comment_backend();
        let err = assert_err!(ThreadView::open(&stub, "  ", None).await);
        assert_eq!(err.to_string(), "Missing thread id.");
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_post_then_reread() {
        let stub = comment_backend();
        let mut view = assert_ok!(ThreadView::open(&stub, "t1", Some(thread())).await);

        assert_ok!(view.post_comment(&stub, &user(), "  Secret of Mana ").await);
        assert_eq!(view.comments().len(), 4);
        assert_eq!(view.comments()[3].content, "Secret of Mana");

        let paths: Vec<String> = stub.requests().iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, vec!["/comments/t1", "/comments", "/comments/t1"]);
    }

    #[tokio::test]
    async fn test_post_requires_login_and_content() {
        let stub = comment_backend();
        let mut view = assert_ok!(ThreadView::open(&stub, "t1", Some(thread())).await);

        assert_err!(view.post_comment(&stub, &AuthContext::anonymous(), "hi").await);
        assert_err!(view.post_comment(&stub, &user(), "   ").await);
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_comment_flow() {
        let stub = comment_backend();
        let mut view = assert_ok!(ThreadView::open(&stub, "t1", Some(thread())).await);

        let declined = assert_ok!(view.delete_comment(&stub, &user(), "c1", |_| false).await);
        assert!(declined.is_cancelled());
        assert_eq!(stub.request_count(), 1);

        let mut asked = String::new();
        assert_ok!(
            view.delete_comment(&stub, &user(), "c1", |prompt| {
                asked = prompt.to_string();
                true
            })
            .await
        );
        assert_eq!(asked, DELETE_COMMENT_PROMPT);
        assert!(view.comment("c1").is_some_and(Comment::is_deleted));
        assert_eq!(stub.requests()[1].body, Some(json!({"user_id": "user123"})));
    }

    #[tokio::test]
    async fn test_foreign_and_deleted_comments_are_locked() {
        let stub = comment_backend();
        let mut view = assert_ok!(ThreadView::open(&stub, "t1", Some(thread())).await);

        let foreign = view.comment("c3").cloned().expect("c3");
        assert!(!view.can_modify(&foreign, &user()));
        assert_err!(view.edit_comment(&stub, &user(), "c3", "mine now").await);
        assert_err!(view.edit_comment(&stub, &user(), "c2", "revived").await);
        assert_err!(view.delete_comment(&stub, &user(), "c3", |_| true).await);
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_list() {
        let stub = comment_backend();
        let mut view = assert_ok!(ThreadView::open(&stub, "t1", Some(thread())).await);

        // the double answers PUT with 404
        let err = assert_err!(view.edit_comment(&stub, &user(), "c1", "edited").await);
        assert_eq!(err.server_message(), Some("not_found"));
        assert_eq!(view.comment("c1").map(|c| c.content.as_str()), Some("Chrono Trigger"));
        assert_eq!(stub.request_count(), 2);
    }

    #[tokio::test]
    async fn test_committed_post_survives_failed_reread() {
        let reads = Arc::new(Mutex::new(0));
        let stub = StubTransport::new(move |req| match req.method.as_str() {
            "GET" => {
                let mut count = reads.lock().expect("poisoned");
                *count += 1;
                if *count == 1 {
                    Ok(ApiResponse::json(
                        200,
                        &json!([{"id": "c1", "content": "First!", "thread_id": "t1",
                                 "user_id": "user123"}]),
                    ))
                } else {
                    Err(ClientError::NetworkUnreachable("connection reset".to_string()))
                }
            }
            _ => Ok(ApiResponse::json(201, &json!({"message": "Comment added"}))),
        });
        let mut view = assert_ok!(ThreadView::open(&stub, "t1", Some(thread())).await);

        let notice = assert_ok!(view.post_comment(&stub, &user(), "Second!").await);
        assert!(!notice.is_failure());
        assert!(notice.message.contains(REFRESH_FAILED));
        assert_eq!(view.comments().len(), 1);
        assert_eq!(view.comments()[0].content, "First!");

        let sent: Vec<String> = stub
            .requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect();
        assert_eq!(sent, vec!["GET /comments/t1", "POST /comments", "GET /comments/t1"]);
    }

    #[tokio::test]
    async fn test_committed_thread_survives_failed_reread() {
        let stub = StubTransport::new(|req| match req.method.as_str() {
            "GET" => Err(ClientError::NetworkUnreachable("timeout".to_string())),
            _ => Ok(ApiResponse::json(201, &json!({"message": "Thread created successfully"}))),
        });
        let mut board = ThreadBoard::new();

        let notice = assert_ok!(board.create(&stub, &user(), "Best SNES RPG?", "Discuss.").await);
        assert_eq!(notice.message, format!("Thread created! {REFRESH_FAILED}"));
        assert!(board.threads().is_empty());
        assert_eq!(stub.request_count(), 2);
    }

    #[tokio::test]
    async fn test_thread_board() {
        let stub = StubTransport::new(|req| match req.method.as_str() {
            "GET" => Ok(ApiResponse::json(
                200,
                &json!([{"_id": "t1", "title": "Best SNES RPG?", "content": "Discuss.",
                          "user_id": "user123"}]),
            )),
            _ => Ok(ApiResponse::json(201, &json!({"message": "Thread created successfully"}))),
        });
        let mut board = ThreadBoard::new();

        assert_ok!(board.create(&stub, &user(), "Best SNES RPG?", "Discuss.").await);
        assert_eq!(board.threads().len(), 1);
        assert_eq!(board.threads()[0].category(), "General");
        assert_eq!(
            stub.requests()[0].body,
            Some(json!({"title": "Best SNES RPG?", "content": "Discuss.", "user_id": "user123"}))
        );

        let removal = assert_ok!(board.delete(&stub, &user(), "t1", |_| true).await);
        assert!(!removal.is_cancelled());
        assert_eq!(stub.requests()[2].path, "/threads/t1");

        let other = AuthContext::authenticated("someone_else", "token");
        assert_err!(board.update(&stub, &other, "t1", "Mine", "now").await);
    }

    #[tokio::test]
    async fn test_non_array_list_is_empty() {
        let stub = StubTransport::always(200, json!({"error": "none"}));
        let mut board = ThreadBoard::new();
        assert_eq!(assert_ok!(board.load(&stub).await), 0);
    }
}
