/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - the comment service (store, moderation gate, event dispatcher)
 * - the session keys used to verify bearer tokens
 *
 * Every field is cheap to clone; clones share the same pool and channels.
 *
 * # Example
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use socialfeed::backend::comments::CommentService;
 *
 * async fn handler(State(comments): State<CommentService>) {
 *     // ...
 * }
 * ```
 */

use axum::extract::FromRef;

use crate::backend::auth::SessionKeys;
use crate::backend::comments::CommentService;

/// Shared state for all request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Threaded comment operations
    pub comments: CommentService,

    /// Bearer token keys
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(comments: CommentService, sessions: SessionKeys) -> Self {
        Self { comments, sessions }
    }
}

impl FromRef<AppState> for CommentService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.comments.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}
