/**
 * Post Routes
 *
 * - `POST /api/posts` - create a post (requires authentication)
 * - `GET /api/posts/{post_id}/comments` - the post's comment forest
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::backend::comments::CommentService;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::store::posts;
use crate::shared::post::validate_post_content;
use crate::shared::{CommentNode, NewPost, Post};

/// Configure post routes
pub fn configure_post_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/posts", post(create_post))
        .route("/api/posts/{post_id}/comments", get(list_post_comments))
}

/// Create a post owned by the caller
pub async fn create_post(
    State(comments): State<CommentService>,
    AuthUser(actor): AuthUser,
    Json(request): Json<NewPost>,
) -> Result<(StatusCode, Json<Post>), BackendError> {
    let content = validate_post_content(&request.content)?;

    let post = Post::new(actor.id, content);
    posts::insert_post(comments.db().pool(), &post).await?;
    tracing::info!("Post {} created by {}", post.id, actor.id);

    Ok((StatusCode::CREATED, Json(post)))
}

/// Live comments of a post, assembled into threads
pub async fn list_post_comments(
    State(comments): State<CommentService>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<CommentNode>>, BackendError> {
    Ok(Json(comments.list_for_post(post_id).await?))
}
