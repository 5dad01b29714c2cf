/**
 * Comment Routes
 *
 * - `POST /api/comments` - create a comment or reply (requires authentication)
 * - `GET /api/comments/{comment_id}` - fetch one live comment
 * - `PATCH /api/comments/{comment_id}` - edit content (author only)
 * - `DELETE /api/comments/{comment_id}` - cascade delete (author or post owner)
 *
 * A moderation refusal on create is a normal `200` answer with
 * `success: false`, not an error status.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::comments::{CommentService, CreateOutcome};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{Comment, NewComment, UpdateComment};

/// Response body of `POST /api/comments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toxic_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl From<CreateOutcome> for CreateCommentResponse {
    fn from(outcome: CreateOutcome) -> Self {
        match outcome {
            CreateOutcome::Created(comment) => Self {
                success: true,
                comment: Some(comment),
                message: None,
                toxic_score: None,
                topic: None,
            },
            CreateOutcome::Rejected(rejection) => Self {
                success: false,
                comment: None,
                toxic_score: rejection.toxic_score(),
                topic: rejection.topic().map(str::to_string),
                message: Some(rejection.message),
            },
        }
    }
}

/// Response body of `DELETE /api/comments/{comment_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCommentResponse {
    pub success: bool,
    pub affected: u64,
}

/// Configure comment routes
pub fn configure_comment_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/comments", post(create_comment))
        .route(
            "/api/comments/{comment_id}",
            get(get_comment).patch(update_comment).delete(delete_comment),
        )
}

/// Create a comment or reply
pub async fn create_comment(
    State(comments): State<CommentService>,
    AuthUser(actor): AuthUser,
    Json(request): Json<NewComment>,
) -> Result<(StatusCode, Json<CreateCommentResponse>), BackendError> {
    let outcome = comments.create(&actor, request).await?;
    let status = match outcome {
        CreateOutcome::Created(_) => StatusCode::CREATED,
        CreateOutcome::Rejected(_) => StatusCode::OK,
    };
    Ok((status, Json(outcome.into())))
}

/// Fetch one live comment
pub async fn get_comment(
    State(comments): State<CommentService>,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<Comment>, BackendError> {
    Ok(Json(comments.get(comment_id).await?))
}

/// Edit a comment's content
pub async fn update_comment(
    State(comments): State<CommentService>,
    AuthUser(actor): AuthUser,
    Path(comment_id): Path<Uuid>,
    Json(request): Json<UpdateComment>,
) -> Result<Json<Comment>, BackendError> {
    Ok(Json(comments.update(&actor, comment_id, request).await?))
}

/// Cascade-delete a comment and its replies
pub async fn delete_comment(
    State(comments): State<CommentService>,
    AuthUser(actor): AuthUser,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<DeleteCommentResponse>, BackendError> {
    let outcome = comments.delete(&actor, comment_id).await?;
    Ok(Json(DeleteCommentResponse {
        success: true,
        affected: outcome.affected,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::moderation::ModerationRejection;
    use crate::shared::Actor;

    #[test]
    fn test_rejection_response_shape() {
        let response = CreateCommentResponse::from(CreateOutcome::Rejected(ModerationRejection::toxic(
            0.8,
            Some("politics".to_string()),
        )));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["toxicScore"], 0.8);
        assert_eq!(json["topic"], "politics");
        assert!(json.get("comment").is_none());
    }

    #[test]
    fn test_unavailable_response_has_no_score() {
        let response = CreateCommentResponse::from(CreateOutcome::Rejected(ModerationRejection::unavailable()));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert!(json.get("toxicScore").is_none());
        assert!(json["message"].as_str().unwrap().contains("unavailable"));
    }

    #[test]
    fn test_created_response_carries_comment() {
        let actor = Actor::new(Uuid::new_v4(), "a@example.com");
        let comment = Comment::draft(&actor, Uuid::new_v4(), None, "hi".to_string());
        let response = CreateCommentResponse::from(CreateOutcome::Created(comment.clone()));

        assert!(response.success);
        assert_eq!(response.comment, Some(comment));
    }
}
