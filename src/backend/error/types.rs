/**
 * Backend Error Types
 *
 * This module defines the errors raised by the comment core and the HTTP
 * handlers around it.
 *
 * # Error Categories
 *
 * ## Lookup and access
 *
 * - `NotFound` - the post, comment or parent comment does not exist
 * - `Forbidden` - ownership violation, or a write against a deleted comment
 *
 * ## Input
 *
 * - `SharedError` - request validation failures
 * - `HandlerError` - boundary failures such as a missing bearer token
 *
 * ## Store
 *
 * - `DatabaseError` - any failure inside a transaction body; the transaction
 *   has already been rolled back by the time the caller sees it
 *
 * Moderation rejection is absent: it is an outcome of create,
 * not an error.
 */

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::SharedError;

/// Record kinds that can be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Post,
    Comment,
    ParentComment,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Post => write!(f, "Post"),
            Entity::Comment => write!(f, "Comment"),
            Entity::ParentComment => write!(f, "Parent comment"),
        }
    }
}

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use socialfeed::backend::error::{BackendError, Entity};
/// use uuid::Uuid;
///
/// let err = BackendError::not_found(Entity::Comment, Uuid::new_v4());
/// assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Referenced record does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        entity: Entity,
        id: Uuid,
    },

    /// Caller may not perform this write
    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    /// Handler error (e.g., missing headers, invalid token)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Validation error from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Store failure; the enclosing transaction was rolled back
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl BackendError {
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `NotFound` - 404 Not Found
    /// - `Forbidden` - 403 Forbidden
    /// - `HandlerError` - Uses the status code from the error
    /// - `SharedError` - 400 Bad Request
    /// - `DatabaseError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Store internals are never exposed; they are logged where they occur.
    pub fn message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Internal server error".to_string(),
            Self::HandlerError { message, .. } => message.clone(),
            Self::Forbidden { message } => message.clone(),
            other => other.to_string(),
        }
    }
}
