//! Post Data Structure
//!
//! The slice of a feed post the comment subsystem depends on: its owner and
//! its live comment counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::comment::MAX_CONTENT_CHARS;
use crate::shared::error::SharedError;

/// A feed post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    /// Owner of the post
    pub user_id: Uuid,
    pub content: String,
    /// Live comments on this post
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(user_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content: content.into(),
            comments_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// Request body for creating a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub content: String,
}

/// Trim and check post text; posts share the comment length cap
pub fn validate_post_content(content: &str) -> Result<String, SharedError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("content", "Post content cannot be empty"));
    }
    if trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(SharedError::validation(
            "content",
            format!("Post content exceeds {} characters", MAX_CONTENT_CHARS),
        ));
    }
    Ok(trimmed.to_string())
}
