//! Comment Data Structures
//!
//! Represents threaded comments on a post. Comments form a forest per post
//! through the nullable `parent_id` back-reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Longest accepted comment body, in characters
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Caller identity supplied by the authentication boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub email: String,
}

impl Actor {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Who performed a write, as recorded on the comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub id: Uuid,
    pub email: String,
}

impl From<&Actor> for AuditStamp {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            email: actor.email.clone(),
        }
    }
}

/// A comment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Author
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub likes_count: i64,
    /// Live direct children only
    pub replies_count: i64,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<AuditStamp>,
    pub created_by: AuditStamp,
    pub updated_by: AuditStamp,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Build a fresh, not yet persisted comment authored by `actor`
    pub fn draft(actor: &Actor, post_id: Uuid, parent_id: Option<Uuid>, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id: actor.id,
            parent_id,
            content,
            likes_count: 0,
            replies_count: 0,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_by: actor.into(),
            updated_by: actor.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.is_deleted
    }

    pub fn is_authored_by(&self, actor: &Actor) -> bool {
        self.user_id == actor.id
    }
}

/// Request body for creating a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub post_id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub content: String,
}

/// Request body for editing a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateComment {
    pub content: String,
}

/// Trim and check comment text
pub fn validate_content(content: &str) -> Result<String, SharedError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("content", "Comment content cannot be empty"));
    }
    if trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(SharedError::validation(
            "content",
            format!("Comment content exceeds {} characters", MAX_CONTENT_CHARS),
        ));
    }
    Ok(trimmed.to_string())
}

/// A comment with its ordered replies, as returned by the read path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn id(&self) -> Uuid {
        self.comment.id
    }

    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }
}

// Unlinks descendants onto a heap stack so dropping a deep tree never
// recurses once per level.
impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor::new(Uuid::new_v4(), "author@example.com")
    }

    #[test]
    fn test_draft_starts_active() {
        let actor = actor();
        let comment = Comment::draft(&actor, Uuid::new_v4(), None, "hello".to_string());

        assert!(comment.is_live());
        assert_eq!(comment.replies_count, 0);
        assert_eq!(comment.created_by.email, "author@example.com");
        assert!(comment.is_authored_by(&actor));
        assert!(comment.deleted_at.is_none());
    }

    #[test]
    fn test_validate_content_trims() {
        assert_eq!(validate_content("  hi there \n").unwrap(), "hi there");
    }

    #[test]
    fn test_validate_content_rejects_blank() {
        let err = validate_content("   ").unwrap_err();
        assert!(matches!(err, SharedError::ValidationError { ref field, .. } if field == "content"));
    }

    #[test]
    fn test_validate_content_rejects_oversized() {
        let long = "x".repeat(MAX_CONTENT_CHARS + 1);
        assert!(validate_content(&long).is_err());
    }

    #[test]
    fn test_comment_serializes_camel_case() {
        let comment = Comment::draft(&actor(), Uuid::new_v4(), None, "hello".to_string());
        let node = CommentNode {
            comment,
            children: Vec::new(),
        };
        let json = serde_json::to_value(&node).unwrap();

        assert!(json.get("postId").is_some());
        assert!(json.get("repliesCount").is_some());
        assert_eq!(json["children"], serde_json::json!([]));
    }

    #[test]
    fn test_deep_node_chain_drops() {
        let actor = actor();
        let post_id = Uuid::new_v4();
        let mut node = CommentNode {
            comment: Comment::draft(&actor, post_id, None, "leaf".to_string()),
            children: Vec::new(),
        };
        for i in 0..200_000 {
            let parent = Comment::draft(&actor, post_id, None, format!("#{}", i));
            node = CommentNode {
                comment: parent,
                children: vec![node],
            };
        }
        assert_eq!(node.size(), 200_001);
        drop(node);
    }

    #[test]
    fn test_new_comment_parent_is_optional() {
        let post_id = Uuid::new_v4();
        let body = serde_json::json!({ "postId": post_id, "content": "first" });
        let request: NewComment = serde_json::from_value(body).unwrap();
        assert_eq!(request.post_id, post_id);
        assert!(request.parent_id.is_none());
    }
}
