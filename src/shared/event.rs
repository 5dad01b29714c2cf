/**
 * Post-commit Events
 *
 * This module defines the payloads emitted after a comment write commits.
 * They leave the process through the notification channel and the activity
 * ledger; neither can affect the committed comment.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of user notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Someone commented on the recipient's post
    Comment,
}

/// Notification sent to a post owner when someone else comments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentNotification {
    /// Recipient (the post owner)
    pub user_id: Uuid,
    /// The commenter
    pub from_user_id: Uuid,
    pub post_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl CommentNotification {
    pub fn comment(user_id: Uuid, from_user_id: Uuid, post_id: Uuid) -> Self {
        Self {
            user_id,
            from_user_id,
            post_id,
            kind: NotificationKind::Comment,
        }
    }
}

/// Action types recorded in the activity ledger
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Comment,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Comment => "comment",
        }
    }
}
