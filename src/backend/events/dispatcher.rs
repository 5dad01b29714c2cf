//! Post-commit Event Dispatcher
//!
//! Runs the side effects of a committed comment on a detached task:
//!
//! 1. notify the post owner (skipped for self-comments)
//! 2. append to the activity ledger (skipped for self-comments)
//! 3. ask the moderation service to retrain
//!
//! Each step is attempted independently and failures are only logged. The
//! comment has already committed and nothing here can undo it.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::broadcast::{broadcast_notification, notification_channel, NotificationBroadcast};
use crate::backend::moderation::ModerationGate;
use crate::backend::store::{actions, FeedDatabase};
use crate::shared::{ActionType, Comment, CommentNotification, Post};

/// Fire-and-forget dispatcher for committed comment writes
#[derive(Clone)]
pub struct EventDispatcher {
    notifications: NotificationBroadcast,
    db: FeedDatabase,
    gate: Arc<dyn ModerationGate>,
}

impl EventDispatcher {
    pub fn new(db: FeedDatabase, gate: Arc<dyn ModerationGate>, capacity: usize) -> Self {
        Self {
            notifications: notification_channel(capacity),
            db,
            gate,
        }
    }

    /// Subscribe to comment notifications
    pub fn subscribe(&self) -> broadcast::Receiver<CommentNotification> {
        self.notifications.subscribe()
    }

    /// Schedule the side effects of a committed create
    ///
    /// Returns the task handle; callers are free to drop it.
    pub fn comment_committed(&self, post: &Post, comment: &Comment) -> JoinHandle<()> {
        let notifications = self.notifications.clone();
        let db = self.db.clone();
        let gate = Arc::clone(&self.gate);

        let owner_id = post.user_id;
        let post_id = post.id;
        let commenter_id = comment.user_id;
        let comment_id = comment.id;

        tokio::spawn(async move {
            if owner_id != commenter_id {
                broadcast_notification(
                    &notifications,
                    CommentNotification::comment(owner_id, commenter_id, post_id),
                );

                if let Err(e) = actions::record_action(
                    db.pool(),
                    commenter_id,
                    owner_id,
                    ActionType::Comment,
                    Some(post_id),
                )
                .await
                {
                    tracing::warn!("Failed to record comment action for {}: {}", comment_id, e);
                }
            }

            if let Err(e) = gate.request_retrain().await {
                tracing::warn!("Moderation retrain request failed: {}", e);
            }
        })
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscribers", &self.notifications.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::moderation::{ModerationError, ToxicityAssessment};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[derive(Default)]
    struct CountingGate {
        retrains: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ModerationGate for CountingGate {
        async fn assess(&self, _text: &str) -> Result<ToxicityAssessment, ModerationError> {
            Ok(ToxicityAssessment::clean())
        }

        async fn request_retrain(&self) -> Result<(), ModerationError> {
            self.retrains.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ModerationError::Unavailable("offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn actor_comment(post: &Post, user_id: Uuid) -> Comment {
        let actor = crate::shared::Actor::new(user_id, "c@example.com");
        Comment::draft(&actor, post.id, None, "hi".to_string())
    }

    #[tokio::test]
    async fn test_foreign_comment_notifies_and_records() {
        let db = FeedDatabase::in_memory().await.unwrap();
        let gate = Arc::new(CountingGate::default());
        let dispatcher = EventDispatcher::new(db.clone(), gate.clone(), 8);
        let mut rx = dispatcher.subscribe();

        let post = Post::new(Uuid::new_v4(), "owned");
        let commenter = Uuid::new_v4();
        let comment = actor_comment(&post, commenter);

        dispatcher.comment_committed(&post, &comment).await.unwrap();

        let notification = rx.try_recv().unwrap();
        assert_eq!(notification, CommentNotification::comment(post.user_id, commenter, post.id));
        assert_eq!(actions::actions_by_actor(db.pool(), commenter).await.unwrap().len(), 1);
        assert_eq!(gate.retrains.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_self_comment_skips_notification_and_ledger() {
        let db = FeedDatabase::in_memory().await.unwrap();
        let gate = Arc::new(CountingGate::default());
        let dispatcher = EventDispatcher::new(db.clone(), gate.clone(), 8);
        let mut rx = dispatcher.subscribe();

        let post = Post::new(Uuid::new_v4(), "mine");
        let comment = actor_comment(&post, post.user_id);

        dispatcher.comment_committed(&post, &comment).await.unwrap();

        assert!(rx.try_recv().is_err());
        assert!(actions::actions_by_actor(db.pool(), post.user_id).await.unwrap().is_empty());
        assert_eq!(gate.retrains.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retrain_failure_is_swallowed() {
        let db = FeedDatabase::in_memory().await.unwrap();
        let gate = Arc::new(CountingGate {
            retrains: AtomicUsize::new(0),
            fail: true,
        });
        let dispatcher = EventDispatcher::new(db, gate, 8);
        let post = Post::new(Uuid::new_v4(), "p");
        let comment = actor_comment(&post, Uuid::new_v4());

        assert!(dispatcher.comment_committed(&post, &comment).await.is_ok());
    }
}
