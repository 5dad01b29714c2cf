//! Comment Service
//!
//! The operations exposed to the boundary: create, update, delete, get and
//! list. Writes run through the [`TransactionCoordinator`]; every store and
//! counter write of one operation commits together.
//!
//! # Create
//!
//! validate → post lookup → moderation → transaction (parent check, insert,
//! post counter +1, parent reply counter +1) → post-commit events
//!
//! # Delete
//!
//! transaction (lookup, authorization, resolve live subtree, mark deleted,
//! post counter −marked, direct parent reply counter −1)

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::counters::{adjust_post_comment_count, adjust_reply_count};
use super::resolver::resolve_live_subtree;
use super::transaction::TransactionCoordinator;
use super::tree::assemble_forest;
use crate::backend::error::{BackendError, Entity, Result};
use crate::backend::events::EventDispatcher;
use crate::backend::moderation::{ModerationGate, ModerationPolicy, ModerationRejection, Verdict};
use crate::backend::store::{comments, posts, FeedDatabase};
use crate::shared::comment::validate_content;
use crate::shared::{Actor, AuditStamp, Comment, CommentNode, NewComment, SharedError, UpdateComment};

/// Result of a create request
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// Committed
    Created(Comment),
    /// Refused by moderation; nothing was written
    Rejected(ModerationRejection),
}

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Live comments transitioned to deleted
    pub affected: u64,
}

/// Threaded comment operations
#[derive(Clone)]
pub struct CommentService {
    db: FeedDatabase,
    coordinator: TransactionCoordinator,
    gate: Arc<dyn ModerationGate>,
    policy: ModerationPolicy,
    events: EventDispatcher,
}

impl CommentService {
    pub fn new(
        db: FeedDatabase,
        gate: Arc<dyn ModerationGate>,
        policy: ModerationPolicy,
        event_capacity: usize,
    ) -> Self {
        let events = EventDispatcher::new(db.clone(), Arc::clone(&gate), event_capacity);
        Self {
            coordinator: TransactionCoordinator::new(db.clone()),
            db,
            gate,
            policy,
            events,
        }
    }

    pub fn db(&self) -> &FeedDatabase {
        &self.db
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Create a comment, or a reply when `parent_id` is set
    pub async fn create(&self, actor: &Actor, request: NewComment) -> Result<CreateOutcome> {
        let content = validate_content(&request.content)?;
        let post = posts::find_post(self.db.pool(), request.post_id)
            .await?
            .ok_or_else(|| BackendError::not_found(Entity::Post, request.post_id))?;

        if let Verdict::Reject(rejection) = self.policy.screen(self.gate.as_ref(), &content).await {
            tracing::info!(
                "Comment by {} on post {} rejected by moderation: {:?}",
                actor.id,
                post.id,
                rejection.reason
            );
            return Ok(CreateOutcome::Rejected(rejection));
        }

        let draft = Comment::draft(actor, post.id, request.parent_id, content);
        let comment = self
            .coordinator
            .run("create_comment", move |tx| {
                Box::pin(async move {
                    if let Some(parent_id) = draft.parent_id {
                        let parent = comments::fetch_comment(&mut **tx, parent_id)
                            .await?
                            .filter(Comment::is_live)
                            .ok_or_else(|| BackendError::not_found(Entity::ParentComment, parent_id))?;
                        if parent.post_id != draft.post_id {
                            return Err(SharedError::validation(
                                "parentId",
                                "Parent comment belongs to another post",
                            )
                            .into());
                        }
                    }

                    comments::insert_comment(tx, &draft).await?;
                    adjust_post_comment_count(tx, draft.post_id, 1).await?;
                    if let Some(parent_id) = draft.parent_id {
                        adjust_reply_count(tx, parent_id, 1).await?;
                    }
                    Ok(draft)
                })
            })
            .await?;

        tracing::info!(
            "Comment {} created on post {} by {}",
            comment.id,
            comment.post_id,
            actor.id
        );
        self.events.comment_committed(&post, &comment);

        Ok(CreateOutcome::Created(comment))
    }

    /// Replace the content of a live comment; author only
    ///
    /// Counters and thread linkage are never touched.
    pub async fn update(&self, actor: &Actor, comment_id: Uuid, request: UpdateComment) -> Result<Comment> {
        let content = validate_content(&request.content)?;
        let editor = AuditStamp::from(actor);
        let actor = actor.clone();

        let updated = self
            .coordinator
            .run("update_comment", move |tx| {
                Box::pin(async move {
                    let existing = comments::fetch_comment(&mut **tx, comment_id)
                        .await?
                        .ok_or_else(|| BackendError::not_found(Entity::Comment, comment_id))?;
                    if existing.is_deleted {
                        return Err(BackendError::forbidden("Comment has been deleted"));
                    }
                    if !existing.is_authored_by(&actor) {
                        return Err(BackendError::forbidden("Only the author can edit this comment"));
                    }

                    if !comments::update_comment_content(tx, comment_id, &content, &editor, Utc::now()).await? {
                        return Err(BackendError::forbidden("Comment has been deleted"));
                    }

                    comments::fetch_comment(&mut **tx, comment_id)
                        .await?
                        .ok_or_else(|| BackendError::not_found(Entity::Comment, comment_id))
                })
            })
            .await?;

        tracing::info!("Comment {} edited by {}", comment_id, updated.updated_by.id);
        Ok(updated)
    }

    /// Cascade-delete a comment and its whole live subtree
    ///
    /// Allowed for the comment author and the post owner. Deleting an
    /// already-deleted comment succeeds with `affected == 0`.
    pub async fn delete(&self, actor: &Actor, comment_id: Uuid) -> Result<DeleteOutcome> {
        let deleter = AuditStamp::from(actor);
        let actor_id = actor.id;
        let caller = actor.clone();

        let outcome = self
            .coordinator
            .run("delete_comment", move |tx| {
                Box::pin(async move {
                    let target = comments::fetch_comment(&mut **tx, comment_id)
                        .await?
                        .ok_or_else(|| BackendError::not_found(Entity::Comment, comment_id))?;
                    let post = posts::find_post(&mut **tx, target.post_id)
                        .await?
                        .ok_or_else(|| BackendError::not_found(Entity::Post, target.post_id))?;

                    if !target.is_authored_by(&caller) && post.user_id != caller.id {
                        return Err(BackendError::forbidden(
                            "Only the comment author or the post owner can delete this comment",
                        ));
                    }
                    if target.is_deleted {
                        return Ok(DeleteOutcome { affected: 0 });
                    }

                    let subtree = resolve_live_subtree(&mut **tx, &target).await?;
                    tracing::debug!(
                        "Deleting {} live of {} comments below {}",
                        subtree.live_count(),
                        subtree.visited,
                        comment_id
                    );
                    let affected =
                        comments::mark_deleted(tx, &subtree.live, Utc::now(), &deleter).await?;
                    if affected != subtree.live_count() {
                        tracing::warn!(
                            "Resolved {} live comments below {} but marked {}",
                            subtree.live_count(),
                            comment_id,
                            affected
                        );
                    }

                    if affected > 0 {
                        adjust_post_comment_count(tx, target.post_id, -(affected as i64)).await?;
                    }

                    if let Some(parent_id) = target.parent_id {
                        let parent_live = comments::fetch_comment(&mut **tx, parent_id)
                            .await?
                            .is_some_and(|parent| parent.is_live());
                        if parent_live {
                            adjust_reply_count(tx, parent_id, -1).await?;
                        } else {
                            tracing::warn!(
                                "Parent {} of deleted comment {} is not live; reply count left as is",
                                parent_id,
                                comment_id
                            );
                        }
                    }

                    Ok(DeleteOutcome { affected })
                })
            })
            .await?;

        tracing::info!(
            "Comment {} deleted by {}: {} comments affected",
            comment_id,
            actor_id,
            outcome.affected
        );
        Ok(outcome)
    }

    /// Fetch one live comment
    pub async fn get(&self, comment_id: Uuid) -> Result<Comment> {
        comments::fetch_comment(self.db.pool(), comment_id)
            .await?
            .filter(Comment::is_live)
            .ok_or_else(|| BackendError::not_found(Entity::Comment, comment_id))
    }

    /// The ordered comment forest of a post
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentNode>> {
        if posts::find_post(self.db.pool(), post_id).await?.is_none() {
            return Err(BackendError::not_found(Entity::Post, post_id));
        }

        let live = comments::fetch_live_comments_for_post(self.db.pool(), post_id).await?;
        tracing::debug!("Assembling {} live comments for post {}", live.len(), post_id);
        Ok(assemble_forest(live))
    }
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService")
            .field("db", &self.db)
            .field("policy", &self.policy)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
