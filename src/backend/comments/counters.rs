//! Counter Maintainer
//!
//! Post and parent counters only ever move by a delta inside the transaction
//! that performs the matching data change. Each adjustment is one keyed
//! `UPDATE ... SET n = n + ?` statement, so concurrent writers never lose an
//! increment and a stale cached value is never written back.

use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::backend::error::{BackendError, Entity, Result};

/// Move `posts.comments_count` by `delta`
///
/// A missing post is `NotFound`, which aborts the enclosing transaction.
pub async fn adjust_post_comment_count(
    tx: &mut Transaction<'_, Sqlite>,
    post_id: Uuid,
    delta: i64,
) -> Result<()> {
    let result = sqlx::query("UPDATE posts SET comments_count = comments_count + ? WHERE id = ?")
        .bind(delta)
        .bind(post_id)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(BackendError::not_found(Entity::Post, post_id));
    }

    tracing::debug!("Adjusted comments_count of post {} by {}", post_id, delta);
    Ok(())
}

/// Move `comments.replies_count` of `parent_id` by `delta`
///
/// Only live parents are adjusted; a missing or deleted parent is
/// `NotFound` for the parent comment.
pub async fn adjust_reply_count(
    tx: &mut Transaction<'_, Sqlite>,
    parent_id: Uuid,
    delta: i64,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE comments SET replies_count = replies_count + ? WHERE id = ? AND is_deleted = 0",
    )
    .bind(delta)
    .bind(parent_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(BackendError::not_found(Entity::ParentComment, parent_id));
    }

    tracing::debug!("Adjusted replies_count of comment {} by {}", parent_id, delta);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::{comments, posts, FeedDatabase};
    use crate::shared::{Actor, Comment, Post};
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_post_counter_moves_by_delta() {
        let db = FeedDatabase::in_memory().await.unwrap();
        let post = Post::new(Uuid::new_v4(), "counted");
        posts::insert_post(db.pool(), &post).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        adjust_post_comment_count(&mut tx, post.id, 3).await.unwrap();
        adjust_post_comment_count(&mut tx, post.id, -2).await.unwrap();
        tx.commit().await.unwrap();

        let stored = posts::find_post(db.pool(), post.id).await.unwrap().unwrap();
        assert_eq!(stored.comments_count, 1);
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let db = FeedDatabase::in_memory().await.unwrap();
        let missing = Uuid::new_v4();

        let mut tx = db.begin().await.unwrap();
        let err = adjust_post_comment_count(&mut tx, missing, 1).await.unwrap_err();
        assert_matches!(err, BackendError::NotFound { entity: Entity::Post, id } if id == missing);
    }

    #[tokio::test]
    async fn test_counter_cannot_go_negative() {
        let db = FeedDatabase::in_memory().await.unwrap();
        let post = Post::new(Uuid::new_v4(), "empty");
        posts::insert_post(db.pool(), &post).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        let err = adjust_post_comment_count(&mut tx, post.id, -1).await.unwrap_err();
        assert_matches!(err, BackendError::DatabaseError(_));
    }

    #[tokio::test]
    async fn test_reply_count_skips_deleted_parent() {
        let db = FeedDatabase::in_memory().await.unwrap();
        let actor = Actor::new(Uuid::new_v4(), "a@example.com");
        let post = Post::new(actor.id, "thread");
        posts::insert_post(db.pool(), &post).await.unwrap();
        let parent = Comment::draft(&actor, post.id, None, "parent".to_string());

        let mut tx = db.begin().await.unwrap();
        comments::insert_comment(&mut tx, &parent).await.unwrap();
        adjust_reply_count(&mut tx, parent.id, 1).await.unwrap();
        comments::mark_deleted(&mut tx, &[parent.id], chrono::Utc::now(), &(&actor).into())
            .await
            .unwrap();

        let err = adjust_reply_count(&mut tx, parent.id, 1).await.unwrap_err();
        assert_matches!(err, BackendError::NotFound { entity: Entity::ParentComment, .. });
    }
}
