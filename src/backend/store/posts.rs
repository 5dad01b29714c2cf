//! Post record access
//!
//! The comment subsystem only needs posts to exist, to know their owner, and
//! to carry the live comment counter.

use chrono::{DateTime, Utc};
use sqlx::Sqlite;
use uuid::Uuid;

use super::Result;
use crate::shared::Post;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    content: String,
    comments_count: i64,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            comments_count: row.comments_count,
            created_at: row.created_at,
        }
    }
}

/// Insert a post
pub async fn insert_post<'e, E>(executor: E, post: &Post) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO posts (id, user_id, content, comments_count, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(post.id)
    .bind(post.user_id)
    .bind(&post.content)
    .bind(post.comments_count)
    .bind(post.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Find a post by id
pub async fn find_post<'e, E>(executor: E, id: Uuid) -> Result<Option<Post>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, PostRow>(
        "SELECT id, user_id, content, comments_count, created_at FROM posts WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Post::from))
}
