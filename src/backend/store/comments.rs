//! Comment record access
//!
//! Writes take the open transaction; reads accept any SQLite executor so the
//! read path can run straight off the pool.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, Transaction};
use uuid::Uuid;

use super::{Result, MAX_BIND_CHUNK};
use crate::shared::{AuditStamp, Comment};

const COMMENT_COLUMNS: &str = "id, post_id, user_id, parent_id, content, likes_count, \
     replies_count, is_deleted, deleted_at, deleted_by_id, deleted_by_email, created_by_id, \
     created_by_email, updated_by_id, updated_by_email, created_at, updated_at";

/// Row shape of the `comments` table
#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    user_id: Uuid,
    parent_id: Option<Uuid>,
    content: String,
    likes_count: i64,
    replies_count: i64,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by_id: Option<Uuid>,
    deleted_by_email: Option<String>,
    created_by_id: Uuid,
    created_by_email: String,
    updated_by_id: Uuid,
    updated_by_email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        let deleted_by = match (row.deleted_by_id, row.deleted_by_email) {
            (Some(id), Some(email)) => Some(AuditStamp { id, email }),
            _ => None,
        };

        Comment {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            parent_id: row.parent_id,
            content: row.content,
            likes_count: row.likes_count,
            replies_count: row.replies_count,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
            deleted_by,
            created_by: AuditStamp {
                id: row.created_by_id,
                email: row.created_by_email,
            },
            updated_by: AuditStamp {
                id: row.updated_by_id,
                email: row.updated_by_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Direct child of some comment, as seen by the cascade resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildEdge {
    pub id: Uuid,
    pub is_deleted: bool,
}

/// Insert a new comment record
pub async fn insert_comment(tx: &mut Transaction<'_, Sqlite>, comment: &Comment) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO comments (
            id, post_id, user_id, parent_id, content, likes_count, replies_count,
            is_deleted, deleted_at, deleted_by_id, deleted_by_email,
            created_by_id, created_by_email, updated_by_id, updated_by_email,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(comment.id)
    .bind(comment.post_id)
    .bind(comment.user_id)
    .bind(comment.parent_id)
    .bind(&comment.content)
    .bind(comment.likes_count)
    .bind(comment.replies_count)
    .bind(comment.is_deleted)
    .bind(comment.deleted_at)
    .bind(comment.deleted_by.as_ref().map(|stamp| stamp.id))
    .bind(comment.deleted_by.as_ref().map(|stamp| stamp.email.as_str()))
    .bind(comment.created_by.id)
    .bind(&comment.created_by.email)
    .bind(comment.updated_by.id)
    .bind(&comment.updated_by.email)
    .bind(comment.created_at)
    .bind(comment.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Fetch one comment by id, deleted or not
pub async fn fetch_comment<'e, E>(executor: E, id: Uuid) -> Result<Option<Comment>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {} FROM comments WHERE id = ?", COMMENT_COLUMNS);
    let row = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(Comment::from))
}

/// All live comments of a post, oldest first
pub async fn fetch_live_comments_for_post<'e, E>(executor: E, post_id: Uuid) -> Result<Vec<Comment>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM comments WHERE post_id = ? AND is_deleted = 0 ORDER BY created_at ASC, id ASC",
        COMMENT_COLUMNS
    );
    let rows = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(post_id)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(Comment::from).collect())
}

/// Replace the content of a live comment
///
/// Returns false when no live comment with `id` exists.
pub async fn update_comment_content(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
    content: &str,
    editor: &AuditStamp,
    at: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE comments
        SET content = ?, updated_by_id = ?, updated_by_email = ?, updated_at = ?
        WHERE id = ? AND is_deleted = 0
        "#,
    )
    .bind(content)
    .bind(editor.id)
    .bind(&editor.email)
    .bind(at)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Direct children of `parents`, deleted ones included
///
/// Deleted children are returned so the caller can keep walking through
/// them; the cascade must reach live descendants under a deleted link.
pub async fn fetch_children(conn: &mut SqliteConnection, parents: &[Uuid]) -> Result<Vec<ChildEdge>> {
    let mut edges = Vec::new();

    for chunk in parents.chunks(MAX_BIND_CHUNK) {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, is_deleted FROM comments WHERE parent_id IN (");
        let mut separated = query.separated(", ");
        for parent in chunk {
            separated.push_bind(*parent);
        }
        separated.push_unseparated(")");

        let rows: Vec<(Uuid, bool)> = query.build_query_as().fetch_all(&mut *conn).await?;
        edges.extend(rows.into_iter().map(|(id, is_deleted)| ChildEdge { id, is_deleted }));
    }

    Ok(edges)
}

/// Soft-delete every still-live comment in `ids`
///
/// Returns how many rows actually flipped. Rows already deleted are left
/// untouched, so their original deletion stamp survives.
pub async fn mark_deleted(
    tx: &mut Transaction<'_, Sqlite>,
    ids: &[Uuid],
    at: DateTime<Utc>,
    deleter: &AuditStamp,
) -> Result<u64> {
    let mut marked = 0;

    for chunk in ids.chunks(MAX_BIND_CHUNK) {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE comments SET is_deleted = 1, deleted_at = ");
        query.push_bind(at);
        query.push(", deleted_by_id = ");
        query.push_bind(deleter.id);
        query.push(", deleted_by_email = ");
        query.push_bind(deleter.email.clone());
        query.push(", updated_at = ");
        query.push_bind(at);
        query.push(" WHERE is_deleted = 0 AND id IN (");
        let mut separated = query.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        marked += query.build().execute(&mut **tx).await?.rows_affected();
    }

    Ok(marked)
}
