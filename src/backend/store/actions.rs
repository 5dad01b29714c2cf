//! Activity ledger
//!
//! Append-only record of user actions. Rows are written after the comment
//! transaction commits, so a failed append never affects the comment.

use chrono::{DateTime, Utc};
use sqlx::Sqlite;
use uuid::Uuid;

use super::Result;
use crate::shared::ActionType;

/// One recorded action
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ActionRecord {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub action_type: String,
    pub post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Append an action row
pub async fn record_action<'e, E>(
    executor: E,
    actor_id: Uuid,
    target_id: Uuid,
    action_type: ActionType,
    post_id: Option<Uuid>,
) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO actions (id, actor_id, target_id, action_type, post_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor_id)
    .bind(target_id)
    .bind(action_type.as_str())
    .bind(post_id)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}

/// Actions performed by `actor_id`, oldest first
pub async fn actions_by_actor<'e, E>(executor: E, actor_id: Uuid) -> Result<Vec<ActionRecord>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ActionRecord>(
        r#"
        SELECT id, actor_id, target_id, action_type, post_id, created_at
        FROM actions
        WHERE actor_id = ?
        ORDER BY created_at ASC
        "#,
    )
    .bind(actor_id)
    .fetch_all(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::FeedDatabase;

    #[tokio::test]
    async fn test_record_and_list_actions() {
        let db = FeedDatabase::in_memory().await.unwrap();
        let actor = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let post = Uuid::new_v4();

        record_action(db.pool(), actor, owner, ActionType::Comment, Some(post))
            .await
            .unwrap();

        let actions = actions_by_actor(db.pool(), actor).await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action_type, "comment");
        assert_eq!(actions[0].target_id, owner);
        assert_eq!(actions[0].post_id, Some(post));
    }
}
