//! Seeded feed fixture: one post owned by `owner`, a comment service in
//! front of a temporary database, and helpers to inspect counters.

use std::sync::Arc;

use socialfeed::backend::comments::{CommentService, CreateOutcome};
use socialfeed::backend::moderation::ModerationPolicy;
use socialfeed::backend::store::{comments, posts};
use socialfeed::shared::{Actor, Comment, NewComment, Post};
use uuid::Uuid;

use super::{ScriptedGate, TestDatabase};

pub fn actor(email: &str) -> Actor {
    Actor::new(Uuid::new_v4(), email)
}

pub struct Feed {
    pub database: TestDatabase,
    pub service: CommentService,
    pub gate: Arc<ScriptedGate>,
    pub owner: Actor,
    pub post: Post,
}

impl Feed {
    pub async fn new() -> Self {
        Self::with_gate(ScriptedGate::accepting()).await
    }

    pub async fn with_gate(gate: ScriptedGate) -> Self {
        let database = TestDatabase::new().await;
        let gate = Arc::new(gate);
        let service = CommentService::new(
            database.db().clone(),
            gate.clone(),
            ModerationPolicy::default(),
            64,
        );

        let owner = actor("owner@example.com");
        let post = Post::new(owner.id, "seeded post");
        posts::insert_post(database.db().pool(), &post)
            .await
            .expect("Failed to seed post");

        Self {
            database,
            service,
            gate,
            owner,
            post,
        }
    }

    pub fn request(&self, parent: Option<Uuid>, text: &str) -> NewComment {
        NewComment {
            post_id: self.post.id,
            parent_id: parent,
            content: text.to_string(),
        }
    }

    /// Create a comment that must be accepted
    pub async fn comment(&self, author: &Actor, parent: Option<Uuid>, text: &str) -> Comment {
        match self.service.create(author, self.request(parent, text)).await {
            Ok(CreateOutcome::Created(comment)) => comment,
            other => panic!("Expected created comment, got {:?}", other),
        }
    }

    pub async fn post_count(&self) -> i64 {
        posts::find_post(self.database.db().pool(), self.post.id)
            .await
            .unwrap()
            .unwrap()
            .comments_count
    }

    pub async fn reload(&self, id: Uuid) -> Comment {
        comments::fetch_comment(self.database.db().pool(), id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn replies(&self, id: Uuid) -> i64 {
        self.reload(id).await.replies_count
    }

    /// Live comments counted straight from the table
    pub async fn live_rows(&self) -> i64 {
        let (n,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ? AND is_deleted = 0")
                .bind(self.post.id)
                .fetch_one(self.database.db().pool())
                .await
                .unwrap();
        n
    }

    /// Every stored counter equals the live data it summarises
    pub async fn assert_counters_consistent(&self) {
        assert_eq!(self.post_count().await, self.live_rows().await, "post comments_count drifted");

        let drift: Vec<(Uuid, i64, i64)> = sqlx::query_as(
            r#"
            SELECT c.id, c.replies_count,
                   (SELECT COUNT(*) FROM comments d WHERE d.parent_id = c.id AND d.is_deleted = 0)
            FROM comments c
            WHERE c.post_id = ? AND c.is_deleted = 0
            "#,
        )
        .bind(self.post.id)
        .fetch_all(self.database.db().pool())
        .await
        .unwrap()
        .into_iter()
        .filter(|(_, stored, actual)| stored != actual)
        .collect();
        assert!(drift.is_empty(), "replies_count drifted: {:?}", drift);
    }
}
