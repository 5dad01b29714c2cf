//! Descendant Resolver
//!
//! Computes the transitive closure of parent → child under a root comment by
//! iterative frontier expansion: each round fetches the direct children of
//! the whole frontier in one batched query. Depth is bounded only by the
//! data. A visited set stops corrupt cycles from looping.
//!
//! Every edge is followed, including edges through deleted comments; only
//! the reported set is filtered to live nodes.

use std::collections::HashSet;

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::backend::error::Result;
use crate::backend::store::comments;
use crate::shared::Comment;

/// Live part of a comment's subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtree {
    pub root_id: Uuid,
    /// Live nodes, root first when live, then in discovery order
    pub live: Vec<Uuid>,
    /// Every node reached, live or not
    pub visited: usize,
}

impl Subtree {
    /// How far the post counter should drop if the whole subtree is deleted
    pub fn live_count(&self) -> u64 {
        self.live.len() as u64
    }
}

/// Resolve the live subtree rooted at `root`
pub async fn resolve_live_subtree(conn: &mut SqliteConnection, root: &Comment) -> Result<Subtree> {
    let mut visited: HashSet<Uuid> = HashSet::from([root.id]);
    let mut live = Vec::new();
    if root.is_live() {
        live.push(root.id);
    }

    let mut frontier = vec![root.id];
    let mut rounds = 0usize;

    while !frontier.is_empty() {
        let edges = comments::fetch_children(&mut *conn, &frontier).await?;

        let mut next = Vec::with_capacity(edges.len());
        for edge in edges {
            if !visited.insert(edge.id) {
                tracing::warn!("Comment {} reached twice below {}; skipping", edge.id, root.id);
                continue;
            }
            if !edge.is_deleted {
                live.push(edge.id);
            }
            next.push(edge.id);
        }

        frontier = next;
        rounds += 1;
    }

    tracing::debug!(
        "Resolved subtree of {}: {} live of {} reached in {} rounds",
        root.id,
        live.len(),
        visited.len(),
        rounds
    );

    Ok(Subtree {
        root_id: root.id,
        live,
        visited: visited.len(),
    })
}
