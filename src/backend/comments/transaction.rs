//! Transaction Coordinator
//!
//! Runs a unit of comment work inside one store transaction: begin, run the
//! body, commit on success, roll back on error. The transaction handle is
//! released on every exit path. If the caller's future is dropped mid-body,
//! the uncommitted `sqlx::Transaction` rolls back when it is dropped.
//!
//! # Usage
//!
//! ```rust,no_run
//! use socialfeed::backend::comments::TransactionCoordinator;
//! use socialfeed::backend::store::FeedDatabase;
//!
//! # async fn example(db: FeedDatabase) -> socialfeed::backend::error::Result<()> {
//! let coordinator = TransactionCoordinator::new(db);
//! let live: i64 = coordinator
//!     .run("count", |tx| {
//!         Box::pin(async move {
//!             let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
//!                 .fetch_one(&mut **tx)
//!                 .await?;
//!             Ok(n)
//!         })
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use futures_util::future::BoxFuture;
use sqlx::{Sqlite, Transaction};

use crate::backend::error::Result;
use crate::backend::store::FeedDatabase;

/// Scoped transaction runner
#[derive(Debug, Clone)]
pub struct TransactionCoordinator {
    db: FeedDatabase,
}

impl TransactionCoordinator {
    pub fn new(db: FeedDatabase) -> Self {
        Self { db }
    }

    /// Run `body` atomically
    ///
    /// Every write the body performs commits together or not at all. Body
    /// errors are returned unchanged after the rollback.
    pub async fn run<T, F>(&self, label: &'static str, body: F) -> Result<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut Transaction<'static, Sqlite>) -> BoxFuture<'c, Result<T>> + Send,
    {
        let mut tx = self.db.begin().await?;
        tracing::debug!("[{}] transaction opened", label);

        let outcome = body(&mut tx).await;

        match outcome {
            Ok(value) => {
                tx.commit().await?;
                tracing::debug!("[{}] transaction committed", label);
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("[{}] rollback failed: {}", label, rollback_err);
                }
                tracing::warn!("[{}] transaction rolled back: {}", label, err);
                Err(err)
            }
        }
    }
}
