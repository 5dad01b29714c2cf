//! # Feed Database Module
//!
//! SQLite persistence for posts, comments and the activity ledger.
//!
//! ## Key Components
//!
//! - `FeedDatabase`: connection pool, schema setup and transaction entry point
//! - `schema.sql`: table, index and trigger definitions
//! - `comments.rs`: comment record reads and writes
//! - `posts.rs`: the post collaborator (existence, ownership)
//! - `actions.rs`: activity ledger rows written after commit
//!
//! ## Transactions
//!
//! Every write function takes `&mut Transaction<'_, Sqlite>`, so a store write
//! cannot run outside an enclosing transaction. Transactions open with
//! `BEGIN IMMEDIATE`: the write lock is taken up front, so concurrent writers
//! queue on `busy_timeout` instead of failing on a lock upgrade.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use socialfeed::backend::store::FeedDatabase;
//!
//! # async fn example() -> Result<(), sqlx::Error> {
//! let db = FeedDatabase::connect_url("sqlite:/tmp/feed.db", 4).await?;
//! let mut tx = db.begin().await?;
//! // ... store writes ...
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod comments;
pub mod posts;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Result as SqlxResult, Sqlite, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Result type for store operations
pub type Result<T> = SqlxResult<T>;

/// Current database schema version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// How long a writer waits for the write lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest number of bound ids per `IN (...)` list
pub(crate) const MAX_BIND_CHUNK: usize = 500;

/// Feed database connection manager
#[derive(Debug, Clone)]
pub struct FeedDatabase {
    pool: SqlitePool,
}

impl FeedDatabase {
    /// Open or create the database at `database_url`
    ///
    /// Creates the parent directory and the file if missing, enables WAL and
    /// foreign keys, and applies the schema.
    pub async fn connect_url(database_url: &str, max_connections: u32) -> Result<Self> {
        if let Some(parent) = database_file(database_url).and_then(|path| path.parent()) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Private in-memory database on a single connection
    ///
    /// An in-memory SQLite database lives and dies with its connection, so
    /// the pool never recycles it.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Apply the schema and record its version
    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(include_str!("schema.sql"))
            .execute(&self.pool)
            .await?;

        let (current_version,): (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await?;

        if current_version < CURRENT_SCHEMA_VERSION {
            sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
                .bind(CURRENT_SCHEMA_VERSION)
                .bind(chrono::Utc::now())
                .execute(&self.pool)
                .await?;
            tracing::info!("Applied feed schema version {}", CURRENT_SCHEMA_VERSION);
        }

        Ok(())
    }

    /// Open a write transaction
    ///
    /// Dropping the returned handle without committing rolls it back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool.begin_with("BEGIN IMMEDIATE").await
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Row counts, for diagnostics and tests
    pub async fn get_stats(&self) -> Result<DatabaseStats> {
        let (posts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        let (live_comments,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM comments WHERE is_deleted = 0")
                .fetch_one(&self.pool)
                .await?;
        let (deleted_comments,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM comments WHERE is_deleted = 1")
                .fetch_one(&self.pool)
                .await?;
        let (actions,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM actions")
            .fetch_one(&self.pool)
            .await?;

        Ok(DatabaseStats {
            post_count: posts as u64,
            live_comment_count: live_comments as u64,
            deleted_comment_count: deleted_comments as u64,
            action_count: actions as u64,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub post_count: u64,
    pub live_comment_count: u64,
    pub deleted_comment_count: u64,
    pub action_count: u64,
}

/// File path behind a `sqlite:` URL, if it names a file
fn database_file(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(Path::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_creation() {
        let db = FeedDatabase::in_memory().await.unwrap();
        let stats = db.get_stats().await.unwrap();
        assert_eq!(
            stats,
            DatabaseStats {
                post_count: 0,
                live_comment_count: 0,
                deleted_comment_count: 0,
                action_count: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_file_database_reopens_with_schema() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("nested").join("feed.db").display());

        let first = FeedDatabase::connect_url(&url, 2).await.unwrap();
        first.pool().close().await;

        let second = FeedDatabase::connect_url(&url, 2).await.unwrap();
        let (versions,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schema_migrations")
            .fetch_one(second.pool())
            .await
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_database_file_parsing() {
        assert_eq!(database_file("sqlite:/tmp/feed.db"), Some(Path::new("/tmp/feed.db")));
        assert_eq!(database_file("sqlite:///tmp/feed.db?mode=rwc"), Some(Path::new("/tmp/feed.db")));
        assert_eq!(database_file("sqlite::memory:"), None);
        assert_eq!(database_file("postgres://x"), None);
    }
}
