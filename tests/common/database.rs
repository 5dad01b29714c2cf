//! Database test fixtures
//!
//! File-backed databases in a temporary directory, so several pooled
//! connections see the same data. Dropped with the fixture.

use socialfeed::backend::store::FeedDatabase;
use tempfile::TempDir;

/// Test database fixture
pub struct TestDatabase {
    db: FeedDatabase,
    _dir: TempDir,
}

impl TestDatabase {
    /// Create a fresh database with the schema applied
    pub async fn new() -> Self {
        Self::with_connections(4).await
    }

    pub async fn with_connections(max_connections: u32) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite:{}", dir.path().join("feed.db").display());
        let db = FeedDatabase::connect_url(&url, max_connections)
            .await
            .expect("Failed to open test database");
        Self { db, _dir: dir }
    }

    pub fn db(&self) -> &FeedDatabase {
        &self.db
    }

    pub fn dir(&self) -> &std::path::Path {
        self._dir.path()
    }
}
