//! Database test fixtures
//!
//! Every test gets its own database: in-memory for most tests, a file in a
//! temporary directory when a test needs to reopen the same data.

use sqlx::SqlitePool;
use tempfile::TempDir;
use xftodo::backend::server::load_database;

/// Fresh in-memory database with migrations applied
pub async fn test_pool() -> SqlitePool {
    load_database("sqlite::memory:")
        .await
        .expect("Failed to create in-memory test database")
}

/// File-backed test database that can be closed and reopened
pub struct FileDatabase {
    dir: TempDir,
}

impl FileDatabase {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.dir.path().join("xftodo.db").display())
    }

    /// Open a new pool on the same file
    pub async fn open(&self) -> SqlitePool {
        load_database(&self.url())
            .await
            .expect("Failed to open file test database")
    }
}
