// Readily - Personal Book Tracker for Mobile
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Database connection and management
//!
//! This module handles the SQLite database backing the on-device
//! key-value store. The schema is a single `KeyValue` table; the session
//! store owns the keys it writes there.
//!
//! # Database Location
//! The mobile shell passes the platform-appropriate app data directory:
//! - Android: app-specific data directory
//! - iOS: app-specific documents directory
//! - Desktop (CLI): path given on the command line
//!
//! # SQLite Configuration
//! - WAL mode for better concurrency
//! - Normal synchronous mode (balance safety/speed)
//! - Busy timeout so concurrent in-flight operations queue instead of failing

use crate::error::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    ConnectOptions, Executor,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Database handle - wraps the connection pool used by the session store
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: Option<PathBuf>, // None for in-memory databases
}

impl Database {
    /// Open (or create) the on-device database at the given path
    ///
    /// # Errors
    /// Returns a storage error if:
    /// - Parent directory doesn't exist and can't be created
    /// - Database file can't be opened
    /// - Schema creation fails
    pub async fn new<P: AsRef<Path>>(database_path: P) -> Result<Self> {
        let path = database_path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let connection_string = format!("sqlite://{}?mode=rwc", path.display());
        let mut connect_opts = SqliteConnectOptions::from_str(&connection_string)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        // Disable statement logging; values written here include the token
        connect_opts = connect_opts.disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(connect_opts)
            .await?;

        let db = Self {
            pool,
            path: Some(path.to_path_buf()),
        };
        db.migrate().await?;

        tracing::debug!(path = %path.display(), "opened device database");
        Ok(db)
    }

    /// Create an in-memory database for testing
    ///
    /// Limited to a single connection: every pooled connection would
    /// otherwise get its own private `:memory:` database.
    pub async fn in_memory() -> Result<Self> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_opts)
            .await?;

        let db = Self { pool, path: None };
        db.migrate().await?;

        Ok(db)
    }

    /// Create the schema if it doesn't exist yet
    async fn migrate(&self) -> Result<()> {
        self.pool
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS KeyValue (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )
                "#,
            )
            .await?;

        Ok(())
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the pool; subsequent operations fail with a storage error
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// ===== TESTS =====

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_creates_schema() {
        let db = Database::in_memory().await.unwrap();
        // Schema exists: inserting into KeyValue succeeds
        sqlx::query("INSERT INTO KeyValue (key, value) VALUES ('k', 'v')")
            .execute(db.pool())
            .await
            .unwrap();
        assert!(db.path().is_none());
    }

    #[tokio::test]
    async fn test_on_disk_database_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("readily.db");
        let db = Database::new(&path).await.unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        assert!(path.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn test_reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readily.db");

        let db = Database::new(&path).await.unwrap();
        sqlx::query("INSERT INTO KeyValue (key, value) VALUES ('token', 'abc')")
            .execute(db.pool())
            .await
            .unwrap();
        db.close().await;

        let db = Database::new(&path).await.unwrap();
        let row: (String,) = sqlx::query_as("SELECT value FROM KeyValue WHERE key = 'token'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.0, "abc");
        db.close().await;
    }
}
