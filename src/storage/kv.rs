// Readily - Personal Book Tracker for Mobile
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Key-value storage operations
//!
//! Functions for reading and writing string entries in the `KeyValue`
//! table. This is the device storage facility the session store is built
//! on; keys are plain strings, values are stored verbatim.

use crate::error::Result;
use sqlx::SqlitePool;

/// Read a value by key
///
/// Returns `None` if the key has never been written or was removed.
pub async fn get_value(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM KeyValue WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(value,)| value))
}

/// Write a value, overwriting any existing entry for the key
pub async fn set_value(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO KeyValue (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove an entry; removing an absent key succeeds
pub async fn remove_value(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM KeyValue WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}

// ===== TESTS =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(get_value(db.pool(), "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let db = Database::in_memory().await.unwrap();
        set_value(db.pool(), "token", "tok1").await.unwrap();
        assert_eq!(
            get_value(db.pool(), "token").await.unwrap(),
            Some("tok1".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let db = Database::in_memory().await.unwrap();
        set_value(db.pool(), "token", "old").await.unwrap();
        set_value(db.pool(), "token", "new").await.unwrap();
        assert_eq!(
            get_value(db.pool(), "token").await.unwrap(),
            Some("new".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        set_value(db.pool(), "user", "{}").await.unwrap();
        remove_value(db.pool(), "user").await.unwrap();
        remove_value(db.pool(), "user").await.unwrap();
        assert_eq!(get_value(db.pool(), "user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_closed_pool_is_a_storage_error() {
        let db = Database::in_memory().await.unwrap();
        db.close().await;
        let err = get_value(db.pool(), "token").await.unwrap_err();
        assert!(err.is_storage_error());
    }
}
