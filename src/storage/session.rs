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


//! Session persistence
//!
//! The session is the authenticated identity cached on-device between app
//! launches: the bearer token plus the user profile the server returned at
//! login. This store owns both values exclusively; nothing else in the
//! crate writes them.
//!
//! A missing or corrupt entry loads as `None` so a damaged store never
//! blocks app startup. An unavailable backing store, by contrast, is a
//! real error and is reported as one - callers decide whether to treat it
//! as "logged out".

use crate::error::Result;
use crate::storage::{kv, Database};
use serde::{Deserialize, Serialize};

/// Storage key for the bearer token (raw string)
pub const TOKEN_KEY: &str = "token";
/// Storage key for the serialized user profile
pub const USER_KEY: &str = "user";

/// Authenticated identity state cached between app launches
///
/// The user profile is kept opaque: the server owns its shape and the
/// client only ever checks it for presence or hands it to the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<serde_json::Value>,
}

impl Session {
    /// Whether a token is present
    ///
    /// Presence is all the client checks; the server decides validity.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Durable store for the session, backed by the device database
#[derive(Debug, Clone)]
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist token and user, overwriting any existing session
    ///
    /// # Errors
    /// Storage failure propagates; a partially written session is
    /// possible only if the store fails between the two writes, and the
    /// next `save` or `clear` repairs it.
    pub async fn save(&self, token: &str, user: &serde_json::Value) -> Result<()> {
        let user_json = user.to_string();
        kv::set_value(self.db.pool(), TOKEN_KEY, token).await?;
        kv::set_value(self.db.pool(), USER_KEY, &user_json).await?;
        tracing::debug!("session saved");
        Ok(())
    }

    /// Load the cached session
    ///
    /// A missing token or an unparsable stored user yields `None` for
    /// that field rather than an error; only an unreadable backing store
    /// fails.
    pub async fn load(&self) -> Result<Session> {
        let token = kv::get_value(self.db.pool(), TOKEN_KEY).await?;
        let user = match kv::get_value(self.db.pool(), USER_KEY).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(error = %err, "stored user profile is corrupt, treating as absent");
                    None
                }
            },
            None => None,
        };

        Ok(Session { token, user })
    }

    /// Read only the token
    ///
    /// Hot path for the request interceptor: skips the user entry.
    pub async fn token(&self) -> Result<Option<String>> {
        kv::get_value(self.db.pool(), TOKEN_KEY).await
    }

    /// Remove token and user; clearing an empty session succeeds
    pub async fn clear(&self) -> Result<()> {
        kv::remove_value(self.db.pool(), TOKEN_KEY).await?;
        kv::remove_value(self.db.pool(), USER_KEY).await?;
        tracing::debug!("session cleared");
        Ok(())
    }
}

// ===== TESTS =====

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn store() -> SessionStore {
        SessionStore::new(Database::in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_empty_store_loads_absent_session() {
        let store = store().await;
        let session = store.load().await.unwrap();
        assert_eq!(session, Session::default());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let store = store().await;
        let user = json!({"id": 1, "name": "A"});
        store.save("tok1", &user).await.unwrap();

        let session = store.load().await.unwrap();
        assert_eq!(session.token.as_deref(), Some("tok1"));
        assert_eq!(session.user, Some(user));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_session() {
        let store = store().await;
        store.save("old", &json!({"id": 1})).await.unwrap();
        store.save("new", &json!({"id": 2})).await.unwrap();

        let session = store.load().await.unwrap();
        assert_eq!(session.token.as_deref(), Some("new"));
        assert_eq!(session.user, Some(json!({"id": 2})));
    }

    #[tokio::test]
    async fn test_clear_removes_both_fields_and_is_idempotent() {
        let store = store().await;
        store.save("tok1", &json!({"id": 1})).await.unwrap();

        store.clear().await.unwrap();
        store.clear().await.unwrap();

        let session = store.load().await.unwrap();
        assert_eq!(session.token, None);
        assert_eq!(session.user, None);
    }

    #[tokio::test]
    async fn test_corrupt_user_loads_as_absent_not_error() {
        let store = store().await;
        kv::set_value(store.db.pool(), TOKEN_KEY, "tok1").await.unwrap();
        kv::set_value(store.db.pool(), USER_KEY, "{not json").await.unwrap();

        let session = store.load().await.unwrap();
        assert_eq!(session.token.as_deref(), Some("tok1"));
        assert_eq!(session.user, None);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_an_error_not_empty_session() {
        let store = store().await;
        store.db.close().await;

        let err = store.load().await.unwrap_err();
        assert!(err.is_storage_error());
        let err = store.token().await.unwrap_err();
        assert!(err.is_storage_error());
    }
}
