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


//! Authentication operations
//!
//! Login, registration, and the local session probes the app start
//! screen decides on. A successful login is the only operation that
//! writes to the session store; logout is the only one that clears it.
//!
//! Credentials are transient request values. They are never persisted
//! and never logged - on failure nothing is written anywhere.

use crate::api::client::ReadilyClient;
use crate::error::Result;
use crate::storage::Session;
use serde::{Deserialize, Serialize};

/// Opaque user profile as returned by the server at login
///
/// Stored verbatim and handed back to the UI; the client never
/// interprets it beyond presence checks.
pub type UserProfile = serde_json::Value;

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new<S: Into<String>>(email: S, password: S) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form data
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful login response: the bearer token plus the user profile
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

impl ReadilyClient {
    /// Authenticate against the API
    ///
    /// `POST auth/login`. On success the token and user are written to
    /// the session store before returning, so every later request goes
    /// out authenticated. On failure nothing is persisted.
    ///
    /// # Errors
    /// Normalized API error, or a storage error if the session cannot
    /// be saved after a successful response.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let response: LoginResponse = self.post("/auth/login", credentials).await?;

        self.session().save(&response.token, &response.user).await?;
        tracing::info!("login succeeded");

        Ok(response)
    }

    /// Create a new account
    ///
    /// `POST auth/register`. The server body is returned verbatim; the
    /// user still logs in afterwards, so no session is written here.
    pub async fn register(&self, registration: &Registration) -> Result<serde_json::Value> {
        self.post("/auth/register", registration).await
    }

    /// Read the cached session (local only, no network)
    ///
    /// Absent fields come back as `None`. Only an unavailable session
    /// store fails; a missing or corrupt session does not.
    pub async fn current_session(&self) -> Result<Session> {
        self.session().load().await
    }

    /// Log out by clearing the cached session (local only)
    ///
    /// Idempotent; the server keeps no session state to revoke.
    pub async fn logout(&self) -> Result<()> {
        self.session().clear().await?;
        tracing::info!("logged out");
        Ok(())
    }
}

// ===== TESTS =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_serialize_shape() {
        let creds = Credentials::new("a@b.com", "secret");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "a@b.com", "password": "secret"})
        );
    }

    #[test]
    fn test_registration_serialize_shape() {
        let reg = Registration {
            username: "reader".to_string(),
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "username": "reader",
                "email": "a@b.com",
                "password": "secret"
            })
        );
    }

    #[test]
    fn test_login_response_keeps_user_opaque() {
        let raw = r#"{"token": "tok1", "user": {"id": 1, "name": "A", "roles": ["x"]}}"#;
        let response: LoginResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.token, "tok1");
        assert_eq!(response.user["roles"][0], "x");
    }
}
