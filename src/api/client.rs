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


//! HTTP client for the Readily API
//!
//! One configured client bound to one base URL, shared by every domain
//! operation. Two responsibilities live here and nowhere else:
//!
//! - **Bearer injection**: before every outgoing request the current
//!   token is read from the session store and attached as
//!   `Authorization: Bearer <token>`. If the store read fails, the
//!   request fails with a storage error - it is never sent
//!   unauthenticated while a token might exist.
//! - **Error normalization**: transport failures, non-2xx statuses, and
//!   undecodable bodies all collapse into [`ReadilyError`] values with a
//!   single displayable message, preferring whatever `message` the
//!   server put in the response body.
//!
//! Each call is attempted exactly once. No retries, no backoff, no
//! caching; the app reloads after mutations instead of reconciling
//! interleaved responses.
//!
//! # Example
//! ```rust,no_run
//! use readily_core::api::client::{ClientConfig, ReadilyClient};
//! use readily_core::storage::{Database, SessionStore};
//!
//! # async fn example() -> readily_core::Result<()> {
//! let db = Database::new("./readily.db").await?;
//! let sessions = SessionStore::new(db);
//! let client = ReadilyClient::new(sessions)?;
//!
//! let books = client.list_books().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{ReadilyError, Result, GENERIC_ERROR_MESSAGE};
use crate::storage::SessionStore;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Default API origin used by development builds
const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Default request timeout in seconds (transport default, never overridden per call)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much of an undecodable response body to keep for debugging
const RESPONSE_SNIPPET_LEN: usize = 800;

/// Configuration for ReadilyClient
///
/// Constructed once at startup and handed to the client; there is no
/// ambient singleton to reconfigure later.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin including the `/api` prefix all paths are relative to
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: "Readily/0.1.0 (readily-core)".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for ClientConfig
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client for the Readily API
///
/// Owns one `reqwest::Client` and the injected [`SessionStore`]. Every
/// domain operation (auth, books) is implemented as a method on this type
/// in its own module.
#[derive(Debug, Clone)]
pub struct ReadilyClient {
    /// Underlying HTTP client
    client: Client,
    /// Validated base URL with no trailing slash
    base_url: String,
    /// Session store consulted on every outgoing request
    session: SessionStore,
}

impl ReadilyClient {
    /// Create a client with default configuration
    pub fn new(session: SessionStore) -> Result<Self> {
        Self::with_config(session, ClientConfig::default())
    }

    /// Create a client with custom configuration
    ///
    /// # Errors
    /// Returns error if the base URL is not a valid absolute URL or the
    /// HTTP client cannot be built.
    pub fn with_config(session: SessionStore, config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ReadilyError::invalid_input(format!("Invalid base URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ReadilyError::invalid_input(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the injected session store
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Perform a GET request
    pub(crate) async fn get<T>(&self, endpoint: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.request(Method::GET, endpoint, None::<&()>, None).await
    }

    /// Perform a GET request with query parameters
    ///
    /// Values are percent-encoded by the transport; nothing is escaped or
    /// rewritten client-side beyond that.
    pub(crate) async fn get_with_query<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.request(Method::GET, endpoint, None::<&()>, Some(query)).await
    }

    /// Perform a POST request with a JSON body
    pub(crate) async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, Some(body), None).await
    }

    /// Perform a PUT request with a JSON body
    pub(crate) async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, Some(body), None).await
    }

    /// Perform a DELETE request
    pub(crate) async fn delete<T>(&self, endpoint: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.request(Method::DELETE, endpoint, None::<&()>, None).await
    }

    /// Single round trip: attach bearer header, send once, normalize
    ///
    /// # Errors
    /// - `StorageError` if the token cannot be read (request not sent)
    /// - `NetworkError` on transport failure
    /// - `ServerError` on non-2xx, carrying the server message if any
    /// - `InvalidApiResponse` on an undecodable 2xx body
    async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        query: Option<&[(&str, &str)]>,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        // Token read is on the critical path on purpose: a failing store
        // must fail the request, not silently drop the header.
        let headers = self.bearer_headers().await?;

        tracing::debug!(%method, endpoint, "sending API request");

        let mut builder = self.client.request(method, &url).headers(headers);
        if let Some(q) = query {
            builder = builder.query(q);
        }
        if let Some(b) = body {
            builder = builder.json(b);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ReadilyError::network(format!("Request to {} failed: {}", endpoint, e)))?;

        self.handle_response(response).await
    }

    /// Build the Authorization header from the stored token, if present
    async fn bearer_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(token) = self.session.token().await? {
            let value = format!("Bearer {}", token);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&value)
                    .map_err(|e| ReadilyError::invalid_input(format!("Invalid token: {}", e)))?,
            );
        }

        Ok(headers)
    }

    /// Normalize a response into `T` or a ReadilyError
    async fn handle_response<T>(&self, response: Response) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let endpoint = response.url().path().to_string();

        if status.is_success() {
            let text = response.text().await.map_err(|e| {
                ReadilyError::network(format!("Failed to read response body: {}", e))
            })?;

            // Some acknowledgement responses have no body at all
            let text = if text.trim().is_empty() {
                "null".to_string()
            } else {
                text
            };

            serde_json::from_str::<T>(&text).map_err(|e| {
                tracing::warn!(endpoint, error = %e, "undecodable API response");
                ReadilyError::InvalidApiResponse {
                    message: format!("Parse error: {}", e),
                    response_body: Some(snippet(&text)),
                }
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            let message =
                extract_server_message(&body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

            tracing::debug!(endpoint, status = status.as_u16(), "API request rejected");

            Err(ReadilyError::server(
                message,
                Some(status.as_u16()),
                Some(endpoint),
            ))
        }
    }
}

/// Pull a server-supplied `message` field out of an error body
///
/// The API reports failures as `{"message": "..."}`. Anything else
/// (empty body, HTML error page, unexpected JSON) yields `None` and the
/// caller falls back to the generic message.
fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

fn snippet(text: &str) -> String {
    if text.len() <= RESPONSE_SNIPPET_LEN {
        return text.to_string();
    }
    let mut end = RESPONSE_SNIPPET_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

// ===== TESTS =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    async fn test_client(config: ClientConfig) -> Result<ReadilyClient> {
        let db = Database::in_memory().await.unwrap();
        ReadilyClient::with_config(SessionStore::new(db), config)
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::builder()
            .base_url("https://readily.example.com/api")
            .timeout(Duration::from_secs(60))
            .user_agent("TestAgent/1.0")
            .build();

        assert_eq!(config.base_url, "https://readily.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "TestAgent/1.0");
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_normalized() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:3000/api/")
            .build();
        let client = test_client(config).await.unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_rejected() {
        let config = ClientConfig::builder().base_url("not a url").build();
        let result = test_client(config).await;
        assert!(matches!(result, Err(ReadilyError::InvalidInput(_))));
    }

    #[test]
    fn test_extract_server_message() {
        assert_eq!(
            extract_server_message(r#"{"message": "Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
        assert_eq!(extract_server_message(r#"{"error": "nope"}"#), None);
        assert_eq!(extract_server_message("<html>502</html>"), None);
        assert_eq!(extract_server_message(""), None);
        assert_eq!(extract_server_message(r#"{"message": 42}"#), None);
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let text = "é".repeat(RESPONSE_SNIPPET_LEN); // 2 bytes per char
        let s = snippet(&text);
        assert!(s.len() <= RESPONSE_SNIPPET_LEN);
        assert!(text.starts_with(&s));
    }
}
