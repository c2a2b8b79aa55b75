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


//! Book operations
//!
//! The book list is server-owned: the client holds transient copies for
//! display and editing, never caches across calls, and preserves server
//! ordering. After a mutation the app reloads the list rather than
//! patching local state.

use crate::api::client::ReadilyClient;
use crate::error::{ReadilyError, Result};
use serde::{Deserialize, Serialize};

/// A book record as returned by the server
///
/// The id is server-assigned; everything except the title is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Writable book fields, used for both create and update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookDraft {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl ReadilyClient {
    /// Fetch all books
    ///
    /// `GET books`. Order is whatever the server returned; no client-side
    /// re-sort.
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.get("/books").await
    }

    /// Search books by free-text query
    ///
    /// `GET books/search?query=`. The query is sent verbatim (transport
    /// percent-encoding only). A blank query means "show everything" and
    /// delegates to [`list_books`](Self::list_books), so callers see the
    /// same behavior the full list gives them.
    pub async fn search_books(&self, query: &str) -> Result<Vec<Book>> {
        if query.trim().is_empty() {
            return self.list_books().await;
        }

        self.get_with_query("/books/search", &[("query", query)]).await
    }

    /// Create a book
    ///
    /// `POST books`. The title is required; a blank one is rejected here,
    /// before any network call, matching the add-book form. Returns the
    /// created record with its server-assigned id.
    pub async fn create_book(&self, draft: &BookDraft) -> Result<Book> {
        if draft.title.trim().is_empty() {
            return Err(ReadilyError::MissingRequiredField("title".to_string()));
        }

        self.post("/books", draft).await
    }

    /// Update an existing book
    ///
    /// `PUT books/{id}`. Sends the draft as-is; the edit form pre-fills
    /// current values, and server-side validation messages surface
    /// unchanged.
    pub async fn update_book(&self, id: i64, draft: &BookDraft) -> Result<Book> {
        self.put(&format!("/books/{}", id), draft).await
    }

    /// Delete a book
    ///
    /// `DELETE books/{id}`. Returns the server acknowledgement verbatim.
    pub async fn delete_book(&self, id: i64) -> Result<serde_json::Value> {
        self.delete(&format!("/books/{}", id)).await
    }
}

// ===== TESTS =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ClientConfig;
    use crate::storage::{Database, SessionStore};

    #[test]
    fn test_book_deserializes_with_missing_optionals() {
        let book: Book = serde_json::from_str(r#"{"id": 7, "title": "Dune"}"#).unwrap();
        assert_eq!(book.id, 7);
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, None);
        assert_eq!(book.isbn, None);
        assert_eq!(book.description, None);
    }

    #[test]
    fn test_book_deserializes_null_optionals() {
        let raw = r#"{"id": 1, "title": "Dune", "author": null, "isbn": null, "description": null}"#;
        let book: Book = serde_json::from_str(raw).unwrap();
        assert_eq!(book.author, None);
    }

    #[test]
    fn test_draft_omits_absent_fields() {
        let draft = BookDraft::new("Dune");
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Dune"}));

        let draft = BookDraft {
            author: Some("Frank Herbert".to_string()),
            ..BookDraft::new("Dune")
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "Dune", "author": "Frank Herbert"})
        );
    }

    #[tokio::test]
    async fn test_create_book_rejects_blank_title_before_network() {
        // Base URL points nowhere; a network attempt would fail with a
        // NetworkError, so getting MissingRequiredField proves the local
        // check ran first.
        let db = Database::in_memory().await.unwrap();
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:9/api")
            .build();
        let client = ReadilyClient::with_config(SessionStore::new(db), config).unwrap();

        let err = client.create_book(&BookDraft::new("   ")).await.unwrap_err();
        assert!(matches!(err, ReadilyError::MissingRequiredField(ref f) if f == "title"));
    }
}
