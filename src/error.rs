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


//! Error types for Readily Core
//!
//! This module defines error types using thiserror for ergonomic error
//! handling. Errors are categorized by domain (network, server, storage,
//! validation) so callers can route them without string matching.
//!
//! Every variant normalizes to a single displayable string via
//! [`ReadilyError::user_message`]; the presentation layer renders that
//! string and nothing else. No error here is fatal to the process.

use thiserror::Error;

/// Result type alias using our ReadilyError type
pub type Result<T> = std::result::Result<T, ReadilyError>;

/// Fallback message shown whenever the server didn't supply one
pub const GENERIC_ERROR_MESSAGE: &str = "Network error";

/// Main error type for Readily Core
///
/// Each variant carries enough context to log and display the failure.
#[derive(Error, Debug)]
pub enum ReadilyError {
    // ===== Network Errors =====

    /// Transport-level failure: no response was received at all
    /// (connection refused, DNS failure, timeout)
    #[error("Network error: {message}")]
    NetworkError { message: String },

    // ===== Server Errors =====

    /// The server answered with a non-2xx status
    #[error("Server error: {message}")]
    ServerError {
        message: String,
        /// HTTP status code if available
        status_code: Option<u16>,
        /// API endpoint that failed
        endpoint: Option<String>,
    },

    /// The server answered 2xx but the body could not be decoded
    #[error("Invalid API response: {message}")]
    InvalidApiResponse {
        message: String,
        /// Response body snippet for debugging
        response_body: Option<String>,
    },

    // ===== Storage Errors =====

    /// Local persistence read/write failure (session store unavailable)
    #[error("Storage error: {0}")]
    StorageError(String),

    // ===== Validation Errors =====

    /// Required field is missing or blank
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Generic input validation error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// Conversions from external error types.
// reqwest errors are transport failures by the time they surface here;
// non-2xx statuses are handled explicitly in the client and never reach
// this conversion.
impl From<reqwest::Error> for ReadilyError {
    fn from(err: reqwest::Error) -> Self {
        ReadilyError::NetworkError {
            message: format!("Request failed: {}", err),
        }
    }
}

impl From<sqlx::Error> for ReadilyError {
    fn from(err: sqlx::Error) -> Self {
        ReadilyError::StorageError(format!("Session store error: {}", err))
    }
}

impl From<std::io::Error> for ReadilyError {
    fn from(err: std::io::Error) -> Self {
        ReadilyError::StorageError(format!("I/O error: {}", err))
    }
}

// Helper methods for creating common errors
impl ReadilyError {
    /// Create a NetworkError with a message
    pub fn network<S: Into<String>>(message: S) -> Self {
        ReadilyError::NetworkError {
            message: message.into(),
        }
    }

    /// Create a ServerError with status and endpoint context
    pub fn server<S: Into<String>>(
        message: S,
        status_code: Option<u16>,
        endpoint: Option<String>,
    ) -> Self {
        ReadilyError::ServerError {
            message: message.into(),
            status_code,
            endpoint,
        }
    }

    /// Create a StorageError with a message
    pub fn storage<S: Into<String>>(message: S) -> Self {
        ReadilyError::StorageError(message.into())
    }

    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        ReadilyError::InvalidInput(message.into())
    }

    /// Check if error means the user needs to authenticate again
    ///
    /// Returns `true` for 401/403 responses so the presentation layer can
    /// route back to the login screen instead of showing a toast.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ReadilyError::ServerError {
                status_code: Some(401 | 403),
                ..
            }
        )
    }

    /// Check if error came from the local session store rather than the API
    pub fn is_storage_error(&self) -> bool {
        matches!(self, ReadilyError::StorageError(_))
    }

    /// Get the normalized, user-displayable message for this error
    ///
    /// Server-supplied messages are surfaced unchanged; everything without
    /// one falls back to the generic network failure message the app has
    /// always shown.
    pub fn user_message(&self) -> String {
        match self {
            ReadilyError::ServerError { message, .. } => message.clone(),
            ReadilyError::StorageError(message) => message.clone(),
            ReadilyError::MissingRequiredField(field) => {
                format!("{} is required", capitalize(field))
            }
            ReadilyError::InvalidInput(message) => message.clone(),
            ReadilyError::NetworkError { .. } | ReadilyError::InvalidApiResponse { .. } => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ===== TESTS =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_surfaces_unchanged() {
        let err = ReadilyError::server("Invalid credentials", Some(401), Some("/auth/login".into()));
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_network_error_normalizes_to_generic_message() {
        let err = ReadilyError::network("connection refused by 10.0.0.1:3000");
        assert_eq!(err.user_message(), "Network error");
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_invalid_response_normalizes_to_generic_message() {
        let err = ReadilyError::InvalidApiResponse {
            message: "expected value at line 1".to_string(),
            response_body: Some("<html>".to_string()),
        };
        assert_eq!(err.user_message(), "Network error");
    }

    #[test]
    fn test_missing_field_message() {
        let err = ReadilyError::MissingRequiredField("title".to_string());
        assert_eq!(err.user_message(), "Title is required");
    }

    #[test]
    fn test_storage_error_categorized() {
        let err: ReadilyError = sqlx::Error::PoolClosed.into();
        assert!(err.is_storage_error());
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_forbidden_is_auth_error() {
        let err = ReadilyError::server("Forbidden", Some(403), None);
        assert!(err.is_auth_error());
        let err = ReadilyError::server("Conflict", Some(409), None);
        assert!(!err.is_auth_error());
    }
}
