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


//! On-device storage
//!
//! All durable state the app keeps locally: a SQLite-backed key-value
//! store holding the cached session (bearer token + user profile).
//! Nothing here touches the network.
//!
//! # Usage Example
//! ```no_run
//! use readily_core::storage::{Database, SessionStore};
//!
//! # async fn example() -> readily_core::Result<()> {
//! let db = Database::new("./readily.db").await?;
//! let sessions = SessionStore::new(db);
//!
//! let session = sessions.load().await?;
//! if !session.is_authenticated() {
//!     // show the login screen
//! }
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod kv;
pub mod session;

// Re-export commonly used types
pub use database::Database;
pub use session::{Session, SessionStore, TOKEN_KEY, USER_KEY};
