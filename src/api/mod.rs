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


//! Readily API client
//!
//! One configured HTTP client plus the domain operations the app calls:
//! authentication and the book CRUD. Every operation is a single request
//! and response round trip with normalized errors; the client holds no
//! state between calls beyond the injected session store.

pub mod auth;
pub mod books;
pub mod client;

// Re-export commonly used types
pub use auth::{Credentials, LoginResponse, Registration, UserProfile};
pub use books::{Book, BookDraft};
pub use client::{ClientConfig, ReadilyClient};
