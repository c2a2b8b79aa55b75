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


//! Readily Core - session and API layer for the Readily book tracker
//!
//! This crate is the device-side core behind the mobile app: it persists
//! the authenticated session, talks to the Readily HTTP API, and
//! normalizes every failure into a message the UI can display. Screens
//! live in the mobile shell and only ever call the operations exported
//! here.

pub mod api;
pub mod error;
pub mod storage;

pub use api::{Book, BookDraft, ClientConfig, Credentials, LoginResponse, ReadilyClient, Registration};
pub use error::{ReadilyError, Result};
pub use storage::{Database, Session, SessionStore};
