//! # Contacts Web
//!
//! Server-rendered UI for managing a prisoner's contacts.
//!
//! Handles:
//! - Routing with axum and per-request sessions
//! - The add-contact, add-restriction and change-relationship-type wizards
//! - HTML rendering with minijinja
//!
//! Uses `contacts-core` for journey state, navigation and validation, and `contacts-api-client`
//! for every read and write of contact data.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
pub mod user;

pub use error::{AppError, AppResult};
pub use routes::router;
pub use state::AppState;
