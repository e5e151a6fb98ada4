//! Identifier utilities.
//!
//! Journeys and sessions are addressed by random UUIDs that travel through URLs and cookies.
//! Because those values come back to the server from the browser, every identifier parsed from
//! the outside must be validated before it is used as a lookup key.
//!
//! This crate provides two wrapper types that *guarantee* a canonical format once constructed:
//! - [`JourneyId`] identifies one in-progress wizard instance inside a session.
//! - [`SessionId`] identifies one user session (carried in the session cookie).
//!
//! ## Canonical form
//! - Length: 36
//! - Lowercase hexadecimal groups separated by hyphens (`8-4-4-4-12`)
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! This is the same value you get from `Uuid::new_v4().hyphenated().to_string()`. Uppercase,
//! braced, URN or simple (un-hyphenated) forms are rejected rather than normalised, so a given
//! journey has exactly one URL.

mod id;

pub use id::{JourneyId, SessionId};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Error type for identifier parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UuidError {
    /// Input was not a canonical hyphenated lowercase UUID.
    #[error("Invalid identifier: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
