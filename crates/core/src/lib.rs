//! # Contacts Core
//!
//! Domain logic for managing a prisoner's contacts.
//!
//! This crate contains the journey state, navigation tables and form validation:
//! - Journeys: the in-progress answers of one wizard, kept in a capped per-session store
//! - Navigation: which page comes next or before, as plain functions over a state snapshot
//! - Validation: turning posted forms into typed answers or field error lists
//!
//! **No HTTP concerns**: routing, sessions, rendering and the backend client belong in
//! `contacts-web` and `contacts-api-client`.

pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod journey;
pub mod navigation;
pub mod validation;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use form::{resolve_field, resolve_from, FlashedForm};
pub use journey::{
    AddContactJourney, AddRestrictionJourney, ChangeRelationshipTypeJourney, Journey, JourneyMap,
};
pub use validation::{FieldError, FormValues, ValidationErrors, ValidationResult};
