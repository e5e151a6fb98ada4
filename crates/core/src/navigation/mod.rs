//! Navigation resolver.
//!
//! Every wizard is described as an explicit finite-state table: each step knows its successor,
//! its predecessor and whether it is skipped for the current journey state. The tables are pure
//! functions of a small navigation state derived from the journey, so they can be exercised
//! without any HTTP machinery. Controllers mutate the journey first and only then ask the table
//! where to go.

pub mod contact;
pub mod relationship;
pub mod restriction;
pub mod urls;

pub use contact::{ContactFlow, ContactNavigationState, ContactStep};
pub use relationship::RelationshipTypeStep;
pub use restriction::{RestrictionNavigationState, RestrictionStep};
