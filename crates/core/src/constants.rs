//! Constants used throughout the contacts core crate.
//!
//! Field limits mirror the column sizes enforced by the contacts API so that a form never
//! validates locally and then fails on submission.

/// Default listen address for the web server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Default timeout for a single contacts API call, in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 20;

/// Default lifetime of cached reference codes, in seconds.
pub const DEFAULT_REFERENCE_DATA_TTL_SECS: u64 = 60 * 60;

/// Default idle lifetime of a session, in seconds.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;

/// Journeys of one type kept per session before the least recently touched is evicted.
pub const DEFAULT_MAX_JOURNEYS_PER_FLOW: usize = 5;

/// Role that allows a user to record a contact as an approved visitor.
pub const APPROVE_VISITORS_ROLE: &str = "CONTACTS_AUTHORISER";

/// Maximum length of contact name parts.
pub const MAX_NAME_LENGTH: usize = 35;

/// Maximum length of relationship comments.
pub const MAX_RELATIONSHIP_COMMENTS_LENGTH: usize = 240;

/// Maximum length of a phone number.
pub const MAX_PHONE_NUMBER_LENGTH: usize = 20;

/// Maximum length of a phone extension.
pub const MAX_PHONE_EXTENSION_LENGTH: usize = 7;

/// Maximum length of an email address.
pub const MAX_EMAIL_LENGTH: usize = 240;

/// Maximum length of an identity document number.
pub const MAX_IDENTITY_VALUE_LENGTH: usize = 20;

/// Maximum length of an identity document issuing authority.
pub const MAX_ISSUING_AUTHORITY_LENGTH: usize = 40;

/// Maximum comment length on a prisoner-contact restriction.
pub const MAX_PRISONER_CONTACT_RESTRICTION_COMMENT_LENGTH: usize = 255;

/// Maximum comment length on a contact-global restriction.
pub const MAX_CONTACT_GLOBAL_RESTRICTION_COMMENT_LENGTH: usize = 240;

/// Identity document type code for Police National Computer numbers.
pub const PNC_IDENTITY_TYPE: &str = "PNC";

/// Results shown per page on the contact search page.
pub const SEARCH_PAGE_SIZE: u32 = 10;
