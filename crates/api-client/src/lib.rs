//! # Contacts API client
//!
//! Typed access to the contacts backend.
//!
//! Handles:
//! - The [`ContactsApi`] trait, the seam the web layer depends on
//! - [`ContactsApiClient`], its `reqwest` implementation with bearer-token auth
//! - [`ReferenceDataCache`], a TTL cache over the reference-code endpoint
//!
//! Every call is made on behalf of the signed-in user and takes their access token.

pub mod client;
pub mod error;
pub mod models;
pub mod reference;

pub use client::ContactsApiClient;
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use reference::ReferenceDataCache;

use async_trait::async_trait;
use contacts_types::{ReferenceCode, ReferenceCodeGroup};

/// Operations the UI needs from the contacts API.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// `POST /contact`, creating a contact and optionally its relationship to a prisoner.
    async fn create_contact(
        &self,
        request: &CreateContactRequest,
        token: &str,
    ) -> ApiResult<ContactCreationResult>;

    /// `POST /prisoner-contact`, linking an existing contact to a prisoner.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Conflict` when the relationship already exists.
    async fn add_contact_relationship(
        &self,
        request: &AddContactRelationshipRequest,
        token: &str,
    ) -> ApiResult<PrisonerContactRelationshipDetails>;

    /// `PATCH /prisoner-contact/{id}`
    async fn update_contact_relationship(
        &self,
        prisoner_contact_id: i64,
        request: &UpdateRelationshipRequest,
        token: &str,
    ) -> ApiResult<()>;

    /// `GET /contact/{id}`
    async fn get_contact(&self, contact_id: i64, token: &str) -> ApiResult<ContactDetails>;

    /// `GET /prisoner-contact/{id}`
    async fn get_prisoner_contact_relationship(
        &self,
        prisoner_contact_id: i64,
        token: &str,
    ) -> ApiResult<PrisonerContactRelationshipDetails>;

    /// `GET /prisoner/{prisonerNumber}/contact`
    async fn get_prisoner_contacts(
        &self,
        prisoner_number: &str,
        page: Pagination,
        token: &str,
    ) -> ApiResult<Page<PrisonerContactSummary>>;

    /// `GET /contact/search`
    async fn search_contacts(
        &self,
        request: &ContactSearchRequest,
        page: Pagination,
        token: &str,
    ) -> ApiResult<Page<ContactSearchResultItem>>;

    /// `GET /reference-codes/group/{group}`
    async fn get_reference_codes(
        &self,
        group: ReferenceCodeGroup,
        token: &str,
    ) -> ApiResult<Vec<ReferenceCode>>;

    /// `GET /prisoner-contact/{id}/restriction`
    async fn get_prisoner_contact_restrictions(
        &self,
        prisoner_contact_id: i64,
        token: &str,
    ) -> ApiResult<PrisonerContactRestrictions>;

    /// `POST /prisoner-contact/{id}/restriction`
    async fn create_prisoner_contact_restriction(
        &self,
        prisoner_contact_id: i64,
        request: &CreateRestrictionRequest,
        token: &str,
    ) -> ApiResult<PrisonerContactRestrictionDetails>;

    /// `POST /contact/{id}/restriction`
    async fn create_contact_global_restriction(
        &self,
        contact_id: i64,
        request: &CreateRestrictionRequest,
        token: &str,
    ) -> ApiResult<ContactGlobalRestrictionDetails>;

    /// `GET /contact/{id}/linked-prisoners`
    async fn get_linked_prisoners(
        &self,
        contact_id: i64,
        token: &str,
    ) -> ApiResult<Vec<LinkedPrisonerDetails>>;
}
