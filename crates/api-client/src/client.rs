//! `reqwest` implementation of [`ContactsApi`].

use crate::models::*;
use crate::{ApiError, ApiResult, ContactsApi};
use async_trait::async_trait;
use contacts_types::{ReferenceCode, ReferenceCodeGroup};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the contacts API.
#[derive(Debug, Clone)]
pub struct ContactsApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ContactsApiClient {
    /// Builds a client for the API rooted at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Absolute URL of the API; a trailing `/` is added if missing.
    /// * `timeout` - Overall timeout applied to every request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if `base_url` does not parse, or `ApiError::Transport` if the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let normalised = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::Url(format!("{base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|source| ApiError::Transport {
                path: base_url.to_string(),
                source,
            })?;
        Ok(Self { base_url, http })
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Url(format!("{path}: {e}")))
    }

    async fn send(&self, request: RequestBuilder, path: &str, token: &str) -> ApiResult<Response> {
        tracing::debug!(path, "calling contacts API");
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                path: path.to_string(),
                source,
            })?;
        check_status(response, path).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
        token: &str,
    ) -> ApiResult<T> {
        self.send(request, path, token)
            .await?
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode {
                path: path.to_string(),
                source,
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        token: &str,
    ) -> ApiResult<T> {
        let request = self.http.get(self.url(path)?).query(query);
        self.send_json(request, path, token).await
    }
}

async fn check_status(response: Response, path: &str) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::NOT_FOUND => Err(ApiError::NotFound {
            path: path.to_string(),
        }),
        StatusCode::CONFLICT => Err(ApiError::Conflict {
            path: path.to_string(),
        }),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl ContactsApi for ContactsApiClient {
    async fn create_contact(
        &self,
        request: &CreateContactRequest,
        token: &str,
    ) -> ApiResult<ContactCreationResult> {
        let path = "/contact";
        let builder = self.http.post(self.url(path)?).json(request);
        self.send_json(builder, path, token).await
    }

    async fn add_contact_relationship(
        &self,
        request: &AddContactRelationshipRequest,
        token: &str,
    ) -> ApiResult<PrisonerContactRelationshipDetails> {
        let path = "/prisoner-contact";
        let builder = self.http.post(self.url(path)?).json(request);
        self.send_json(builder, path, token).await
    }

    async fn update_contact_relationship(
        &self,
        prisoner_contact_id: i64,
        request: &UpdateRelationshipRequest,
        token: &str,
    ) -> ApiResult<()> {
        let path = format!("/prisoner-contact/{prisoner_contact_id}");
        let builder = self.http.patch(self.url(&path)?).json(request);
        self.send(builder, &path, token).await?;
        Ok(())
    }

    async fn get_contact(&self, contact_id: i64, token: &str) -> ApiResult<ContactDetails> {
        self.get_json(&format!("/contact/{contact_id}"), &[], token)
            .await
    }

    async fn get_prisoner_contact_relationship(
        &self,
        prisoner_contact_id: i64,
        token: &str,
    ) -> ApiResult<PrisonerContactRelationshipDetails> {
        self.get_json(&format!("/prisoner-contact/{prisoner_contact_id}"), &[], token)
            .await
    }

    async fn get_prisoner_contacts(
        &self,
        prisoner_number: &str,
        page: Pagination,
        token: &str,
    ) -> ApiResult<Page<PrisonerContactSummary>> {
        self.get_json(
            &format!("/prisoner/{prisoner_number}/contact"),
            &page.query_pairs(),
            token,
        )
        .await
    }

    async fn search_contacts(
        &self,
        request: &ContactSearchRequest,
        page: Pagination,
        token: &str,
    ) -> ApiResult<Page<ContactSearchResultItem>> {
        self.get_json("/contact/search", &request.query_pairs(&page), token)
            .await
    }

    async fn get_reference_codes(
        &self,
        group: ReferenceCodeGroup,
        token: &str,
    ) -> ApiResult<Vec<ReferenceCode>> {
        self.get_json(&format!("/reference-codes/group/{group}"), &[], token)
            .await
    }

    async fn get_prisoner_contact_restrictions(
        &self,
        prisoner_contact_id: i64,
        token: &str,
    ) -> ApiResult<PrisonerContactRestrictions> {
        self.get_json(
            &format!("/prisoner-contact/{prisoner_contact_id}/restriction"),
            &[],
            token,
        )
        .await
    }

    async fn create_prisoner_contact_restriction(
        &self,
        prisoner_contact_id: i64,
        request: &CreateRestrictionRequest,
        token: &str,
    ) -> ApiResult<PrisonerContactRestrictionDetails> {
        let path = format!("/prisoner-contact/{prisoner_contact_id}/restriction");
        let builder = self.http.post(self.url(&path)?).json(request);
        self.send_json(builder, &path, token).await
    }

    async fn create_contact_global_restriction(
        &self,
        contact_id: i64,
        request: &CreateRestrictionRequest,
        token: &str,
    ) -> ApiResult<ContactGlobalRestrictionDetails> {
        let path = format!("/contact/{contact_id}/restriction");
        let builder = self.http.post(self.url(&path)?).json(request);
        self.send_json(builder, &path, token).await
    }

    async fn get_linked_prisoners(
        &self,
        contact_id: i64,
        token: &str,
    ) -> ApiResult<Vec<LinkedPrisonerDetails>> {
        self.get_json(&format!("/contact/{contact_id}/linked-prisoners"), &[], token)
            .await
    }
}
