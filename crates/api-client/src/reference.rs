//! Reference-code cache using moka
//!
//! Reference codes change rarely, so each group is fetched once and reused until the TTL lapses.
//! Concurrent misses may fetch the same group twice; the later insert wins.

use crate::{ApiResult, ContactsApi};
use contacts_types::{ReferenceCode, ReferenceCodeGroup};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Groups the API publishes; used as the cache capacity.
const GROUP_COUNT: u64 = 6;

#[derive(Clone)]
pub struct ReferenceDataCache {
    api: Arc<dyn ContactsApi>,
    inner: Cache<ReferenceCodeGroup, Arc<Vec<ReferenceCode>>>,
}

impl ReferenceDataCache {
    pub fn new(api: Arc<dyn ContactsApi>, ttl: Duration) -> Self {
        Self {
            api,
            inner: Cache::builder()
                .max_capacity(GROUP_COUNT)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Active codes of `group`, sorted by display order then description.
    ///
    /// # Errors
    ///
    /// Propagates the API error when the group is not cached and cannot be fetched.
    pub async fn codes(
        &self,
        group: ReferenceCodeGroup,
        token: &str,
    ) -> ApiResult<Arc<Vec<ReferenceCode>>> {
        if let Some(codes) = self.inner.get(&group).await {
            return Ok(codes);
        }
        tracing::debug!(%group, "fetching reference codes");
        let mut codes: Vec<ReferenceCode> = self
            .api
            .get_reference_codes(group, token)
            .await?
            .into_iter()
            .filter(|c| c.is_active)
            .collect();
        codes.sort_by(|a, b| {
            a.display_order
                .unwrap_or(i32::MAX)
                .cmp(&b.display_order.unwrap_or(i32::MAX))
                .then_with(|| a.description.cmp(&b.description))
        });
        let codes = Arc::new(codes);
        self.inner.insert(group, codes.clone()).await;
        Ok(codes)
    }

    /// Description of `code` in `group`, falling back to the code itself when unknown.
    pub async fn describe(
        &self,
        group: ReferenceCodeGroup,
        code: &str,
        token: &str,
    ) -> ApiResult<String> {
        let codes = self.codes(group, token).await?;
        Ok(codes
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.description.clone())
            .unwrap_or_else(|| code.to_string()))
    }

    /// Drops every cached group.
    #[cfg(test)]
    pub(crate) fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use crate::ApiError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingApi {
        calls: AtomicUsize,
    }

    fn code(code: &str, description: &str, order: Option<i32>, active: bool) -> ReferenceCode {
        ReferenceCode {
            group_code: ReferenceCodeGroup::SocialRelationship,
            code: code.into(),
            description: description.into(),
            display_order: order,
            is_active: active,
        }
    }

    fn unsupported<T>() -> ApiResult<T> {
        Err(ApiError::Status {
            path: "unsupported".into(),
            status: 500,
            body: String::new(),
        })
    }

    #[async_trait]
    impl ContactsApi for CountingApi {
        async fn create_contact(&self, _: &CreateContactRequest, _: &str) -> ApiResult<ContactCreationResult> {
            unsupported()
        }
        async fn add_contact_relationship(
            &self,
            _: &AddContactRelationshipRequest,
            _: &str,
        ) -> ApiResult<PrisonerContactRelationshipDetails> {
            unsupported()
        }
        async fn update_contact_relationship(&self, _: i64, _: &UpdateRelationshipRequest, _: &str) -> ApiResult<()> {
            unsupported()
        }
        async fn get_contact(&self, _: i64, _: &str) -> ApiResult<ContactDetails> {
            unsupported()
        }
        async fn get_prisoner_contact_relationship(
            &self,
            _: i64,
            _: &str,
        ) -> ApiResult<PrisonerContactRelationshipDetails> {
            unsupported()
        }
        async fn get_prisoner_contacts(
            &self,
            _: &str,
            _: Pagination,
            _: &str,
        ) -> ApiResult<Page<PrisonerContactSummary>> {
            unsupported()
        }
        async fn search_contacts(
            &self,
            _: &ContactSearchRequest,
            _: Pagination,
            _: &str,
        ) -> ApiResult<Page<ContactSearchResultItem>> {
            unsupported()
        }
        async fn get_reference_codes(&self, _: ReferenceCodeGroup, _: &str) -> ApiResult<Vec<ReferenceCode>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                code("FA", "Father", Some(2), true),
                code("OLD", "Retired", Some(0), false),
                code("MOT", "Mother", Some(1), true),
                code("AUNT", "Aunt", None, true),
                code("BRO", "Brother", Some(2), true),
            ])
        }
        async fn get_prisoner_contact_restrictions(
            &self,
            _: i64,
            _: &str,
        ) -> ApiResult<PrisonerContactRestrictions> {
            unsupported()
        }
        async fn create_prisoner_contact_restriction(
            &self,
            _: i64,
            _: &CreateRestrictionRequest,
            _: &str,
        ) -> ApiResult<PrisonerContactRestrictionDetails> {
            unsupported()
        }
        async fn create_contact_global_restriction(
            &self,
            _: i64,
            _: &CreateRestrictionRequest,
            _: &str,
        ) -> ApiResult<ContactGlobalRestrictionDetails> {
            unsupported()
        }
        async fn get_linked_prisoners(&self, _: i64, _: &str) -> ApiResult<Vec<LinkedPrisonerDetails>> {
            unsupported()
        }
    }

    fn cache() -> (Arc<CountingApi>, ReferenceDataCache) {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
        });
        let cache = ReferenceDataCache::new(api.clone(), Duration::from_secs(60));
        (api, cache)
    }

    #[tokio::test]
    async fn test_codes_filtered_and_sorted() {
        let (_, cache) = cache();
        let codes = cache
            .codes(ReferenceCodeGroup::SocialRelationship, "t")
            .await
            .unwrap();
        let order: Vec<_> = codes.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(order, vec!["MOT", "BRO", "FA", "AUNT"]);
    }

    #[tokio::test]
    async fn test_codes_cached_until_invalidated() {
        let (api, cache) = cache();
        for _ in 0..3 {
            cache
                .codes(ReferenceCodeGroup::SocialRelationship, "t")
                .await
                .unwrap();
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);

        cache.invalidate_all();
        cache
            .codes(ReferenceCodeGroup::SocialRelationship, "t")
            .await
            .unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_describe() {
        let (_, cache) = cache();
        let group = ReferenceCodeGroup::SocialRelationship;
        assert_eq!(cache.describe(group, "MOT", "t").await.unwrap(), "Mother");
        assert_eq!(cache.describe(group, "ZZZ", "t").await.unwrap(), "ZZZ");
    }
}
