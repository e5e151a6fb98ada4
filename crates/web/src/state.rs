use crate::session::SessionStore;
use contacts_api_client::{ContactsApi, ReferenceDataCache};
use contacts_core::CoreConfig;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub api: Arc<dyn ContactsApi>,
    pub reference_data: ReferenceDataCache,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, api: Arc<dyn ContactsApi>) -> Self {
        let reference_data = ReferenceDataCache::new(api.clone(), cfg.reference_data_ttl());
        let sessions = SessionStore::new(cfg.session_ttl(), cfg.max_journeys_per_flow());
        Self {
            cfg,
            api,
            reference_data,
            sessions,
        }
    }
}
