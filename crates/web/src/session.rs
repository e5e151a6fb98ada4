//! Server-side sessions.
//!
//! A session is identified by an opaque cookie and holds the user's in-progress journeys plus at
//! most one flashed form. Sessions live in a moka cache that drops them after a period without
//! access. Concurrent requests from the same session serialise on the session's mutex; the last
//! write to a journey wins.

use crate::error::{AppError, AppResult};
use crate::AppState;
use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use contacts_core::journey::Journey;
use contacts_core::navigation::urls;
use contacts_core::{
    AddContactJourney, AddRestrictionJourney, ChangeRelationshipTypeJourney, FlashedForm,
    JourneyMap,
};
use contacts_types::PrisonerNumber;
use contacts_uuid::{JourneyId, SessionId};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

pub const SESSION_COOKIE: &str = "contacts.session";

/// Upper bound on live sessions held in memory.
const MAX_SESSIONS: u64 = 100_000;

/// Everything stored against one session.
#[derive(Debug)]
pub struct SessionData {
    pub add_contact: JourneyMap<AddContactJourney>,
    pub restrictions: JourneyMap<AddRestrictionJourney>,
    pub relationship_types: JourneyMap<ChangeRelationshipTypeJourney>,
    flash: Option<(String, FlashedForm)>,
}

impl SessionData {
    pub fn new(max_journeys_per_flow: usize) -> Self {
        Self {
            add_contact: JourneyMap::new(max_journeys_per_flow),
            restrictions: JourneyMap::new(max_journeys_per_flow),
            relationship_types: JourneyMap::new(max_journeys_per_flow),
            flash: None,
        }
    }

    /// Keeps a rejected submission for the next render of `path`.
    pub fn flash(&mut self, path: impl Into<String>, form: FlashedForm) {
        self.flash = Some((path.into(), form));
    }

    /// Removes the flashed form. It is returned only if it was flashed for `path`; a flash meant
    /// for another page is discarded.
    pub fn take_flash(&mut self, path: &str) -> Option<FlashedForm> {
        match self.flash.take() {
            Some((flashed_path, form)) if flashed_path == path => Some(form),
            _ => None,
        }
    }
}

/// Journey types that can be kept in a session.
pub trait StoredJourney: Journey + Send + 'static {
    fn journeys(data: &mut SessionData) -> &mut JourneyMap<Self>;

    fn prisoner_number(&self) -> &PrisonerNumber;

    /// Where to send the user when the journey cannot be found.
    fn restart_url(prisoner_number: &PrisonerNumber) -> String;
}

impl StoredJourney for AddContactJourney {
    fn journeys(data: &mut SessionData) -> &mut JourneyMap<Self> {
        &mut data.add_contact
    }

    fn prisoner_number(&self) -> &PrisonerNumber {
        &self.prisoner_number
    }

    fn restart_url(prisoner_number: &PrisonerNumber) -> String {
        urls::add_contact_start(prisoner_number)
    }
}

impl StoredJourney for AddRestrictionJourney {
    fn journeys(data: &mut SessionData) -> &mut JourneyMap<Self> {
        &mut data.restrictions
    }

    fn prisoner_number(&self) -> &PrisonerNumber {
        &self.prisoner_number
    }

    fn restart_url(prisoner_number: &PrisonerNumber) -> String {
        urls::contact_list(prisoner_number)
    }
}

impl StoredJourney for ChangeRelationshipTypeJourney {
    fn journeys(data: &mut SessionData) -> &mut JourneyMap<Self> {
        &mut data.relationship_types
    }

    fn prisoner_number(&self) -> &PrisonerNumber {
        &self.prisoner_number
    }

    fn restart_url(prisoner_number: &PrisonerNumber) -> String {
        urls::contact_list(prisoner_number)
    }
}

/// Handle to the current request's session.
#[derive(Clone, Debug)]
pub struct Session(Arc<Mutex<SessionData>>);

impl Session {
    fn new(data: SessionData) -> Self {
        Self(Arc::new(Mutex::new(data)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.0.lock().await
    }

    /// Copies the journey `raw_id` out of the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingJourney` when the id is malformed, unknown, or belongs to a
    /// different prisoner.
    pub async fn journey<J: StoredJourney>(
        &self,
        prisoner_number: &PrisonerNumber,
        raw_id: &str,
    ) -> AppResult<J> {
        let missing = || AppError::MissingJourney {
            flow: J::FLOW,
            journey_id: raw_id.to_string(),
            restart_url: J::restart_url(prisoner_number),
        };
        let id = JourneyId::parse(raw_id).map_err(|_| missing())?;
        let mut data = self.lock().await;
        J::journeys(&mut data)
            .get(&id)
            .filter(|j| j.prisoner_number() == prisoner_number)
            .cloned()
            .ok_or_else(missing)
    }

    /// Stores `journey`, marking it as just used.
    pub async fn save<J: StoredJourney>(&self, mut journey: J) {
        journey.touch(Utc::now());
        let mut data = self.lock().await;
        J::journeys(&mut data).put(journey);
    }

    pub async fn remove<J: StoredJourney>(&self, id: &JourneyId) {
        let mut data = self.lock().await;
        J::journeys(&mut data).delete(id);
    }

    pub async fn flash(&self, path: &str, form: FlashedForm) {
        self.lock().await.flash(path, form);
    }

    pub async fn take_flash(&self, path: &str) -> Option<FlashedForm> {
        self.lock().await.take_flash(path)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            tracing::error!("session middleware is not installed");
            AppError::NotFound("session".into())
        })
    }
}

/// All live sessions.
#[derive(Clone)]
pub struct SessionStore {
    inner: Cache<SessionId, Session>,
    max_journeys_per_flow: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration, max_journeys_per_flow: usize) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(ttl)
                .build(),
            max_journeys_per_flow,
        }
    }

    /// Finds the session for `id`, or starts a new one.
    ///
    /// # Returns
    ///
    /// The session id to use, the session, and whether the session was newly created.
    pub async fn load_or_create(&self, id: Option<SessionId>) -> (SessionId, Session, bool) {
        if let Some(id) = id {
            if let Some(session) = self.inner.get(&id).await {
                return (id, session, false);
            }
        }
        let id = SessionId::new();
        let session = Session::new(SessionData::new(self.max_journeys_per_flow));
        self.inner.insert(id, session.clone()).await;
        tracing::debug!(session_id = %id, "started session");
        (id, session, true)
    }
}

fn session_id_from(headers: &HeaderMap) -> Option<SessionId> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .and_then(|cookie| SessionId::parse(cookie.value()).ok())
}

/// Attaches the session to the request and issues the cookie for new sessions.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = session_id_from(req.headers());
    let (id, session, is_new) = state.sessions.load_or_create(existing).await;
    req.extensions_mut().insert(session);

    let resp = next.run(req).await;
    if !is_new {
        return resp;
    }
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (CookieJar::new().add(cookie), resp).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;
    use contacts_core::{FormValues, ValidationErrors};

    fn prisoner() -> PrisonerNumber {
        PrisonerNumber::parse("A1234BC").unwrap()
    }

    #[test]
    fn test_session_id_read_from_cookie_header() {
        let id = SessionId::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("other=1; {SESSION_COOKIE}={id}; x=y")).unwrap(),
        );
        assert_eq!(session_id_from(&headers), Some(id));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("contacts.session=not-an-id"));
        assert_eq!(session_id_from(&headers), None);
        assert_eq!(session_id_from(&HeaderMap::new()), None);
    }

    #[test]
    fn test_flash_only_returned_for_its_page() {
        let mut data = SessionData::new(5);
        let form = FlashedForm::new(ValidationErrors::single("a", "b"), FormValues::new());
        data.flash("/one", form.clone());
        assert_eq!(data.take_flash("/two"), None);
        assert_eq!(data.take_flash("/one"), None);

        data.flash("/one", form.clone());
        assert_eq!(data.take_flash("/one"), Some(form));
        assert_eq!(data.take_flash("/one"), None);
    }

    #[tokio::test]
    async fn test_journey_lookup() {
        let session = Session::new(SessionData::new(5));
        let journey = AddContactJourney::new(prisoner(), Utc::now());
        let id = journey.id;
        session.save(journey).await;

        let found: AddContactJourney = session.journey(&prisoner(), &id.to_string()).await.unwrap();
        assert_eq!(found.id, id);

        let other = PrisonerNumber::parse("Z9999ZZ").unwrap();
        let err = session
            .journey::<AddContactJourney>(&other, &id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingJourney { .. }));

        let err = session
            .journey::<AddContactJourney>(&prisoner(), "not-a-uuid")
            .await
            .unwrap_err();
        match err {
            AppError::MissingJourney { restart_url, .. } => {
                assert_eq!(restart_url, "/prisoner/A1234BC/contacts/add/start")
            }
            other => panic!("unexpected {other:?}"),
        }

        session.remove::<AddContactJourney>(&id).await;
        assert!(session
            .journey::<AddContactJourney>(&prisoner(), &id.to_string())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_store_reuses_known_sessions() {
        let store = SessionStore::new(Duration::from_secs(60), 5);
        let (id, _, is_new) = store.load_or_create(None).await;
        assert!(is_new);
        let (same, _, is_new) = store.load_or_create(Some(id)).await;
        assert_eq!(same, id);
        assert!(!is_new);

        let (fresh, _, is_new) = store.load_or_create(Some(SessionId::new())).await;
        assert!(is_new);
        assert_ne!(fresh, id);
    }
}
