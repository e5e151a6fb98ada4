//! Route table and helpers shared by the handlers.
//!
//! Every wizard page follows the same pattern: GET renders the form, pre-populated from any
//! flashed submission, then the journey, then defaults. POST validates; on failure it flashes the
//! errors and raw values and redirects back to the GET, on success it updates the journey and
//! redirects to the next page.

pub mod add_contact;
pub mod contacts;
pub mod health;
pub mod relationship_type;
pub mod restriction;

use crate::error::{AppError, AppResult};
use crate::session::{session_middleware, Session};
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::Request;
use axum::http::Uri;
use axum::middleware::{from_fn, from_fn_with_state, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use chrono::{Datelike, NaiveDate};
use contacts_core::form::resolve_from;
use contacts_core::{FlashedForm, FormValues, ValidationErrors};
use contacts_types::PrisonerNumber;
use minijinja::{context, Value};

/// A posted `application/x-www-form-urlencoded` body with repeated keys preserved.
pub type FormBody = Form<Vec<(String, String)>>;

pub(crate) fn form_values(Form(pairs): FormBody) -> FormValues {
    FormValues::from(pairs)
}

/// Parses the prisoner number path segment. A malformed number is a not-found page.
pub(crate) fn parse_prisoner(raw: &str) -> AppResult<PrisonerNumber> {
    PrisonerNumber::parse(raw).map_err(|e| AppError::NotFound(e.to_string()))
}

pub(crate) fn see_other(url: &str) -> Response {
    Redirect::to(url).into_response()
}

/// Flashes a rejected submission and sends the user back to the page they posted from.
pub(crate) async fn reject(
    session: &Session,
    uri: &Uri,
    errors: ValidationErrors,
    values: FormValues,
) -> Response {
    let path = uri.path();
    tracing::debug!(path, errors = errors.len(), "form rejected");
    session.flash(path, FlashedForm::new(errors, values)).await;
    see_other(path)
}

/// Day, month and year inputs of the date field `field`, flashed values first.
pub(crate) fn date_parts(flash: Option<&FlashedForm>, field: &str, stored: Option<NaiveDate>) -> Value {
    let part = |suffix: &str, value: Option<String>| {
        resolve_from(flash, &format!("{field}-{suffix}"), value.as_deref(), "")
    };
    context! {
        day => part("day", stored.map(|d| d.day().to_string())),
        month => part("month", stored.map(|d| d.month().to_string())),
        year => part("year", stored.map(|d| d.year().to_string())),
    }
}

/// Rejects any request without a bearer token before a handler can touch a journey.
pub(crate) async fn require_user(_user: CurrentUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// Builds the application router. The health check sits outside the session layer so probes do
/// not create sessions.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(contacts::routes())
        .merge(add_contact::routes())
        .merge(restriction::routes())
        .merge(relationship_type::routes())
        .route_layer(from_fn(require_user))
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .route("/health", get(health::health))
        .with_state(state)
}
