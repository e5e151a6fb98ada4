//! Search for an existing contact, and confirm a match.

use super::{load, JourneyPath};
use crate::error::AppResult;
use crate::routes::{form_values, reject, see_other, FormBody};
use crate::session::Session;
use crate::templates::{render, PageMeta};
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use contacts_api_client::{ContactDetails, ContactSearchRequest, Pagination};
use contacts_core::constants::SEARCH_PAGE_SIZE;
use contacts_core::form::resolve_from;
use contacts_core::journey::ExistingContactSummary;
use contacts_core::navigation::{urls, ContactStep};
use contacts_core::validation::contact::{validate_contact_match, ContactMatchAnswer, IS_CONTACT_MATCHED};
use contacts_core::validation::search::{validate_search, FIRST_NAME, LAST_NAME, MIDDLE_NAMES};
use contacts_core::{AddContactJourney, FormValues, ValidationErrors};
use minijinja::context;

pub(crate) fn summary_of(contact: &ContactDetails) -> ExistingContactSummary {
    ExistingContactSummary {
        contact_id: contact.id,
        last_name: contact.last_name.clone(),
        first_name: contact.first_name.clone(),
        middle_names: contact.middle_names.clone(),
        date_of_birth: contact.date_of_birth,
    }
}

/// Where to go once a contact has been confirmed: the first unanswered step, or check answers.
pub(crate) fn after_match_url(journey: &AddContactJourney, user: &CurrentUser) -> String {
    let step = journey
        .first_incomplete_step(user.can_approve_visitors())
        .unwrap_or(ContactStep::CheckAnswers);
    journey.url_for(step)
}

fn query_string(criteria: &FormValues, page: u32) -> String {
    let mut parts: Vec<String> = [LAST_NAME, FIRST_NAME, MIDDLE_NAMES]
        .iter()
        .filter_map(|f| criteria.get(f).map(|v| format!("{f}={}", urlencoding::encode(v))))
        .collect();
    parts.push(format!("page={page}"));
    format!("?{}", parts.join("&"))
}

pub(crate) async fn search(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    Query(query): Query<Vec<(String, String)>>,
) -> AppResult<Response> {
    let (prisoner_number, journey) = load(&session, &prisoner_number, &journey_id).await?;
    let criteria = FormValues::from(query);
    let page_number: u32 = criteria
        .get("page")
        .and_then(|p| p.parse().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);

    let mut errors = ValidationErrors::new();
    let mut results = Vec::new();
    let mut total_pages = 0;
    let submitted = criteria.contains(LAST_NAME);
    if submitted {
        match validate_search(&criteria) {
            Ok(valid) => {
                let request = ContactSearchRequest {
                    last_name: valid.last_name,
                    first_name: valid.first_name,
                    middle_names: valid.middle_names,
                    date_of_birth: None,
                };
                let found = state
                    .api
                    .search_contacts(
                        &request,
                        Pagination::new(page_number - 1, SEARCH_PAGE_SIZE),
                        &user.token,
                    )
                    .await?;
                total_pages = found.total_pages;
                results = found
                    .content
                    .iter()
                    .map(|c| {
                        context! {
                            name => c.formatted_name(),
                            date_of_birth => c.date_of_birth,
                            url => urls::contact_match(&prisoner_number, c.id, &journey.id),
                        }
                    })
                    .collect();
            }
            Err(e) => errors = e,
        }
    }

    let previous_url = (page_number > 1).then(|| {
        format!("{}{}", uri.path(), query_string(&criteria, page_number - 1))
    });
    let next_url = (page_number < total_pages).then(|| {
        format!("{}{}", uri.path(), query_string(&criteria, page_number + 1))
    });

    let page = PageMeta::new("Search for a contact")
        .back(journey.back_url(ContactStep::Search, user.can_approve_visitors()))
        .errors(&errors);
    render(
        "search.html",
        &page,
        context! {
            action => uri.path(),
            last_name => criteria.raw(LAST_NAME).unwrap_or_default(),
            first_name => criteria.raw(FIRST_NAME).unwrap_or_default(),
            middle_names => criteria.raw(MIDDLE_NAMES).unwrap_or_default(),
            submitted => submitted && errors.is_empty(),
            results => results,
            previous_url => previous_url,
            next_url => next_url,
            create_new_url => urls::search_create_new(&prisoner_number, &journey.id),
            cancel_url => urls::add_contact_cancel(&prisoner_number, &journey.id),
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn create_new(
    session: Session,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    journey.start_create();
    let url = journey.url_for(ContactStep::EnterName);
    session.save(journey).await;
    Ok(see_other(&url))
}

pub(crate) async fn contact_match(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, contact_id, journey_id)): Path<(String, i64, String)>,
) -> AppResult<Response> {
    let (prisoner_number, journey) = load(&session, &prisoner_number, &journey_id).await?;
    let contact = state.api.get_contact(contact_id, &user.token).await?;
    let flash = session.take_flash(uri.path()).await;

    let page = PageMeta::new("Check and confirm if this is the correct contact")
        .back(journey.url_for(ContactStep::Search))
        .flashed(flash.as_ref());
    render(
        "contact_match.html",
        &page,
        context! {
            contact => &contact,
            name => contact.formatted_name(),
            field => IS_CONTACT_MATCHED,
            options => [
                ("YES", "Yes, this is the right person"),
                ("NO_SEARCH_AGAIN", "No, search for the contact again"),
                ("NO_CREATE_NEW", "No, create a new contact"),
            ],
            selected => resolve_from(flash.as_ref(), IS_CONTACT_MATCHED, None, ""),
            cancel_url => urls::add_contact_cancel(&prisoner_number, &journey.id),
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn submit_contact_match(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, contact_id, journey_id)): Path<(String, i64, String)>,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    let form = form_values(form);
    let answer = match validate_contact_match(&form) {
        Ok(answer) => answer,
        Err(errors) => return Ok(reject(&session, &uri, errors, form).await),
    };

    let url = match answer {
        ContactMatchAnswer::Yes => {
            let contact = state.api.get_contact(contact_id, &user.token).await?;
            journey.start_add_existing(summary_of(&contact));
            after_match_url(&journey, &user)
        }
        ContactMatchAnswer::NoSearchAgain => journey.url_for(ContactStep::Search),
        ContactMatchAnswer::NoCreateNew => {
            journey.start_create();
            journey.url_for(ContactStep::EnterName)
        }
    };
    tracing::debug!(journey_id = %journey.id, answer = answer.as_form_value(), "contact match answered");
    session.save(journey).await;
    Ok(see_other(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_keeps_criteria() {
        let criteria = FormValues::new()
            .with(LAST_NAME, "O'Neil Smith")
            .with(FIRST_NAME, "")
            .with("page", "1");
        assert_eq!(query_string(&criteria, 2), "?lastName=O%27Neil%20Smith&page=2");
    }
}
