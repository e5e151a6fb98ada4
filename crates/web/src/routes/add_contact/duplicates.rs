//! Possible existing records found after the date of birth, and the page shown when the prisoner
//! already has a relationship with the chosen contact.

use super::search::{after_match_url, summary_of};
use super::{advance, contact_name, load, misplaced_step, step_page, JourneyPath};
use crate::error::{AppError, AppResult};
use crate::routes::{form_values, reject, see_other, FormBody};
use crate::session::Session;
use crate::templates::{render, PageMeta};
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use contacts_api_client::{Pagination, PrisonerContactSummary};
use contacts_core::form::resolve_from;
use contacts_core::navigation::{urls, ContactStep};
use contacts_core::validation::contact::{
    validate_duplicate_action, validate_possible_record_match, DuplicateAction, DUPLICATE_ACTION,
    IS_CONTACT_MATCHED,
};
use contacts_core::AddContactJourney;
use contacts_types::{PrisonerNumber, YesNo};
use minijinja::context;

const RELATIONSHIP_LOOKUP_PAGE_SIZE: u32 = 100;

pub(crate) async fn possible_existing_records(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (prisoner_number, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::PossibleExistingRecords) {
        return Ok(redirect);
    }
    let records = journey.possible_existing_records.clone().unwrap_or_default();
    if records.is_empty() {
        return Ok(see_other(
            &journey.next_url(ContactStep::PossibleExistingRecords, user.can_approve_visitors()),
        ));
    }

    let matches: Vec<_> = records
        .iter()
        .map(|r| {
            context! {
                name => r.formatted_name(),
                date_of_birth => r.date_of_birth,
                url => urls::possible_record_match(&prisoner_number, r.contact_id, &journey.id),
            }
        })
        .collect();
    let page = step_page(
        &journey,
        ContactStep::PossibleExistingRecords,
        &user,
        "Possible existing records have been found",
    );
    render(
        "possible_existing_records.html",
        &page,
        context! {
            action => uri.path(),
            name => contact_name(&journey),
            matches => matches,
            cancel_url => urls::add_contact_cancel(&prisoner_number, &journey.id),
        },
    )
    .map(IntoResponse::into_response)
}

/// Continues as a new contact, marking the matches as reviewed.
pub(crate) async fn submit_possible_existing_records(
    session: Session,
    user: CurrentUser,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::PossibleExistingRecords) {
        return Ok(redirect);
    }
    journey.possible_existing_records_reviewed = true;
    Ok(advance(&session, journey, ContactStep::PossibleExistingRecords, &user).await)
}

pub(crate) async fn possible_record_match(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, contact_id, journey_id)): Path<(String, i64, String)>,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::PossibleExistingRecords) {
        return Ok(redirect);
    }
    let contact = state.api.get_contact(contact_id, &user.token).await?;
    let flash = session.take_flash(uri.path()).await;

    let page = PageMeta::new("Is this the right person?")
        .back(journey.url_for(ContactStep::PossibleExistingRecords))
        .caption(journey.display_name())
        .flashed(flash.as_ref());
    render(
        "contact_match.html",
        &page,
        context! {
            contact => &contact,
            name => contact.formatted_name(),
            field => IS_CONTACT_MATCHED,
            options => [
                (YesNo::Yes.as_form_value(), "Yes, link this existing contact instead"),
                (YesNo::No.as_form_value(), "No, this is not the right person"),
            ],
            selected => resolve_from(flash.as_ref(), IS_CONTACT_MATCHED, None, ""),
            cancel_url => journey.url_for(ContactStep::PossibleExistingRecords),
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn submit_possible_record_match(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, contact_id, journey_id)): Path<(String, i64, String)>,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::PossibleExistingRecords) {
        return Ok(redirect);
    }
    let form = form_values(form);
    let answer = match validate_possible_record_match(&form) {
        Ok(answer) => answer,
        Err(errors) => return Ok(reject(&session, &uri, errors, form).await),
    };
    let url = match answer {
        YesNo::Yes => {
            let contact = state.api.get_contact(contact_id, &user.token).await?;
            tracing::info!(
                journey_id = %journey.id,
                contact_id,
                "switching to an existing contact found by the duplicate search"
            );
            journey.start_add_existing(summary_of(&contact));
            after_match_url(&journey, &user)
        }
        YesNo::No => journey.url_for(ContactStep::PossibleExistingRecords),
    };
    session.save(journey).await;
    Ok(see_other(&url))
}

/// Finds the prisoner's existing relationship with `contact_id`, paging through their contacts.
async fn find_existing_relationship(
    state: &AppState,
    prisoner_number: &PrisonerNumber,
    contact_id: i64,
    token: &str,
) -> AppResult<Option<PrisonerContactSummary>> {
    let mut page_number = 0;
    loop {
        let page = state
            .api
            .get_prisoner_contacts(
                prisoner_number.as_str(),
                Pagination::new(page_number, RELATIONSHIP_LOOKUP_PAGE_SIZE),
                token,
            )
            .await?;
        let last = page.is_last() || page.content.is_empty();
        if let Some(found) = page.content.into_iter().find(|c| c.contact_id == contact_id) {
            return Ok(Some(found));
        }
        if last {
            return Ok(None);
        }
        page_number += 1;
    }
}

fn duplicate_contact_id(journey: &AddContactJourney) -> AppResult<i64> {
    journey
        .matched_contact_id()
        .ok_or_else(|| AppError::NotFound("no matched contact to compare against".into()))
}

pub(crate) async fn handle_duplicate(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (prisoner_number, journey) = load(&session, &prisoner_number, &journey_id).await?;
    let contact_id = duplicate_contact_id(&journey)?;
    let existing =
        find_existing_relationship(&state, &prisoner_number, contact_id, &user.token).await?;
    let flash = session.take_flash(uri.path()).await;

    let page = PageMeta::new("The contact is already linked to this prisoner")
        .back(journey.url_for(ContactStep::CheckAnswers))
        .caption(journey.display_name())
        .flashed(flash.as_ref());
    render(
        "handle_duplicate.html",
        &page,
        context! {
            action => uri.path(),
            name => contact_name(&journey),
            prisoner_number => prisoner_number.as_str(),
            existing => existing.map(|e| context! {
                relationship => e.relationship_to_prisoner_description
                    .unwrap_or(e.relationship_to_prisoner_code),
                is_active => e.is_relationship_active,
            }),
            field => DUPLICATE_ACTION,
            selected => resolve_from(flash.as_ref(), DUPLICATE_ACTION, None, ""),
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn submit_handle_duplicate(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    let (prisoner_number, journey) = load(&session, &prisoner_number, &journey_id).await?;
    let contact_id = duplicate_contact_id(&journey)?;
    let form = form_values(form);
    let action = match validate_duplicate_action(&form) {
        Ok(action) => action,
        Err(errors) => return Ok(reject(&session, &uri, errors, form).await),
    };

    let url = match action {
        DuplicateAction::GoToDuplicate => {
            match find_existing_relationship(&state, &prisoner_number, contact_id, &user.token)
                .await?
            {
                Some(existing) => urls::contact_details(
                    &prisoner_number,
                    existing.contact_id,
                    existing.prisoner_contact_id,
                ),
                None => {
                    tracing::warn!(
                        journey_id = %journey.id,
                        contact_id,
                        "duplicate relationship not found in the prisoner's contacts"
                    );
                    urls::contact_list(&prisoner_number)
                }
            }
        }
        DuplicateAction::GoToContactList => urls::contact_list(&prisoner_number),
    };
    session.remove::<AddContactJourney>(&journey.id).await;
    Ok(see_other(&url))
}
