//! The add-contact wizard.
//!
//! One journey serves both creating a new contact and linking an existing one. It starts on the
//! search page; confirming a search result switches it to add-existing mode, choosing "create new"
//! switches it to create mode.

mod check_answers;
mod duplicates;
mod lists;
mod search;
mod steps;

use super::{parse_prisoner, see_other};
use crate::error::AppResult;
use crate::session::Session;
use crate::templates::PageMeta;
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::Path;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use contacts_core::navigation::{urls, ContactStep};
use contacts_core::AddContactJourney;
use contacts_types::PrisonerNumber;
use contacts_uuid::JourneyId;

const ADD: &str = "/prisoner/:prisoner_number/contacts/add";

pub fn routes() -> Router<AppState> {
    let step = |segment: &str| format!("{ADD}/{segment}/:journey_id");
    Router::new()
        .route(&format!("{ADD}/start"), get(start))
        .route(&format!("{ADD}/cancel/:journey_id"), get(cancel))
        .route(
            "/prisoner/:prisoner_number/contacts/search/:journey_id",
            get(search::search),
        )
        .route(
            "/prisoner/:prisoner_number/contacts/search/:journey_id/create-new",
            get(search::create_new),
        )
        .route(
            &format!("{ADD}/match/:contact_id/:journey_id"),
            get(search::contact_match).post(search::submit_contact_match),
        )
        .route(
            &step(ContactStep::EnterName.path_segment()),
            get(steps::enter_name).post(steps::submit_enter_name),
        )
        .route(
            &step(ContactStep::RelationshipType.path_segment()),
            get(steps::relationship_type).post(steps::submit_relationship_type),
        )
        .route(
            &step(ContactStep::RelationshipToPrisoner.path_segment()),
            get(steps::relationship_to_prisoner).post(steps::submit_relationship_to_prisoner),
        )
        .route(
            &step(ContactStep::EmergencyContact.path_segment()),
            get(steps::emergency_contact).post(steps::submit_emergency_contact),
        )
        .route(
            &step(ContactStep::NextOfKin.path_segment()),
            get(steps::next_of_kin).post(steps::submit_next_of_kin),
        )
        .route(
            &step(ContactStep::DateOfBirth.path_segment()),
            get(steps::date_of_birth).post(steps::submit_date_of_birth),
        )
        .route(
            &step(ContactStep::ApprovedVisitor.path_segment()),
            get(steps::approved_visitor).post(steps::submit_approved_visitor),
        )
        .route(
            &step(ContactStep::AdditionalInfo.path_segment()),
            get(steps::additional_info).post(steps::submit_additional_info),
        )
        .route(
            &step(ContactStep::RelationshipComments.path_segment()),
            get(steps::comments).post(steps::submit_comments),
        )
        .route(
            &step(ContactStep::PhoneNumbers.path_segment()),
            get(lists::phone_numbers).post(lists::submit_phone_numbers),
        )
        .route(
            &step(ContactStep::EmailAddresses.path_segment()),
            get(lists::emails).post(lists::submit_emails),
        )
        .route(
            &step(ContactStep::IdentityDocuments.path_segment()),
            get(lists::identities).post(lists::submit_identities),
        )
        .route(
            &format!("{ADD}/delete-phone-number/:index/:journey_id"),
            get(lists::delete_phone_number).post(lists::submit_delete_phone_number),
        )
        .route(
            &format!("{ADD}/delete-email/:index/:journey_id"),
            get(lists::delete_email).post(lists::submit_delete_email),
        )
        .route(
            &format!("{ADD}/delete-identity/:index/:journey_id"),
            get(lists::delete_identity).post(lists::submit_delete_identity),
        )
        .route(
            &step(ContactStep::PossibleExistingRecords.path_segment()),
            get(duplicates::possible_existing_records)
                .post(duplicates::submit_possible_existing_records),
        )
        .route(
            &format!("{ADD}/possible-existing-record-match/:contact_id/:journey_id"),
            get(duplicates::possible_record_match).post(duplicates::submit_possible_record_match),
        )
        .route(
            &format!("{ADD}/handle-duplicate/:journey_id"),
            get(duplicates::handle_duplicate).post(duplicates::submit_handle_duplicate),
        )
        .route(
            &step(ContactStep::CheckAnswers.path_segment()),
            get(check_answers::check_answers).post(check_answers::submit),
        )
}

/// Path parameters of every journey-scoped page.
pub(crate) type JourneyPath = Path<(String, String)>;

/// Loads the prisoner number and the journey named by the path.
pub(crate) async fn load(
    session: &Session,
    prisoner_number: &str,
    journey_id: &str,
) -> AppResult<(PrisonerNumber, AddContactJourney)> {
    let prisoner_number = parse_prisoner(prisoner_number)?;
    let journey = session.journey(&prisoner_number, journey_id).await?;
    Ok((prisoner_number, journey))
}

/// Title, back link and caption for a step page.
pub(crate) fn step_page(
    journey: &AddContactJourney,
    step: ContactStep,
    user: &CurrentUser,
    title: impl Into<String>,
) -> PageMeta {
    PageMeta::new(title)
        .back(journey.back_url(step, user.can_approve_visitors()))
        .caption(journey.display_name())
}

/// Stores the journey and redirects to the step after `step`.
pub(crate) async fn advance(
    session: &Session,
    journey: AddContactJourney,
    step: ContactStep,
    user: &CurrentUser,
) -> Response {
    let url = journey.next_url(step, user.can_approve_visitors());
    session.save(journey).await;
    see_other(&url)
}

/// Name used in page headings: the contact's name, or a neutral fallback before one is known.
pub(crate) fn contact_name(journey: &AddContactJourney) -> String {
    journey
        .display_name()
        .unwrap_or_else(|| "the contact".to_string())
}

/// Redirect for a step that cannot be shown in the journey's current state, if any.
///
/// Nothing can be answered before the search page has chosen a mode, and each mode only has its
/// own steps.
pub(crate) fn misplaced_step(journey: &AddContactJourney, step: ContactStep) -> Option<Response> {
    if journey.mode.is_none() {
        return Some(see_other(&journey.url_for(ContactStep::Search)));
    }
    if !step.belongs_to(journey.flow()) {
        tracing::warn!(
            journey_id = %journey.id,
            step = step.path_segment(),
            "step does not belong to the journey's flow"
        );
        return Some(see_other(&journey.url_for(ContactStep::CheckAnswers)));
    }
    None
}

async fn start(session: Session, Path(prisoner_number): Path<String>) -> AppResult<Response> {
    let prisoner_number = parse_prisoner(&prisoner_number)?;
    let journey = AddContactJourney::new(prisoner_number, Utc::now());
    let url = journey.url_for(ContactStep::Search);
    tracing::info!(journey_id = %journey.id, "add contact journey started");
    session.save(journey).await;
    Ok(see_other(&url))
}

async fn cancel(
    session: Session,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let prisoner_number = parse_prisoner(&prisoner_number)?;
    if let Ok(id) = JourneyId::parse(&journey_id) {
        session.remove::<AddContactJourney>(&id).await;
    }
    Ok(see_other(&urls::contact_list(&prisoner_number)))
}
