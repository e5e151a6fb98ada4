//! Single-question steps of the add-contact journey.

use super::{advance, contact_name, load, misplaced_step, step_page, JourneyPath};
use crate::error::AppResult;
use crate::routes::{date_parts, form_values, reject, see_other, FormBody};
use crate::session::Session;
use crate::templates::render;
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use contacts_api_client::{ContactSearchRequest, Pagination};
use contacts_core::constants::SEARCH_PAGE_SIZE;
use contacts_core::form::resolve_from;
use contacts_core::journey::{DateOfBirthAnswer, ExistingContactSummary};
use contacts_core::navigation::{ContactFlow, ContactStep};
use contacts_core::validation::contact::{
    validate_approved_visitor, validate_comments, validate_date_of_birth,
    validate_emergency_contact, validate_names, validate_next_of_kin,
    validate_relationship_to_prisoner, validate_relationship_type, COMMENTS, DOB, FIRST_NAME,
    IS_APPROVED_VISITOR, IS_DOB_KNOWN, IS_EMERGENCY_CONTACT, IS_NEXT_OF_KIN, LAST_NAME,
    MIDDLE_NAMES, RELATIONSHIP, RELATIONSHIP_TYPE, TITLE,
};
use contacts_core::{AddContactJourney, FormValues, ValidationResult};
use contacts_types::{ReferenceCodeGroup, RelationshipType, YesNo};
use minijinja::context;

pub(crate) async fn enter_name(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::EnterName) {
        return Ok(redirect);
    }
    let flash = session.take_flash(uri.path()).await;
    let titles = state
        .reference_data
        .codes(ReferenceCodeGroup::Title, &user.token)
        .await?;

    let names = journey.names.as_ref();
    let field = |name: &str, stored: Option<&str>| resolve_from(flash.as_ref(), name, stored, "");
    let page = step_page(&journey, ContactStep::EnterName, &user, "What is the contact’s name?")
        .flashed(flash.as_ref());
    render(
        "enter_name.html",
        &page,
        context! {
            action => uri.path(),
            titles => titles.as_slice(),
            title => field(TITLE, names.and_then(|n| n.title.as_deref())),
            last_name => field(LAST_NAME, names.map(|n| n.last_name.as_str())),
            first_name => field(FIRST_NAME, names.map(|n| n.first_name.as_str())),
            middle_names => field(MIDDLE_NAMES, names.and_then(|n| n.middle_names.as_deref())),
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn submit_enter_name(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::EnterName) {
        return Ok(redirect);
    }
    let form = form_values(form);
    match validate_names(&form) {
        Ok(names) => {
            journey.names = Some(names);
            Ok(advance(&session, journey, ContactStep::EnterName, &user).await)
        }
        Err(errors) => Ok(reject(&session, &uri, errors, form).await),
    }
}

pub(crate) async fn relationship_type(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::RelationshipType) {
        return Ok(redirect);
    }
    let flash = session.take_flash(uri.path()).await;
    let stored = journey.relationship.relationship_type.map(RelationshipType::code);

    let heading = format!(
        "Is {} a social or official contact for the prisoner?",
        contact_name(&journey)
    );
    let page = step_page(&journey, ContactStep::RelationshipType, &user, heading.clone())
        .flashed(flash.as_ref());
    render(
        "relationship_type.html",
        &page,
        context! {
            action => uri.path(),
            heading => heading,
            field => RELATIONSHIP_TYPE,
            options => [RelationshipType::Social, RelationshipType::Official]
                .iter()
                .map(|t| (t.code(), t.label()))
                .collect::<Vec<_>>(),
            selected => resolve_from(flash.as_ref(), RELATIONSHIP_TYPE, stored, ""),
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn submit_relationship_type(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::RelationshipType) {
        return Ok(redirect);
    }
    let form = form_values(form);
    match validate_relationship_type(&form) {
        Ok(relationship_type) => {
            if journey.set_relationship_type(relationship_type) {
                tracing::debug!(
                    journey_id = %journey.id,
                    relationship_type = relationship_type.code(),
                    "relationship type changed"
                );
            }
            Ok(advance(&session, journey, ContactStep::RelationshipType, &user).await)
        }
        Err(errors) => Ok(reject(&session, &uri, errors, form).await),
    }
}

pub(crate) async fn relationship_to_prisoner(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::RelationshipToPrisoner) {
        return Ok(redirect);
    }
    let Some(relationship_type) = journey.relationship.relationship_type else {
        return Ok(see_other(&journey.url_for(ContactStep::RelationshipType)));
    };
    let flash = session.take_flash(uri.path()).await;
    let codes = state
        .reference_data
        .codes(relationship_type.relationship_group(), &user.token)
        .await?;

    let heading = format!(
        "How is {} related to the prisoner?",
        contact_name(&journey)
    );
    let page = step_page(&journey, ContactStep::RelationshipToPrisoner, &user, heading.clone())
        .flashed(flash.as_ref());
    render(
        "relationship_to_prisoner.html",
        &page,
        context! {
            action => uri.path(),
            heading => heading,
            field => RELATIONSHIP,
            codes => codes.as_slice(),
            selected => resolve_from(
                flash.as_ref(),
                RELATIONSHIP,
                journey.relationship.relationship_to_prisoner.as_deref(),
                "",
            ),
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn submit_relationship_to_prisoner(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::RelationshipToPrisoner) {
        return Ok(redirect);
    }
    let Some(relationship_type) = journey.relationship.relationship_type else {
        return Ok(see_other(&journey.url_for(ContactStep::RelationshipType)));
    };
    let codes = state
        .reference_data
        .codes(relationship_type.relationship_group(), &user.token)
        .await?;
    let allowed: Vec<&str> = codes.iter().map(|c| c.code.as_str()).collect();

    let form = form_values(form);
    match validate_relationship_to_prisoner(&form, &allowed) {
        Ok(code) => {
            journey.relationship.relationship_to_prisoner = Some(code);
            Ok(advance(&session, journey, ContactStep::RelationshipToPrisoner, &user).await)
        }
        Err(errors) => Ok(reject(&session, &uri, errors, form).await),
    }
}

/// A yes/no step whose answer lives in the relationship answers.
struct YesNoQuestion {
    step: ContactStep,
    field: &'static str,
    /// Completes "Is {name} ...?".
    question: &'static str,
    hint: Option<&'static str>,
    stored: fn(&AddContactJourney) -> Option<YesNo>,
    store: fn(&mut AddContactJourney, YesNo),
    validate: fn(&FormValues) -> ValidationResult<YesNo>,
}

const EMERGENCY_CONTACT: YesNoQuestion = YesNoQuestion {
    step: ContactStep::EmergencyContact,
    field: IS_EMERGENCY_CONTACT,
    question: "an emergency contact for the prisoner",
    hint: None,
    stored: |j| j.relationship.is_emergency_contact,
    store: |j, answer| j.relationship.is_emergency_contact = Some(answer),
    validate: validate_emergency_contact,
};

const NEXT_OF_KIN: YesNoQuestion = YesNoQuestion {
    step: ContactStep::NextOfKin,
    field: IS_NEXT_OF_KIN,
    question: "next of kin for the prisoner",
    hint: None,
    stored: |j| j.relationship.is_next_of_kin,
    store: |j, answer| j.relationship.is_next_of_kin = Some(answer),
    validate: validate_next_of_kin,
};

const APPROVED_VISITOR: YesNoQuestion = YesNoQuestion {
    step: ContactStep::ApprovedVisitor,
    field: IS_APPROVED_VISITOR,
    question: "approved to visit the prisoner",
    hint: Some("Only answer yes if the contact has passed all visitor checks."),
    stored: |j| j.relationship.is_approved_visitor,
    store: |j, answer| j.relationship.is_approved_visitor = Some(answer),
    validate: validate_approved_visitor,
};

async fn show_yes_no(
    question: &YesNoQuestion,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    prisoner_number: String,
    journey_id: String,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, question.step) {
        return Ok(redirect);
    }
    if question.step == ContactStep::ApprovedVisitor && !user.can_approve_visitors() {
        return Ok(see_other(&journey.next_url(question.step, false)));
    }
    let flash = session.take_flash(uri.path()).await;
    let stored = (question.stored)(&journey).map(YesNo::as_form_value);

    let heading = format!("Is {} {}?", contact_name(&journey), question.question);
    let page = step_page(&journey, question.step, &user, heading.clone()).flashed(flash.as_ref());
    render(
        "yes_no.html",
        &page,
        context! {
            action => uri.path(),
            heading => heading,
            hint => question.hint,
            field => question.field,
            selected => resolve_from(flash.as_ref(), question.field, stored, ""),
        },
    )
    .map(IntoResponse::into_response)
}

async fn submit_yes_no(
    question: &YesNoQuestion,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    prisoner_number: String,
    journey_id: String,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, question.step) {
        return Ok(redirect);
    }
    if question.step == ContactStep::ApprovedVisitor && !user.can_approve_visitors() {
        tracing::warn!(
            journey_id = %journey.id,
            username = %user.username,
            "approved visitor answer submitted without the required role"
        );
        return Ok(see_other(&journey.next_url(question.step, false)));
    }
    let form = form_values(form);
    match (question.validate)(&form) {
        Ok(answer) => {
            (question.store)(&mut journey, answer);
            Ok(advance(&session, journey, question.step, &user).await)
        }
        Err(errors) => Ok(reject(&session, &uri, errors, form).await),
    }
}

pub(crate) async fn emergency_contact(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    show_yes_no(&EMERGENCY_CONTACT, session, user, uri, prisoner_number, journey_id).await
}

pub(crate) async fn submit_emergency_contact(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    submit_yes_no(&EMERGENCY_CONTACT, session, user, uri, prisoner_number, journey_id, form).await
}

pub(crate) async fn next_of_kin(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    show_yes_no(&NEXT_OF_KIN, session, user, uri, prisoner_number, journey_id).await
}

pub(crate) async fn submit_next_of_kin(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    submit_yes_no(&NEXT_OF_KIN, session, user, uri, prisoner_number, journey_id, form).await
}

pub(crate) async fn approved_visitor(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    show_yes_no(&APPROVED_VISITOR, session, user, uri, prisoner_number, journey_id).await
}

pub(crate) async fn submit_approved_visitor(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    submit_yes_no(&APPROVED_VISITOR, session, user, uri, prisoner_number, journey_id, form).await
}

pub(crate) async fn date_of_birth(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::DateOfBirth) {
        return Ok(redirect);
    }
    let flash = session.take_flash(uri.path()).await;

    let known = journey.date_of_birth.map(|dob| match dob {
        DateOfBirthAnswer::Known(_) => YesNo::Yes.as_form_value(),
        DateOfBirthAnswer::Unknown => YesNo::No.as_form_value(),
    });
    let heading = format!("Do you know {}’s date of birth?", contact_name(&journey));
    let page = step_page(&journey, ContactStep::DateOfBirth, &user, heading.clone())
        .flashed(flash.as_ref());
    render(
        "date_of_birth.html",
        &page,
        context! {
            action => uri.path(),
            heading => heading,
            known_field => IS_DOB_KNOWN,
            date_field => DOB,
            is_known => resolve_from(flash.as_ref(), IS_DOB_KNOWN, known, ""),
            date => date_parts(
                flash.as_ref(),
                DOB,
                journey.date_of_birth.and_then(|dob| dob.date()),
            ),
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn submit_date_of_birth(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::DateOfBirth) {
        return Ok(redirect);
    }
    let form = form_values(form);
    let date_of_birth = match validate_date_of_birth(&form, Utc::now().date_naive()) {
        Ok(answer) => answer,
        Err(errors) => return Ok(reject(&session, &uri, errors, form).await),
    };
    journey.date_of_birth = Some(date_of_birth);

    if journey.flow() == ContactFlow::Create && !journey.is_checking_answers {
        if let Some(names) = &journey.names {
            let request = ContactSearchRequest {
                last_name: names.last_name.clone(),
                first_name: Some(names.first_name.clone()),
                middle_names: names.middle_names.clone(),
                date_of_birth: date_of_birth.date(),
            };
            let found = state
                .api
                .search_contacts(&request, Pagination::new(0, SEARCH_PAGE_SIZE), &user.token)
                .await?;
            let records: Vec<ExistingContactSummary> = found
                .content
                .into_iter()
                .map(|c| ExistingContactSummary {
                    contact_id: c.id,
                    last_name: c.last_name,
                    first_name: c.first_name,
                    middle_names: c.middle_names,
                    date_of_birth: c.date_of_birth,
                })
                .collect();
            tracing::debug!(
                journey_id = %journey.id,
                matches = records.len(),
                "searched for possible existing records"
            );
            journey.set_possible_existing_records(records);
        }
    }
    Ok(advance(&session, journey, ContactStep::DateOfBirth, &user).await)
}

/// Hub page linking to the optional phone, email, identity and comments pages.
pub(crate) async fn additional_info(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::AdditionalInfo) {
        return Ok(redirect);
    }
    let page = step_page(
        &journey,
        ContactStep::AdditionalInfo,
        &user,
        "Add additional information (optional)",
    );
    render(
        "additional_info.html",
        &page,
        context! {
            action => uri.path(),
            items => [
                ("Phone numbers", journey.url_for(ContactStep::PhoneNumbers), journey.phone_numbers.len()),
                ("Email addresses", journey.url_for(ContactStep::EmailAddresses), journey.email_addresses.len()),
                ("Identity documents", journey.url_for(ContactStep::IdentityDocuments), journey.identities.len()),
                (
                    "Comments on the relationship",
                    journey.url_for(ContactStep::RelationshipComments),
                    usize::from(journey.relationship.comments.is_some()),
                ),
            ],
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn submit_additional_info(
    session: Session,
    user: CurrentUser,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::AdditionalInfo) {
        return Ok(redirect);
    }
    Ok(advance(&session, journey, ContactStep::AdditionalInfo, &user).await)
}

pub(crate) async fn comments(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::RelationshipComments) {
        return Ok(redirect);
    }
    let flash = session.take_flash(uri.path()).await;

    let heading = format!(
        "Add comments on the relationship between {} and the prisoner (optional)",
        contact_name(&journey)
    );
    let page = step_page(&journey, ContactStep::RelationshipComments, &user, heading.clone())
        .flashed(flash.as_ref());
    render(
        "comments.html",
        &page,
        context! {
            action => uri.path(),
            heading => heading,
            field => COMMENTS,
            comments => resolve_from(
                flash.as_ref(),
                COMMENTS,
                journey.relationship.comments.as_deref(),
                "",
            ),
        },
    )
    .map(IntoResponse::into_response)
}

pub(crate) async fn submit_comments(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, ContactStep::RelationshipComments) {
        return Ok(redirect);
    }
    let form = form_values(form);
    match validate_comments(&form) {
        Ok(comments) => {
            journey.relationship.comments = comments;
            Ok(advance(&session, journey, ContactStep::RelationshipComments, &user).await)
        }
        Err(errors) => Ok(reject(&session, &uri, errors, form).await),
    }
}
