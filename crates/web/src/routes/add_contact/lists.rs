//! Repeating-row pages for phone numbers, email addresses and identity documents, and the pages
//! confirming deletion of a saved entry from check answers.
//!
//! A list page posts one of three buttons. `add` and `remove=<n>` only change the rows on screen:
//! the edited rows are flashed without errors and the page redisplays them. `save` validates every
//! row and stores the list on the journey.

use super::{advance, load, misplaced_step, step_page, JourneyPath};
use crate::error::AppResult;
use crate::routes::{form_values, reject, see_other, FormBody};
use crate::session::Session;
use crate::templates::{render, PageMeta};
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use contacts_core::journey::AddContactJourney;
use contacts_core::navigation::ContactStep;
use contacts_core::validation::additional_info::{
    apply_list_action, email_rows, identity_rows, parse_rows, phone_rows, rows_to_form,
    validate_email_addresses, validate_identities, validate_phone_numbers, ListAction, Row,
    EMAILS, EMAIL_COLUMNS, IDENTITIES, IDENTITY_COLUMNS, PHONES, PHONE_COLUMNS,
};
use contacts_core::{CoreError, CoreResult, FlashedForm, FormValues, ValidationErrors, ValidationResult};
use contacts_types::ReferenceCodeGroup;
use minijinja::context;

/// One repeating-row page.
struct ListPage {
    step: ContactStep,
    template: &'static str,
    title: &'static str,
    prefix: &'static str,
    columns: &'static [&'static str],
    codes: Option<ReferenceCodeGroup>,
    rows: fn(&AddContactJourney) -> Vec<Row>,
    save: fn(&FormValues, &mut AddContactJourney) -> ValidationResult<()>,
}

const PHONE_NUMBERS: ListPage = ListPage {
    step: ContactStep::PhoneNumbers,
    template: "phone_numbers.html",
    title: "Add phone numbers for the contact",
    prefix: PHONES,
    columns: PHONE_COLUMNS,
    codes: Some(ReferenceCodeGroup::PhoneType),
    rows: |j| phone_rows(&j.phone_numbers),
    save: |form, j| {
        j.phone_numbers = validate_phone_numbers(form)?;
        Ok(())
    },
};

const EMAIL_ADDRESSES: ListPage = ListPage {
    step: ContactStep::EmailAddresses,
    template: "emails.html",
    title: "Add email addresses for the contact",
    prefix: EMAILS,
    columns: EMAIL_COLUMNS,
    codes: None,
    rows: |j| email_rows(&j.email_addresses),
    save: |form, j| {
        j.email_addresses = validate_email_addresses(form)?;
        Ok(())
    },
};

const IDENTITY_DOCUMENTS: ListPage = ListPage {
    step: ContactStep::IdentityDocuments,
    template: "identities.html",
    title: "Add identity documents for the contact",
    prefix: IDENTITIES,
    columns: IDENTITY_COLUMNS,
    codes: Some(ReferenceCodeGroup::IdType),
    rows: |j| identity_rows(&j.identities),
    save: |form, j| {
        j.identities = validate_identities(form)?;
        Ok(())
    },
};

async fn show_list(
    list: &ListPage,
    state: AppState,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    prisoner_number: String,
    journey_id: String,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, list.step) {
        return Ok(redirect);
    }
    let flash = session.take_flash(uri.path()).await;
    let rows = match &flash {
        Some(flash) => parse_rows(&flash.values, list.prefix, list.columns),
        None => (list.rows)(&journey),
    };
    let rows = apply_list_action(rows, ListAction::Save, list.columns);
    let codes = match list.codes {
        Some(group) => state.reference_data.codes(group, &user.token).await?.to_vec(),
        None => Vec::new(),
    };

    let page = step_page(&journey, list.step, &user, list.title).flashed(flash.as_ref());
    render(
        list.template,
        &page,
        context! {
            action => uri.path(),
            prefix => list.prefix,
            rows => rows,
            codes => codes,
        },
    )
    .map(IntoResponse::into_response)
}

async fn submit_list(
    list: &ListPage,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    prisoner_number: String,
    journey_id: String,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, list.step) {
        return Ok(redirect);
    }
    let form = form_values(form);
    match ListAction::from_form(&form) {
        ListAction::Save => match (list.save)(&form, &mut journey) {
            Ok(()) => Ok(advance(&session, journey, list.step, &user).await),
            Err(errors) => Ok(reject(&session, &uri, errors, form).await),
        },
        action => {
            let rows = apply_list_action(parse_rows(&form, list.prefix, list.columns), action, list.columns);
            let values = rows_to_form(list.prefix, &rows);
            session
                .flash(uri.path(), FlashedForm::new(ValidationErrors::new(), values))
                .await;
            Ok(see_other(uri.path()))
        }
    }
}

pub(crate) async fn phone_numbers(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    show_list(&PHONE_NUMBERS, state, session, user, uri, prisoner_number, journey_id).await
}

pub(crate) async fn submit_phone_numbers(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    submit_list(&PHONE_NUMBERS, session, user, uri, prisoner_number, journey_id, form).await
}

pub(crate) async fn emails(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    show_list(&EMAIL_ADDRESSES, state, session, user, uri, prisoner_number, journey_id).await
}

pub(crate) async fn submit_emails(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    submit_list(&EMAIL_ADDRESSES, session, user, uri, prisoner_number, journey_id, form).await
}

pub(crate) async fn identities(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    show_list(&IDENTITY_DOCUMENTS, state, session, user, uri, prisoner_number, journey_id).await
}

pub(crate) async fn submit_identities(
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    submit_list(&IDENTITY_DOCUMENTS, session, user, uri, prisoner_number, journey_id, form).await
}

/// Deleting one saved entry, confirmed on its own page.
struct DeleteEntry {
    step: ContactStep,
    kind: &'static str,
    noun: &'static str,
    describe: fn(&AddContactJourney, usize) -> Option<String>,
    remove: fn(&mut AddContactJourney, usize) -> CoreResult<()>,
}

const DELETE_PHONE_NUMBER: DeleteEntry = DeleteEntry {
    step: ContactStep::PhoneNumbers,
    kind: "phone-number",
    noun: "phone number",
    describe: |j, index| {
        j.phone_numbers.get(index).map(|p| match &p.extension {
            Some(ext) => format!("{} ({}), extension {}", p.phone_number, p.phone_type, ext),
            None => format!("{} ({})", p.phone_number, p.phone_type),
        })
    },
    remove: |j, index| j.remove_phone_number(index).map(drop),
};

const DELETE_EMAIL: DeleteEntry = DeleteEntry {
    step: ContactStep::EmailAddresses,
    kind: "email",
    noun: "email address",
    describe: |j, index| j.email_addresses.get(index).map(|e| e.email_address.clone()),
    remove: |j, index| j.remove_email_address(index).map(drop),
};

const DELETE_IDENTITY: DeleteEntry = DeleteEntry {
    step: ContactStep::IdentityDocuments,
    kind: "identity",
    noun: "identity document",
    describe: |j, index| {
        j.identities
            .get(index)
            .map(|i| format!("{} ({})", i.identity_value, i.identity_type))
    },
    remove: |j, index| j.remove_identity(index).map(drop),
};

async fn show_delete(
    entry: &DeleteEntry,
    session: Session,
    uri: Uri,
    prisoner_number: String,
    index: usize,
    journey_id: String,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, entry.step) {
        return Ok(redirect);
    }
    let description = (entry.describe)(&journey, index).ok_or(CoreError::IndexNotFound {
        kind: entry.noun,
        index,
    })?;
    let check_answers_url = journey.url_for(ContactStep::CheckAnswers);

    let page = PageMeta::new(format!("Are you sure you want to delete this {}?", entry.noun))
        .back(check_answers_url.clone())
        .caption(journey.display_name());
    render(
        "delete_entry.html",
        &page,
        context! {
            action => uri.path(),
            description => description,
            cancel_url => check_answers_url,
        },
    )
    .map(IntoResponse::into_response)
}

async fn submit_delete(
    entry: &DeleteEntry,
    session: Session,
    prisoner_number: String,
    index: usize,
    journey_id: String,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(redirect) = misplaced_step(&journey, entry.step) {
        return Ok(redirect);
    }
    (entry.remove)(&mut journey, index)?;
    tracing::debug!(journey_id = %journey.id, kind = entry.kind, index, "entry deleted");
    let url = journey.url_for(ContactStep::CheckAnswers);
    session.save(journey).await;
    Ok(see_other(&url))
}

type DeletePath = Path<(String, usize, String)>;

pub(crate) async fn delete_phone_number(
    session: Session,
    uri: Uri,
    Path((prisoner_number, index, journey_id)): DeletePath,
) -> AppResult<Response> {
    show_delete(&DELETE_PHONE_NUMBER, session, uri, prisoner_number, index, journey_id).await
}

pub(crate) async fn submit_delete_phone_number(
    session: Session,
    Path((prisoner_number, index, journey_id)): DeletePath,
) -> AppResult<Response> {
    submit_delete(&DELETE_PHONE_NUMBER, session, prisoner_number, index, journey_id).await
}

pub(crate) async fn delete_email(
    session: Session,
    uri: Uri,
    Path((prisoner_number, index, journey_id)): DeletePath,
) -> AppResult<Response> {
    show_delete(&DELETE_EMAIL, session, uri, prisoner_number, index, journey_id).await
}

pub(crate) async fn submit_delete_email(
    session: Session,
    Path((prisoner_number, index, journey_id)): DeletePath,
) -> AppResult<Response> {
    submit_delete(&DELETE_EMAIL, session, prisoner_number, index, journey_id).await
}

pub(crate) async fn delete_identity(
    session: Session,
    uri: Uri,
    Path((prisoner_number, index, journey_id)): DeletePath,
) -> AppResult<Response> {
    show_delete(&DELETE_IDENTITY, session, uri, prisoner_number, index, journey_id).await
}

pub(crate) async fn submit_delete_identity(
    session: Session,
    Path((prisoner_number, index, journey_id)): DeletePath,
) -> AppResult<Response> {
    submit_delete(&DELETE_IDENTITY, session, prisoner_number, index, journey_id).await
}
