//! Adding a restriction to a prisoner/contact relationship or to a contact globally.

use super::{date_parts, form_values, parse_prisoner, reject, see_other, FormBody};
use crate::error::{AppError, AppResult};
use crate::session::Session;
use crate::templates::{render, PageMeta};
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use contacts_api_client::CreateRestrictionRequest;
use contacts_core::form::resolve_from;
use contacts_core::journey::{AddRestrictionJourney, RestrictionClass};
use contacts_core::navigation::{urls, RestrictionStep};
use contacts_core::validation::restriction::{
    validate_restriction, COMMENTS, EXPIRY_DATE, START_DATE, TYPE,
};
use contacts_types::{PrisonerNumber, ReferenceCodeGroup};
use contacts_uuid::JourneyId;
use minijinja::context;
use serde::Deserialize;

const MANAGE: &str =
    "/prisoner/:prisoner_number/contacts/manage/:contact_id/relationship/:prisoner_contact_id";
const FLOW: &str = "/prisoner/:prisoner_number/contacts/restriction";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            &format!("{MANAGE}/restriction/add/:restriction_class/start"),
            get(start),
        )
        .route(&format!("{MANAGE}/restriction/success"), get(success))
        .route(
            &format!("{FLOW}/{}/:journey_id", RestrictionStep::EnterRestriction.path_segment()),
            get(enter_restriction).post(submit_enter_restriction),
        )
        .route(
            &format!("{FLOW}/{}/:journey_id", RestrictionStep::CheckAnswers.path_segment()),
            get(check_answers).post(submit_check_answers),
        )
        .route(&format!("{FLOW}/cancel/:journey_id"), get(cancel))
}

type RestrictionPath = Path<(String, String)>;

async fn load(
    session: &Session,
    prisoner_number: &str,
    journey_id: &str,
) -> AppResult<(PrisonerNumber, AddRestrictionJourney)> {
    let prisoner_number = parse_prisoner(prisoner_number)?;
    let journey = session.journey(&prisoner_number, journey_id).await?;
    Ok((prisoner_number, journey))
}

fn title(journey: &AddRestrictionJourney) -> String {
    format!("Add a new {}", journey.restriction_class.label())
}

async fn start(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path((prisoner_number, contact_id, prisoner_contact_id, restriction_class)): Path<(
        String,
        i64,
        i64,
        String,
    )>,
) -> AppResult<Response> {
    let prisoner_number = parse_prisoner(&prisoner_number)?;
    let restriction_class = RestrictionClass::from_path_segment(&restriction_class)
        .ok_or_else(|| AppError::NotFound(format!("restriction class '{restriction_class}'")))?;
    let contact = state.api.get_contact(contact_id, &user.token).await?;

    let journey = AddRestrictionJourney::new(
        prisoner_number,
        contact_id,
        prisoner_contact_id,
        restriction_class,
        contact.formatted_name(),
        Utc::now(),
    );
    let url = journey.url_for(RestrictionStep::EnterRestriction);
    tracing::info!(
        journey_id = %journey.id,
        restriction_class = restriction_class.path_segment(),
        "add restriction journey started"
    );
    session.save(journey).await;
    Ok(see_other(&url))
}

async fn enter_restriction(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): RestrictionPath,
) -> AppResult<Response> {
    let (prisoner_number, journey) = load(&session, &prisoner_number, &journey_id).await?;
    let flash = session.take_flash(uri.path()).await;
    let codes = state
        .reference_data
        .codes(ReferenceCodeGroup::RestrictionType, &user.token)
        .await?;

    let stored = journey.restriction.as_ref();
    let page = PageMeta::new(title(&journey))
        .back(journey.back_url(RestrictionStep::EnterRestriction))
        .caption(Some(journey.contact_display_name.clone()))
        .flashed(flash.as_ref());
    render(
        "enter_restriction.html",
        &page,
        context! {
            action => uri.path(),
            codes => codes.as_slice(),
            type_field => TYPE,
            restriction_type => resolve_from(
                flash.as_ref(),
                TYPE,
                stored.map(|r| r.restriction_type.as_str()),
                "",
            ),
            start_date_field => START_DATE,
            start_date => date_parts(flash.as_ref(), START_DATE, stored.map(|r| r.start_date)),
            expiry_date_field => EXPIRY_DATE,
            expiry_date => date_parts(flash.as_ref(), EXPIRY_DATE, stored.and_then(|r| r.expiry_date)),
            comments_field => COMMENTS,
            comments => resolve_from(
                flash.as_ref(),
                COMMENTS,
                stored.and_then(|r| r.comments.as_deref()),
                "",
            ),
            max_comment_length => journey.restriction_class.max_comment_length(),
            cancel_url => urls::restriction_cancel(&prisoner_number, &journey.id),
        },
    )
    .map(IntoResponse::into_response)
}

async fn submit_enter_restriction(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): RestrictionPath,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    let codes = state
        .reference_data
        .codes(ReferenceCodeGroup::RestrictionType, &user.token)
        .await?;
    let allowed: Vec<&str> = codes.iter().map(|c| c.code.as_str()).collect();

    let form = form_values(form);
    match validate_restriction(&form, journey.restriction_class, &allowed) {
        Ok(restriction) => {
            journey.restriction = Some(restriction);
            let url = journey.next_url(RestrictionStep::EnterRestriction);
            session.save(journey).await;
            Ok(see_other(&url))
        }
        Err(errors) => Ok(reject(&session, &uri, errors, form).await),
    }
}

async fn check_answers(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): RestrictionPath,
) -> AppResult<Response> {
    let (prisoner_number, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    let Some(restriction) = journey.restriction.clone() else {
        return Ok(see_other(&journey.url_for(RestrictionStep::EnterRestriction)));
    };
    journey.is_checking_answers = true;
    let restriction_type = state
        .reference_data
        .describe(
            ReferenceCodeGroup::RestrictionType,
            &restriction.restriction_type,
            &user.token,
        )
        .await?;

    let change_url = journey.url_for(RestrictionStep::EnterRestriction);
    let page = PageMeta::new(format!(
        "Check your answers before adding a new {}",
        journey.restriction_class.label()
    ))
    .back(journey.back_url(RestrictionStep::CheckAnswers))
    .caption(Some(journey.contact_display_name.clone()));
    let body = render(
        "restriction_check_answers.html",
        &page,
        context! {
            action => uri.path(),
            restriction_type => restriction_type,
            start_date => restriction.start_date,
            expiry_date => restriction.expiry_date,
            comments => restriction.comments,
            change_url => change_url,
            cancel_url => urls::restriction_cancel(&prisoner_number, &journey.id),
        },
    )?;
    session.save(journey).await;
    Ok(body.into_response())
}

async fn submit_check_answers(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path((prisoner_number, journey_id)): RestrictionPath,
) -> AppResult<Response> {
    let (prisoner_number, journey) = load(&session, &prisoner_number, &journey_id).await?;
    let Some(restriction) = journey.restriction.clone() else {
        return Ok(see_other(&journey.url_for(RestrictionStep::EnterRestriction)));
    };
    let request = CreateRestrictionRequest {
        restriction_type: restriction.restriction_type,
        start_date: restriction.start_date,
        expiry_date: restriction.expiry_date,
        comments: restriction.comments,
        created_by: user.username.clone(),
    };
    match journey.restriction_class {
        RestrictionClass::PrisonerContact => {
            state
                .api
                .create_prisoner_contact_restriction(
                    journey.prisoner_contact_id,
                    &request,
                    &user.token,
                )
                .await?;
        }
        RestrictionClass::ContactGlobal => {
            state
                .api
                .create_contact_global_restriction(journey.contact_id, &request, &user.token)
                .await?;
        }
    }
    tracing::info!(
        journey_id = %journey.id,
        restriction_class = journey.restriction_class.path_segment(),
        contact_id = journey.contact_id,
        "restriction created"
    );
    session.remove::<AddRestrictionJourney>(&journey.id).await;
    Ok(see_other(&format!(
        "{}?class={}",
        urls::restriction_success(&prisoner_number, journey.contact_id, journey.prisoner_contact_id),
        journey.restriction_class.path_segment()
    )))
}

async fn cancel(
    session: Session,
    Path((prisoner_number, journey_id)): RestrictionPath,
) -> AppResult<Response> {
    let prisoner_number = parse_prisoner(&prisoner_number)?;
    let Ok(id) = JourneyId::parse(&journey_id) else {
        return Ok(see_other(&urls::contact_list(&prisoner_number)));
    };
    let url = match session.journey::<AddRestrictionJourney>(&prisoner_number, &journey_id).await {
        Ok(journey) => journey.contact_details_url(),
        Err(_) => urls::contact_list(&prisoner_number),
    };
    session.remove::<AddRestrictionJourney>(&id).await;
    Ok(see_other(&url))
}

#[derive(Debug, Deserialize)]
struct SuccessQuery {
    class: Option<String>,
}

async fn success(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((prisoner_number, contact_id, prisoner_contact_id)): Path<(String, i64, i64)>,
    Query(query): Query<SuccessQuery>,
) -> AppResult<Response> {
    let prisoner_number = parse_prisoner(&prisoner_number)?;
    let contact = state.api.get_contact(contact_id, &user.token).await?;
    let label = query
        .class
        .as_deref()
        .and_then(RestrictionClass::from_path_segment)
        .map_or("restriction", RestrictionClass::label);

    let page = PageMeta::new("Restriction added");
    render(
        "success.html",
        &page,
        context! {
            heading => format!("New {label} recorded"),
            message => format!("You’ve added a {label} for {}.", contact.formatted_name()),
            primary_url => urls::contact_details(&prisoner_number, contact_id, prisoner_contact_id),
            primary_label => "View contact details",
            secondary_url => urls::contact_list(&prisoner_number),
            secondary_label => "Back to contacts",
        },
    )
    .map(IntoResponse::into_response)
}
