//! Changing the relationship type of an existing prisoner/contact relationship.
//!
//! Reuses the add-contact validators and templates for both pages.

use super::{form_values, parse_prisoner, reject, see_other, FormBody};
use crate::error::{AppError, AppResult};
use crate::session::Session;
use crate::templates::{render, PageMeta};
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use contacts_api_client::UpdateRelationshipRequest;
use contacts_core::form::resolve_from;
use contacts_core::journey::ChangeRelationshipTypeJourney;
use contacts_core::navigation::RelationshipTypeStep;
use contacts_core::validation::contact::{
    validate_relationship_to_prisoner, validate_relationship_type, RELATIONSHIP,
    RELATIONSHIP_TYPE,
};
use contacts_types::{PrisonerNumber, RelationshipType};
use minijinja::context;

const FLOW: &str = "/prisoner/:prisoner_number/contacts/manage/relationship-type";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/prisoner/:prisoner_number/contacts/manage/:contact_id/relationship/:prisoner_contact_id/type/start",
            get(start),
        )
        .route(
            &format!("{FLOW}/{}/:journey_id", RelationshipTypeStep::SelectType.path_segment()),
            get(select_type).post(submit_select_type),
        )
        .route(
            &format!(
                "{FLOW}/{}/:journey_id",
                RelationshipTypeStep::SelectRelationship.path_segment()
            ),
            get(select_relationship).post(submit_select_relationship),
        )
}

type JourneyPath = Path<(String, String)>;

async fn load(
    session: &Session,
    prisoner_number: &str,
    journey_id: &str,
) -> AppResult<(PrisonerNumber, ChangeRelationshipTypeJourney)> {
    let prisoner_number = parse_prisoner(prisoner_number)?;
    let journey = session.journey(&prisoner_number, journey_id).await?;
    Ok((prisoner_number, journey))
}

async fn start(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path((prisoner_number, contact_id, prisoner_contact_id)): Path<(String, i64, i64)>,
) -> AppResult<Response> {
    let prisoner_number = parse_prisoner(&prisoner_number)?;
    let relationship = state
        .api
        .get_prisoner_contact_relationship(prisoner_contact_id, &user.token)
        .await?;
    let current_type = RelationshipType::from_code(&relationship.relationship_type_code)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "relationship type '{}'",
                relationship.relationship_type_code
            ))
        })?;
    let contact = state.api.get_contact(contact_id, &user.token).await?;

    let journey = ChangeRelationshipTypeJourney::new(
        prisoner_number,
        contact_id,
        prisoner_contact_id,
        contact.formatted_name(),
        current_type,
        relationship.relationship_to_prisoner_code,
        Utc::now(),
    );
    let url = journey.url_for(RelationshipTypeStep::SelectType);
    tracing::info!(journey_id = %journey.id, prisoner_contact_id, "change relationship type started");
    session.save(journey).await;
    Ok(see_other(&url))
}

async fn select_type(
    session: Session,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    let flash = session.take_flash(uri.path()).await;

    let heading = format!(
        "Is {} a social or official contact for the prisoner?",
        journey.contact_display_name
    );
    let page = PageMeta::new(heading.clone())
        .back(journey.back_url(RelationshipTypeStep::SelectType))
        .caption(Some(journey.contact_display_name.clone()))
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
            selected => resolve_from(
                flash.as_ref(),
                RELATIONSHIP_TYPE,
                Some(journey.selected_type().code()),
                "",
            ),
        },
    )
    .map(IntoResponse::into_response)
}

async fn submit_select_type(
    session: Session,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    let (_, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    let form = form_values(form);
    match validate_relationship_type(&form) {
        Ok(relationship_type) => {
            journey.new_type = Some(relationship_type);
            let url = journey.url_for(RelationshipTypeStep::SelectRelationship);
            session.save(journey).await;
            Ok(see_other(&url))
        }
        Err(errors) => Ok(reject(&session, &uri, errors, form).await),
    }
}

async fn select_relationship(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    let flash = session.take_flash(uri.path()).await;
    let codes = state
        .reference_data
        .codes(journey.selected_type().relationship_group(), &user.token)
        .await?;

    let heading = format!(
        "How is {} related to the prisoner?",
        journey.contact_display_name
    );
    let page = PageMeta::new(heading.clone())
        .back(journey.back_url(RelationshipTypeStep::SelectRelationship))
        .caption(Some(journey.contact_display_name.clone()))
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
                journey.preselected_relationship(),
                "",
            ),
        },
    )
    .map(IntoResponse::into_response)
}

async fn submit_select_relationship(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
    form: FormBody,
) -> AppResult<Response> {
    let (_, journey) = load(&session, &prisoner_number, &journey_id).await?;
    let relationship_type = journey.selected_type();
    let codes = state
        .reference_data
        .codes(relationship_type.relationship_group(), &user.token)
        .await?;
    let allowed: Vec<&str> = codes.iter().map(|c| c.code.as_str()).collect();

    let form = form_values(form);
    let code = match validate_relationship_to_prisoner(&form, &allowed) {
        Ok(code) => code,
        Err(errors) => return Ok(reject(&session, &uri, errors, form).await),
    };
    let request = UpdateRelationshipRequest {
        relationship_type_code: Some(relationship_type.code().to_string()),
        relationship_to_prisoner_code: Some(code),
        updated_by: user.username.clone(),
    };
    state
        .api
        .update_contact_relationship(journey.prisoner_contact_id, &request, &user.token)
        .await?;
    tracing::info!(
        journey_id = %journey.id,
        prisoner_contact_id = journey.prisoner_contact_id,
        relationship_type = relationship_type.code(),
        "relationship type updated"
    );

    session
        .remove::<ChangeRelationshipTypeJourney>(&journey.id)
        .await;
    Ok(see_other(&journey.contact_details_url()))
}
