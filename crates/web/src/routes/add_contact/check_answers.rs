//! Check answers and final submission of the add-contact journey.

use super::{load, JourneyPath};
use crate::error::AppResult;
use crate::routes::see_other;
use crate::session::Session;
use crate::templates::{render, PageMeta};
use crate::user::CurrentUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use contacts_api_client::{
    AddContactRelationshipRequest, ContactRelationship, CreateContactRequest,
    EmailAddressRequest, IdentityRequest, PhoneNumberRequest, ReferenceDataCache,
};
use contacts_core::journey::contact::CompletedRelationship;
use contacts_core::navigation::{urls, ContactFlow, ContactStep};
use contacts_core::AddContactJourney;
use contacts_types::{ReferenceCodeGroup, YesNo};
use minijinja::{context, Value};

/// One row of the summary list.
fn row(label: &str, value: impl Into<String>, change_url: String) -> Value {
    context! {
        label => label,
        value => value.into(),
        change_url => change_url,
    }
}

fn yes_no_label(answer: Option<YesNo>) -> &'static str {
    answer.map(YesNo::label).unwrap_or("Not provided")
}

/// Summary rows with reference codes replaced by their descriptions.
async fn summary_rows(
    journey: &AddContactJourney,
    reference_data: &ReferenceDataCache,
    can_approve_visitors: bool,
    token: &str,
) -> AppResult<Vec<Value>> {
    let mut rows = Vec::new();
    let change = |step: ContactStep| journey.url_for(step);

    match journey.flow() {
        ContactFlow::Create => {
            if let Some(names) = &journey.names {
                let title = match &names.title {
                    Some(code) => reference_data.describe(ReferenceCodeGroup::Title, code, token).await?,
                    None => "Not provided".to_string(),
                };
                rows.push(row("Title", title, change(ContactStep::EnterName)));
                rows.push(row("Name", names.formatted(), change(ContactStep::EnterName)));
            }
        }
        ContactFlow::AddExisting => {
            if let Some(contact) = &journey.matched_contact {
                rows.push(row(
                    "Contact",
                    contact.formatted_name(),
                    change(ContactStep::Search),
                ));
            }
        }
    }

    let relationship = &journey.relationship;
    if let Some(relationship_type) = relationship.relationship_type {
        rows.push(row(
            "Relationship type",
            relationship_type.label(),
            change(ContactStep::RelationshipType),
        ));
        if let Some(code) = &relationship.relationship_to_prisoner {
            let description = reference_data
                .describe(relationship_type.relationship_group(), code, token)
                .await?;
            rows.push(row(
                "Relationship to prisoner",
                description,
                change(ContactStep::RelationshipToPrisoner),
            ));
        }
    }
    rows.push(row(
        "Emergency contact",
        yes_no_label(relationship.is_emergency_contact),
        change(ContactStep::EmergencyContact),
    ));
    rows.push(row(
        "Next of kin",
        yes_no_label(relationship.is_next_of_kin),
        change(ContactStep::NextOfKin),
    ));

    if journey.flow() == ContactFlow::Create {
        let dob = match journey.date_of_birth.and_then(|d| d.date()) {
            Some(date) => date.format("%-d %B %Y").to_string(),
            None => "Not provided".to_string(),
        };
        rows.push(row("Date of birth", dob, change(ContactStep::DateOfBirth)));
    }
    if can_approve_visitors {
        rows.push(row(
            "Approved for visits",
            yes_no_label(relationship.is_approved_visitor),
            change(ContactStep::ApprovedVisitor),
        ));
    }
    rows.push(row(
        "Comments on the relationship",
        relationship.comments.clone().unwrap_or_else(|| "Not provided".to_string()),
        change(ContactStep::RelationshipComments),
    ));
    Ok(rows)
}

/// Saved phone numbers, emails and identities, each with a delete link.
async fn sub_record_sections(
    journey: &AddContactJourney,
    reference_data: &ReferenceDataCache,
    token: &str,
) -> AppResult<Value> {
    let p = &journey.prisoner_number;
    let mut phones = Vec::new();
    for (index, phone) in journey.phone_numbers.iter().enumerate() {
        let phone_type = reference_data
            .describe(ReferenceCodeGroup::PhoneType, &phone.phone_type, token)
            .await?;
        let text = match &phone.extension {
            Some(ext) => format!("{phone_type}: {}, extension {ext}", phone.phone_number),
            None => format!("{phone_type}: {}", phone.phone_number),
        };
        phones.push(context! {
            text => text,
            delete_url => urls::delete_entry("phone-number", index, p, &journey.id),
        });
    }

    let emails: Vec<_> = journey
        .email_addresses
        .iter()
        .enumerate()
        .map(|(index, email)| {
            context! {
                text => &email.email_address,
                delete_url => urls::delete_entry("email", index, p, &journey.id),
            }
        })
        .collect();

    let mut identities = Vec::new();
    for (index, identity) in journey.identities.iter().enumerate() {
        let identity_type = reference_data
            .describe(ReferenceCodeGroup::IdType, &identity.identity_type, token)
            .await?;
        let text = match &identity.issuing_authority {
            Some(authority) => format!("{identity_type}: {} ({authority})", identity.identity_value),
            None => format!("{identity_type}: {}", identity.identity_value),
        };
        identities.push(context! {
            text => text,
            delete_url => urls::delete_entry("identity", index, p, &journey.id),
        });
    }

    Ok(context! {
        phones => phones,
        phones_url => journey.url_for(ContactStep::PhoneNumbers),
        emails => emails,
        emails_url => journey.url_for(ContactStep::EmailAddresses),
        identities => identities,
        identities_url => journey.url_for(ContactStep::IdentityDocuments),
    })
}

pub(crate) async fn check_answers(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    uri: Uri,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (prisoner_number, mut journey) = load(&session, &prisoner_number, &journey_id).await?;
    let can_approve = user.can_approve_visitors();
    if let Some(step) = journey.first_incomplete_step(can_approve) {
        tracing::debug!(journey_id = %journey.id, step = step.path_segment(), "journey incomplete");
        return Ok(see_other(&journey.url_for(step)));
    }
    journey.is_checking_answers = true;

    let rows = summary_rows(&journey, &state.reference_data, can_approve, &user.token).await?;
    let sections = match journey.flow() {
        ContactFlow::Create => Some(sub_record_sections(&journey, &state.reference_data, &user.token).await?),
        ContactFlow::AddExisting => None,
    };
    let page = PageMeta::new("Check your answers before linking the contact to the prisoner")
        .back(journey.back_url(ContactStep::CheckAnswers, can_approve))
        .caption(journey.display_name());
    let body = render(
        "check_answers.html",
        &page,
        context! {
            action => uri.path(),
            rows => rows,
            sections => sections,
            cancel_url => urls::add_contact_cancel(&prisoner_number, &journey.id),
        },
    )?;
    session.save(journey).await;
    Ok(body.into_response())
}

fn relationship_body(
    journey: &AddContactJourney,
    completed: CompletedRelationship,
) -> ContactRelationship {
    ContactRelationship {
        prisoner_number: journey.prisoner_number.to_string(),
        relationship_type_code: completed.relationship_type.code().to_string(),
        relationship_to_prisoner_code: completed.relationship_to_prisoner,
        is_next_of_kin: completed.is_next_of_kin,
        is_emergency_contact: completed.is_emergency_contact,
        is_approved_visitor: completed.is_approved_visitor,
        comments: completed.comments,
    }
}

/// Builds the create-contact request from a complete create-mode journey.
pub(crate) fn create_contact_request(
    journey: &AddContactJourney,
    created_by: &str,
) -> AppResult<CreateContactRequest> {
    let names = journey.names.clone().unwrap_or_default();
    let relationship = relationship_body(journey, journey.completed_relationship()?);
    Ok(CreateContactRequest {
        title_code: names.title,
        last_name: names.last_name,
        first_name: names.first_name,
        middle_names: names.middle_names,
        date_of_birth: journey.date_of_birth.and_then(|d| d.date()),
        relationship: Some(relationship),
        phone_numbers: journey
            .phone_numbers
            .iter()
            .map(|p| PhoneNumberRequest {
                phone_type: p.phone_type.clone(),
                phone_number: p.phone_number.clone(),
                ext_number: p.extension.clone(),
            })
            .collect(),
        email_addresses: journey
            .email_addresses
            .iter()
            .map(|e| EmailAddressRequest {
                email_address: e.email_address.clone(),
            })
            .collect(),
        identities: journey
            .identities
            .iter()
            .map(|i| IdentityRequest {
                identity_type: i.identity_type.clone(),
                identity_value: i.identity_value.clone(),
                issuing_authority: i.issuing_authority.clone(),
            })
            .collect(),
        created_by: created_by.to_string(),
    })
}

pub(crate) async fn submit(
    State(state): State<AppState>,
    session: Session,
    user: CurrentUser,
    Path((prisoner_number, journey_id)): JourneyPath,
) -> AppResult<Response> {
    let (prisoner_number, journey) = load(&session, &prisoner_number, &journey_id).await?;
    if let Some(step) = journey.first_incomplete_step(user.can_approve_visitors()) {
        tracing::warn!(
            journey_id = %journey.id,
            step = step.path_segment(),
            "submission of an incomplete journey"
        );
        return Ok(see_other(&journey.url_for(step)));
    }

    let url = match journey.matched_contact_id() {
        None => {
            let request = create_contact_request(&journey, &user.username)?;
            let created = state.api.create_contact(&request, &user.token).await?;
            tracing::info!(
                journey_id = %journey.id,
                contact_id = created.created_contact.id,
                "contact created"
            );
            match created.created_relationship {
                Some(relationship) => urls::relationship_success(
                    &prisoner_number,
                    created.created_contact.id,
                    relationship.prisoner_contact_id,
                ),
                None => urls::contact_list(&prisoner_number),
            }
        }
        Some(contact_id) => {
            let request = AddContactRelationshipRequest {
                contact_id,
                relationship: relationship_body(&journey, journey.completed_relationship()?),
                created_by: user.username.clone(),
            };
            match state.api.add_contact_relationship(&request, &user.token).await {
                Ok(relationship) => {
                    tracing::info!(
                        journey_id = %journey.id,
                        contact_id,
                        prisoner_contact_id = relationship.prisoner_contact_id,
                        "relationship created"
                    );
                    urls::relationship_success(
                        &prisoner_number,
                        contact_id,
                        relationship.prisoner_contact_id,
                    )
                }
                Err(e) if e.is_conflict() => {
                    tracing::info!(journey_id = %journey.id, contact_id, "relationship already exists");
                    return Ok(see_other(&urls::handle_duplicate(&prisoner_number, &journey.id)));
                }
                Err(e) => return Err(e.into()),
            }
        }
    };
    session.remove::<AddContactJourney>(&journey.id).await;
    Ok(see_other(&url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use contacts_core::journey::{ContactNames, DateOfBirthAnswer, PhoneNumberEntry};
    use contacts_types::{PrisonerNumber, RelationshipType};

    #[test]
    fn test_create_contact_request_carries_every_answer() {
        let mut journey =
            AddContactJourney::new(PrisonerNumber::parse("A1234BC").unwrap(), Utc::now());
        journey.start_create();
        journey.names = Some(ContactNames {
            title: Some("MR".into()),
            last_name: "Last".into(),
            first_name: "First".into(),
            middle_names: None,
        });
        journey.set_relationship_type(RelationshipType::Social);
        journey.relationship.relationship_to_prisoner = Some("MOT".into());
        journey.relationship.is_emergency_contact = Some(YesNo::No);
        journey.relationship.is_next_of_kin = Some(YesNo::Yes);
        journey.date_of_birth = Some(DateOfBirthAnswer::Known(
            NaiveDate::from_ymd_opt(1980, 2, 1).unwrap(),
        ));
        journey.phone_numbers.push(PhoneNumberEntry {
            phone_type: "MOB".into(),
            phone_number: "07700 900000".into(),
            extension: None,
        });

        let request = create_contact_request(&journey, "USER1").unwrap();
        assert_eq!(request.title_code.as_deref(), Some("MR"));
        assert_eq!(request.date_of_birth, NaiveDate::from_ymd_opt(1980, 2, 1));
        assert_eq!(request.created_by, "USER1");
        assert_eq!(request.phone_numbers[0].phone_number, "07700 900000");
        let relationship = request.relationship.unwrap();
        assert_eq!(relationship.prisoner_number, "A1234BC");
        assert_eq!(relationship.relationship_type_code, "S");
        assert_eq!(relationship.relationship_to_prisoner_code, "MOT");
        assert!(relationship.is_next_of_kin);
        assert!(!relationship.is_emergency_contact);
        assert!(!relationship.is_approved_visitor);
    }
}
