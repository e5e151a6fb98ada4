//! URL builders for every page the journeys redirect to.
//!
//! Route definitions in the web crate use the same shapes; keeping the builders here means the
//! navigation tables and their tests can talk about real URLs.

use super::{ContactStep, RelationshipTypeStep, RestrictionStep};
use crate::journey::RestrictionClass;
use contacts_types::PrisonerNumber;
use contacts_uuid::JourneyId;

pub fn contact_list(prisoner_number: &PrisonerNumber) -> String {
    format!("/prisoner/{prisoner_number}/contacts/list")
}

pub fn add_contact_start(prisoner_number: &PrisonerNumber) -> String {
    format!("/prisoner/{prisoner_number}/contacts/add/start")
}

pub fn add_contact_cancel(prisoner_number: &PrisonerNumber, journey_id: &JourneyId) -> String {
    format!("/prisoner/{prisoner_number}/contacts/add/cancel/{journey_id}")
}

/// URL of an add-contact step.
///
/// The match page needs the contact being matched; without one it falls back to the search page.
pub fn contact_step(
    step: ContactStep,
    prisoner_number: &PrisonerNumber,
    journey_id: &JourneyId,
    matched_contact_id: Option<i64>,
) -> String {
    match (step, matched_contact_id) {
        (ContactStep::Search, _) | (ContactStep::ContactMatch, None) => {
            format!("/prisoner/{prisoner_number}/contacts/search/{journey_id}")
        }
        (ContactStep::ContactMatch, Some(contact_id)) => {
            contact_match(prisoner_number, contact_id, journey_id)
        }
        (step, _) => format!(
            "/prisoner/{prisoner_number}/contacts/add/{}/{journey_id}",
            step.path_segment()
        ),
    }
}

pub fn contact_match(prisoner_number: &PrisonerNumber, contact_id: i64, journey_id: &JourneyId) -> String {
    format!("/prisoner/{prisoner_number}/contacts/add/match/{contact_id}/{journey_id}")
}

pub fn search_create_new(prisoner_number: &PrisonerNumber, journey_id: &JourneyId) -> String {
    format!("/prisoner/{prisoner_number}/contacts/search/{journey_id}/create-new")
}

pub fn possible_record_match(
    prisoner_number: &PrisonerNumber,
    contact_id: i64,
    journey_id: &JourneyId,
) -> String {
    format!(
        "/prisoner/{prisoner_number}/contacts/add/possible-existing-record-match/{contact_id}/{journey_id}"
    )
}

/// Confirmation page for deleting one pending sub-record (`kind` is `phone-number`, `email` or
/// `identity`).
pub fn delete_entry(
    kind: &str,
    index: usize,
    prisoner_number: &PrisonerNumber,
    journey_id: &JourneyId,
) -> String {
    format!("/prisoner/{prisoner_number}/contacts/add/delete-{kind}/{index}/{journey_id}")
}

pub fn handle_duplicate(prisoner_number: &PrisonerNumber, journey_id: &JourneyId) -> String {
    format!("/prisoner/{prisoner_number}/contacts/add/handle-duplicate/{journey_id}")
}

pub fn contact_details(prisoner_number: &PrisonerNumber, contact_id: i64, prisoner_contact_id: i64) -> String {
    format!("/prisoner/{prisoner_number}/contacts/manage/{contact_id}/relationship/{prisoner_contact_id}")
}

pub fn relationship_success(
    prisoner_number: &PrisonerNumber,
    contact_id: i64,
    prisoner_contact_id: i64,
) -> String {
    format!("/prisoner/{prisoner_number}/contacts/{contact_id}/relationship/{prisoner_contact_id}/success")
}

pub fn restriction_start(
    prisoner_number: &PrisonerNumber,
    contact_id: i64,
    prisoner_contact_id: i64,
    restriction_class: RestrictionClass,
) -> String {
    format!(
        "{}/restriction/add/{}/start",
        contact_details(prisoner_number, contact_id, prisoner_contact_id),
        restriction_class.path_segment()
    )
}

pub fn restriction_step(step: RestrictionStep, prisoner_number: &PrisonerNumber, journey_id: &JourneyId) -> String {
    format!(
        "/prisoner/{prisoner_number}/contacts/restriction/{}/{journey_id}",
        step.path_segment()
    )
}

pub fn restriction_cancel(prisoner_number: &PrisonerNumber, journey_id: &JourneyId) -> String {
    format!("/prisoner/{prisoner_number}/contacts/restriction/cancel/{journey_id}")
}

pub fn restriction_success(
    prisoner_number: &PrisonerNumber,
    contact_id: i64,
    prisoner_contact_id: i64,
) -> String {
    format!(
        "{}/restriction/success",
        contact_details(prisoner_number, contact_id, prisoner_contact_id)
    )
}

pub fn relationship_type_start(
    prisoner_number: &PrisonerNumber,
    contact_id: i64,
    prisoner_contact_id: i64,
) -> String {
    format!(
        "{}/type/start",
        contact_details(prisoner_number, contact_id, prisoner_contact_id)
    )
}

pub fn relationship_type_step(
    step: RelationshipTypeStep,
    prisoner_number: &PrisonerNumber,
    journey_id: &JourneyId,
) -> String {
    format!(
        "/prisoner/{prisoner_number}/contacts/manage/relationship-type/{}/{journey_id}",
        step.path_segment()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (PrisonerNumber, JourneyId) {
        (
            PrisonerNumber::parse("A1234BC").unwrap(),
            JourneyId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap(),
        )
    }

    #[test]
    fn test_contact_step_urls() {
        let (p, j) = ids();
        assert_eq!(
            contact_step(ContactStep::EnterName, &p, &j, None),
            "/prisoner/A1234BC/contacts/add/enter-name/550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(
            contact_step(ContactStep::ContactMatch, &p, &j, Some(22)),
            "/prisoner/A1234BC/contacts/add/match/22/550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(
            contact_step(ContactStep::ContactMatch, &p, &j, None),
            "/prisoner/A1234BC/contacts/search/550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_manage_urls() {
        let (p, j) = ids();
        assert_eq!(
            restriction_start(&p, 1, 2, RestrictionClass::ContactGlobal),
            "/prisoner/A1234BC/contacts/manage/1/relationship/2/restriction/add/contact-global/start"
        );
        assert_eq!(
            restriction_step(RestrictionStep::CheckAnswers, &p, &j),
            "/prisoner/A1234BC/contacts/restriction/check-answers/550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(
            relationship_type_step(RelationshipTypeStep::SelectType, &p, &j),
            "/prisoner/A1234BC/contacts/manage/relationship-type/select-type/550e8400-e29b-41d4-a716-446655440000"
        );
    }
}
