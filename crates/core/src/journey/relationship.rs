//! The change-relationship-type journey for an existing relationship.

use super::Journey;
use crate::navigation::{urls, RelationshipTypeStep};
use chrono::{DateTime, Utc};
use contacts_types::{PrisonerNumber, RelationshipType};
use contacts_uuid::JourneyId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRelationshipTypeJourney {
    pub id: JourneyId,
    pub prisoner_number: PrisonerNumber,
    pub contact_id: i64,
    pub prisoner_contact_id: i64,
    pub contact_display_name: String,
    pub current_type: RelationshipType,
    pub current_relationship_to_prisoner: String,
    pub new_type: Option<RelationshipType>,
    pub last_touched: DateTime<Utc>,
}

impl Journey for ChangeRelationshipTypeJourney {
    const FLOW: &'static str = "change-relationship-type";

    fn id(&self) -> JourneyId {
        self.id
    }

    fn last_touched(&self) -> DateTime<Utc> {
        self.last_touched
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_touched = now;
    }
}

impl ChangeRelationshipTypeJourney {
    pub fn new(
        prisoner_number: PrisonerNumber,
        contact_id: i64,
        prisoner_contact_id: i64,
        contact_display_name: String,
        current_type: RelationshipType,
        current_relationship_to_prisoner: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: JourneyId::new(),
            prisoner_number,
            contact_id,
            prisoner_contact_id,
            contact_display_name,
            current_type,
            current_relationship_to_prisoner,
            new_type: None,
            last_touched: now,
        }
    }

    /// The type whose codes the relationship page lists.
    pub fn selected_type(&self) -> RelationshipType {
        self.new_type.unwrap_or(self.current_type)
    }

    /// The code to pre-select on the relationship page. Only meaningful while the type is
    /// unchanged, since codes belong to one type.
    pub fn preselected_relationship(&self) -> Option<&str> {
        (self.selected_type() == self.current_type)
            .then_some(self.current_relationship_to_prisoner.as_str())
    }

    pub fn url_for(&self, step: RelationshipTypeStep) -> String {
        urls::relationship_type_step(step, &self.prisoner_number, &self.id)
    }

    pub fn back_url(&self, step: RelationshipTypeStep) -> String {
        match step.previous() {
            Some(previous) => self.url_for(previous),
            None => self.contact_details_url(),
        }
    }

    pub fn contact_details_url(&self) -> String {
        urls::contact_details(&self.prisoner_number, self.contact_id, self.prisoner_contact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journey() -> ChangeRelationshipTypeJourney {
        ChangeRelationshipTypeJourney::new(
            PrisonerNumber::parse("A1234BC").unwrap(),
            1,
            2,
            "Smith, Jo".into(),
            RelationshipType::Social,
            "MOT".into(),
            Utc::now(),
        )
    }

    #[test]
    fn test_preselected_relationship_only_for_unchanged_type() {
        let mut j = journey();
        assert_eq!(j.preselected_relationship(), Some("MOT"));

        j.new_type = Some(RelationshipType::Official);
        assert_eq!(j.selected_type(), RelationshipType::Official);
        assert_eq!(j.preselected_relationship(), None);

        j.new_type = Some(RelationshipType::Social);
        assert_eq!(j.preselected_relationship(), Some("MOT"));
    }

    #[test]
    fn test_back_urls() {
        let j = journey();
        assert_eq!(
            j.back_url(RelationshipTypeStep::SelectType),
            "/prisoner/A1234BC/contacts/manage/1/relationship/2"
        );
        assert_eq!(
            j.back_url(RelationshipTypeStep::SelectRelationship),
            j.url_for(RelationshipTypeStep::SelectType)
        );
    }
}
