//! The add-restriction journey.

use super::Journey;
use crate::constants::{
    MAX_CONTACT_GLOBAL_RESTRICTION_COMMENT_LENGTH, MAX_PRISONER_CONTACT_RESTRICTION_COMMENT_LENGTH,
};
use crate::navigation::{urls, RestrictionNavigationState, RestrictionStep};
use chrono::{DateTime, NaiveDate, Utc};
use contacts_types::PrisonerNumber;
use contacts_uuid::JourneyId;
use serde::{Deserialize, Serialize};

/// Which kind of restriction is being added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestrictionClass {
    /// Scoped to one prisoner/contact relationship.
    PrisonerContact,
    /// Applies to the contact regardless of prisoner.
    ContactGlobal,
}

impl RestrictionClass {
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "prisoner-contact" => Some(Self::PrisonerContact),
            "contact-global" => Some(Self::ContactGlobal),
            _ => None,
        }
    }

    pub fn path_segment(self) -> &'static str {
        match self {
            Self::PrisonerContact => "prisoner-contact",
            Self::ContactGlobal => "contact-global",
        }
    }

    pub fn max_comment_length(self) -> usize {
        match self {
            Self::PrisonerContact => MAX_PRISONER_CONTACT_RESTRICTION_COMMENT_LENGTH,
            Self::ContactGlobal => MAX_CONTACT_GLOBAL_RESTRICTION_COMMENT_LENGTH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PrisonerContact => "relationship restriction",
            Self::ContactGlobal => "global restriction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionAnswers {
    pub restriction_type: String,
    pub start_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRestrictionJourney {
    pub id: JourneyId,
    pub prisoner_number: PrisonerNumber,
    pub contact_id: i64,
    pub prisoner_contact_id: i64,
    pub restriction_class: RestrictionClass,
    pub contact_display_name: String,
    pub restriction: Option<RestrictionAnswers>,
    pub is_checking_answers: bool,
    pub last_touched: DateTime<Utc>,
}

impl Journey for AddRestrictionJourney {
    const FLOW: &'static str = "add-restriction";

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

impl AddRestrictionJourney {
    pub fn new(
        prisoner_number: PrisonerNumber,
        contact_id: i64,
        prisoner_contact_id: i64,
        restriction_class: RestrictionClass,
        contact_display_name: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: JourneyId::new(),
            prisoner_number,
            contact_id,
            prisoner_contact_id,
            restriction_class,
            contact_display_name,
            restriction: None,
            is_checking_answers: false,
            last_touched: now,
        }
    }

    pub fn navigation_state(&self) -> RestrictionNavigationState {
        RestrictionNavigationState {
            is_checking_answers: self.is_checking_answers,
        }
    }

    pub fn url_for(&self, step: RestrictionStep) -> String {
        urls::restriction_step(step, &self.prisoner_number, &self.id)
    }

    pub fn next_url(&self, step: RestrictionStep) -> String {
        self.url_for(step.next(&self.navigation_state()))
    }

    pub fn back_url(&self, step: RestrictionStep) -> String {
        match step.previous(&self.navigation_state()) {
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

    #[test]
    fn test_comment_limits_differ_by_class() {
        assert_eq!(RestrictionClass::PrisonerContact.max_comment_length(), 255);
        assert_eq!(RestrictionClass::ContactGlobal.max_comment_length(), 240);
    }

    #[test]
    fn test_path_segments_round_trip() {
        for class in [RestrictionClass::PrisonerContact, RestrictionClass::ContactGlobal] {
            assert_eq!(RestrictionClass::from_path_segment(class.path_segment()), Some(class));
        }
        assert_eq!(RestrictionClass::from_path_segment("other"), None);
    }

    #[test]
    fn test_back_url_from_first_step_returns_to_contact() {
        let j = AddRestrictionJourney::new(
            PrisonerNumber::parse("A1234BC").unwrap(),
            11,
            22,
            RestrictionClass::PrisonerContact,
            "Smith, Jo".into(),
            Utc::now(),
        );
        assert_eq!(
            j.back_url(RestrictionStep::EnterRestriction),
            "/prisoner/A1234BC/contacts/manage/11/relationship/22"
        );
        assert_eq!(
            j.next_url(RestrictionStep::EnterRestriction),
            j.url_for(RestrictionStep::CheckAnswers)
        );
    }
}
