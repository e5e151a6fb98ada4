//! The add-contact journey.
//!
//! One journey type serves both "create a new contact" and "link an existing contact": the
//! journey begins on the search page with no mode and becomes one or the other once the user
//! either confirms a search result or chooses to create a new record.

use super::Journey;
use crate::navigation::{urls, ContactFlow, ContactNavigationState, ContactStep};
use crate::{CoreError, CoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use contacts_types::{PrisonerNumber, RelationshipType, YesNo};
use contacts_uuid::JourneyId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactMode {
    Create,
    AddExisting { contact_id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactNames {
    pub title: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub middle_names: Option<String>,
}

impl ContactNames {
    /// `Last, First Middle`, the format used on every summary page.
    pub fn formatted(&self) -> String {
        match &self.middle_names {
            Some(middle) => format!("{}, {} {}", self.last_name, self.first_name, middle),
            None => format!("{}, {}", self.last_name, self.first_name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateOfBirthAnswer {
    Known(NaiveDate),
    Unknown,
}

impl DateOfBirthAnswer {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Known(date) => Some(*date),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipAnswers {
    pub relationship_type: Option<RelationshipType>,
    pub relationship_to_prisoner: Option<String>,
    pub is_emergency_contact: Option<YesNo>,
    pub is_next_of_kin: Option<YesNo>,
    pub is_approved_visitor: Option<YesNo>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumberEntry {
    pub phone_type: String,
    pub phone_number: String,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityEntry {
    pub identity_type: String,
    pub identity_value: String,
    pub issuing_authority: Option<String>,
}

/// Denormalised copy of an existing contact, held only to render pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingContactSummary {
    pub contact_id: i64,
    pub last_name: String,
    pub first_name: String,
    pub middle_names: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl ExistingContactSummary {
    pub fn formatted_name(&self) -> String {
        ContactNames {
            title: None,
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
            middle_names: self.middle_names.clone(),
        }
        .formatted()
    }
}

/// The answers of a journey that has everything needed to create a relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRelationship {
    pub relationship_type: RelationshipType,
    pub relationship_to_prisoner: String,
    pub is_emergency_contact: bool,
    pub is_next_of_kin: bool,
    pub is_approved_visitor: bool,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddContactJourney {
    pub id: JourneyId,
    pub prisoner_number: PrisonerNumber,
    pub last_touched: DateTime<Utc>,
    pub mode: Option<ContactMode>,
    pub names: Option<ContactNames>,
    pub date_of_birth: Option<DateOfBirthAnswer>,
    pub relationship: RelationshipAnswers,
    pub phone_numbers: Vec<PhoneNumberEntry>,
    pub email_addresses: Vec<EmailEntry>,
    pub identities: Vec<IdentityEntry>,
    pub possible_existing_records: Option<Vec<ExistingContactSummary>>,
    pub possible_existing_records_reviewed: bool,
    pub matched_contact: Option<ExistingContactSummary>,
    pub is_checking_answers: bool,
}

impl Journey for AddContactJourney {
    const FLOW: &'static str = "add-contact";

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

impl AddContactJourney {
    pub fn new(prisoner_number: PrisonerNumber, now: DateTime<Utc>) -> Self {
        Self {
            id: JourneyId::new(),
            prisoner_number,
            last_touched: now,
            mode: None,
            names: None,
            date_of_birth: None,
            relationship: RelationshipAnswers::default(),
            phone_numbers: Vec::new(),
            email_addresses: Vec::new(),
            identities: Vec::new(),
            possible_existing_records: None,
            possible_existing_records_reviewed: false,
            matched_contact: None,
            is_checking_answers: false,
        }
    }

    /// The flow the journey is following. A journey still on the search page counts as create.
    pub fn flow(&self) -> ContactFlow {
        match self.mode {
            Some(ContactMode::AddExisting { .. }) => ContactFlow::AddExisting,
            _ => ContactFlow::Create,
        }
    }

    pub fn matched_contact_id(&self) -> Option<i64> {
        match self.mode {
            Some(ContactMode::AddExisting { contact_id }) => Some(contact_id),
            _ => None,
        }
    }

    /// Switches to creating a brand-new contact. Any previously matched contact is forgotten.
    pub fn start_create(&mut self) {
        self.mode = Some(ContactMode::Create);
        self.matched_contact = None;
    }

    /// Switches to linking `contact`. Relationship answers already given are kept; answers that
    /// only make sense for a new record are dropped.
    pub fn start_add_existing(&mut self, contact: ExistingContactSummary) {
        self.mode = Some(ContactMode::AddExisting {
            contact_id: contact.contact_id,
        });
        self.matched_contact = Some(contact);
        self.names = None;
        self.date_of_birth = None;
        self.phone_numbers.clear();
        self.email_addresses.clear();
        self.identities.clear();
        self.possible_existing_records = None;
        self.possible_existing_records_reviewed = false;
    }

    /// Records the relationship type.
    ///
    /// Choosing a different type from the one already stored clears the relationship-to-prisoner
    /// code, because codes are specific to a type.
    ///
    /// # Returns
    ///
    /// `true` if the type changed.
    pub fn set_relationship_type(&mut self, relationship_type: RelationshipType) -> bool {
        let changed = self.relationship.relationship_type != Some(relationship_type);
        if changed {
            self.relationship.relationship_type = Some(relationship_type);
            self.relationship.relationship_to_prisoner = None;
        }
        changed
    }

    /// Stores the outcome of the duplicate search after the date of birth step.
    pub fn set_possible_existing_records(&mut self, records: Vec<ExistingContactSummary>) {
        self.possible_existing_records = Some(records);
        self.possible_existing_records_reviewed = false;
    }

    pub fn navigation_state(&self, can_approve_visitors: bool) -> ContactNavigationState {
        ContactNavigationState {
            flow: self.flow(),
            is_checking_answers: self.is_checking_answers,
            can_approve_visitors,
            has_unreviewed_possible_records: !self.possible_existing_records_reviewed
                && self
                    .possible_existing_records
                    .as_ref()
                    .is_some_and(|records| !records.is_empty()),
            relationship_to_prisoner_answered: self.relationship.relationship_to_prisoner.is_some(),
        }
    }

    /// URL of `step` for this journey.
    pub fn url_for(&self, step: ContactStep) -> String {
        urls::contact_step(step, &self.prisoner_number, &self.id, self.matched_contact_id())
    }

    /// URL of the back link for `step`; leaving the journey goes to the prisoner's contact list.
    pub fn back_url(&self, step: ContactStep, can_approve_visitors: bool) -> String {
        match step.previous(&self.navigation_state(can_approve_visitors)) {
            Some(previous) => self.url_for(previous),
            None => urls::contact_list(&self.prisoner_number),
        }
    }

    /// URL to continue to after `step` has been answered.
    pub fn next_url(&self, step: ContactStep, can_approve_visitors: bool) -> String {
        self.url_for(step.next(&self.navigation_state(can_approve_visitors)))
    }

    /// The first step in the journey's sequence whose required answer is missing.
    ///
    /// Returns `None` when the journey is complete and may be submitted.
    pub fn first_incomplete_step(&self, can_approve_visitors: bool) -> Option<ContactStep> {
        if self.mode.is_none() {
            return Some(ContactStep::Search);
        }
        let state = self.navigation_state(can_approve_visitors);
        self.flow()
            .sequence()
            .iter()
            .copied()
            .take_while(|step| *step != ContactStep::CheckAnswers)
            .filter(|step| !step.is_skipped(&state))
            .find(|step| !self.is_answered(*step))
    }

    fn is_answered(&self, step: ContactStep) -> bool {
        match step {
            ContactStep::Search => self.mode.is_some(),
            ContactStep::ContactMatch => self.matched_contact.is_some(),
            ContactStep::EnterName => self.names.is_some(),
            ContactStep::RelationshipType => self.relationship.relationship_type.is_some(),
            ContactStep::RelationshipToPrisoner => {
                self.relationship.relationship_to_prisoner.is_some()
            }
            ContactStep::EmergencyContact => self.relationship.is_emergency_contact.is_some(),
            ContactStep::NextOfKin => self.relationship.is_next_of_kin.is_some(),
            ContactStep::DateOfBirth => self.date_of_birth.is_some(),
            ContactStep::PossibleExistingRecords => self.possible_existing_records_reviewed,
            ContactStep::ApprovedVisitor => self.relationship.is_approved_visitor.is_some(),
            ContactStep::AdditionalInfo
            | ContactStep::PhoneNumbers
            | ContactStep::EmailAddresses
            | ContactStep::IdentityDocuments
            | ContactStep::RelationshipComments
            | ContactStep::CheckAnswers => true,
        }
    }

    /// The relationship answers, checked for completeness.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::IncompleteJourney` naming the first missing answer.
    pub fn completed_relationship(&self) -> CoreResult<CompletedRelationship> {
        let missing = |what: &str| CoreError::IncompleteJourney(format!("{what} not answered"));
        let r = &self.relationship;
        Ok(CompletedRelationship {
            relationship_type: r.relationship_type.ok_or_else(|| missing("relationship type"))?,
            relationship_to_prisoner: r
                .relationship_to_prisoner
                .clone()
                .ok_or_else(|| missing("relationship to prisoner"))?,
            is_emergency_contact: r
                .is_emergency_contact
                .ok_or_else(|| missing("emergency contact"))?
                .as_bool(),
            is_next_of_kin: r
                .is_next_of_kin
                .ok_or_else(|| missing("next of kin"))?
                .as_bool(),
            is_approved_visitor: r.is_approved_visitor.is_some_and(YesNo::as_bool),
            comments: r.comments.clone(),
        })
    }

    /// Name to show in page captions: the entered names, or the matched contact's.
    pub fn display_name(&self) -> Option<String> {
        self.names
            .as_ref()
            .map(ContactNames::formatted)
            .or_else(|| self.matched_contact.as_ref().map(ExistingContactSummary::formatted_name))
    }

    pub fn remove_phone_number(&mut self, index: usize) -> CoreResult<PhoneNumberEntry> {
        remove_at(&mut self.phone_numbers, index, "phone number")
    }

    pub fn remove_email_address(&mut self, index: usize) -> CoreResult<EmailEntry> {
        remove_at(&mut self.email_addresses, index, "email address")
    }

    pub fn remove_identity(&mut self, index: usize) -> CoreResult<IdentityEntry> {
        remove_at(&mut self.identities, index, "identity document")
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize, kind: &'static str) -> CoreResult<T> {
    if index >= items.len() {
        return Err(CoreError::IndexNotFound { kind, index });
    }
    Ok(items.remove(index))
}
