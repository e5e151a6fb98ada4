//! Step table for the add-contact journey.
//!
//! The journey starts on the search page and then follows one of two linear sequences:
//!
//! ```text
//! Create:       Search → EnterName → RelationshipType → RelationshipToPrisoner
//!               → EmergencyContact → NextOfKin → DateOfBirth → PossibleExistingRecords*
//!               → ApprovedVisitor* → AdditionalInfo → CheckAnswers
//!
//! AddExisting:  Search → ContactMatch → RelationshipType → RelationshipToPrisoner
//!               → EmergencyContact → NextOfKin → ApprovedVisitor* → RelationshipComments
//!               → CheckAnswers
//! ```
//!
//! Steps marked `*` are skipped depending on the journey state. In the create flow the phone,
//! email, identity and comments pages hang off `AdditionalInfo` rather than sitting in the
//! sequence.
//!
//! Once the user has reached check-answers every step returns straight there. The one exception
//! is a relationship type change: the relationship-to-prisoner answer is cleared when the type
//! changes, and the table routes through the relationship page until it is answered again.

use serde::Serialize;

/// Which variant of the add-contact journey is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContactFlow {
    Create,
    AddExisting,
}

/// One page of the add-contact journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContactStep {
    Search,
    ContactMatch,
    EnterName,
    RelationshipType,
    RelationshipToPrisoner,
    EmergencyContact,
    NextOfKin,
    DateOfBirth,
    PossibleExistingRecords,
    ApprovedVisitor,
    AdditionalInfo,
    PhoneNumbers,
    EmailAddresses,
    IdentityDocuments,
    RelationshipComments,
    CheckAnswers,
}

const CREATE_SEQUENCE: &[ContactStep] = &[
    ContactStep::Search,
    ContactStep::EnterName,
    ContactStep::RelationshipType,
    ContactStep::RelationshipToPrisoner,
    ContactStep::EmergencyContact,
    ContactStep::NextOfKin,
    ContactStep::DateOfBirth,
    ContactStep::PossibleExistingRecords,
    ContactStep::ApprovedVisitor,
    ContactStep::AdditionalInfo,
    ContactStep::CheckAnswers,
];

const ADD_EXISTING_SEQUENCE: &[ContactStep] = &[
    ContactStep::Search,
    ContactStep::ContactMatch,
    ContactStep::RelationshipType,
    ContactStep::RelationshipToPrisoner,
    ContactStep::EmergencyContact,
    ContactStep::NextOfKin,
    ContactStep::ApprovedVisitor,
    ContactStep::RelationshipComments,
    ContactStep::CheckAnswers,
];

impl ContactFlow {
    /// The linear sequence of steps for this flow, starting with the search page.
    pub fn sequence(self) -> &'static [ContactStep] {
        match self {
            Self::Create => CREATE_SEQUENCE,
            Self::AddExisting => ADD_EXISTING_SEQUENCE,
        }
    }
}

/// The facts about a journey that navigation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactNavigationState {
    pub flow: ContactFlow,
    pub is_checking_answers: bool,
    pub can_approve_visitors: bool,
    pub has_unreviewed_possible_records: bool,
    pub relationship_to_prisoner_answered: bool,
}

impl ContactStep {
    /// Hub page a sub-step returns to, if the step is not part of the linear sequence.
    pub fn parent(self, flow: ContactFlow) -> Option<ContactStep> {
        match (self, flow) {
            (Self::PhoneNumbers | Self::EmailAddresses | Self::IdentityDocuments, ContactFlow::Create)
            | (Self::RelationshipComments, ContactFlow::Create) => Some(Self::AdditionalInfo),
            _ => None,
        }
    }

    /// Whether this step is reachable at all in `flow`.
    pub fn belongs_to(self, flow: ContactFlow) -> bool {
        flow.sequence().contains(&self) || self.parent(flow).is_some()
    }

    /// Whether this step is bypassed for the given state.
    pub fn is_skipped(self, state: &ContactNavigationState) -> bool {
        match self {
            Self::PossibleExistingRecords => !state.has_unreviewed_possible_records,
            Self::ApprovedVisitor => !state.can_approve_visitors,
            _ => false,
        }
    }

    /// The step to show after this one has been successfully submitted.
    pub fn next(self, state: &ContactNavigationState) -> ContactStep {
        if self.parent(state.flow).is_some() {
            return if state.is_checking_answers {
                Self::CheckAnswers
            } else {
                Self::AdditionalInfo
            };
        }

        if state.is_checking_answers {
            if self == Self::RelationshipType && !state.relationship_to_prisoner_answered {
                return Self::RelationshipToPrisoner;
            }
            return Self::CheckAnswers;
        }

        let sequence = state.flow.sequence();
        let Some(position) = sequence.iter().position(|s| *s == self) else {
            return Self::CheckAnswers;
        };
        sequence[position + 1..]
            .iter()
            .copied()
            .find(|s| !s.is_skipped(state))
            .unwrap_or(Self::CheckAnswers)
    }

    /// The step the back link points at. `None` means leave the journey.
    pub fn previous(self, state: &ContactNavigationState) -> Option<ContactStep> {
        if self == Self::Search {
            return None;
        }

        if let Some(parent) = self.parent(state.flow) {
            return Some(if state.is_checking_answers {
                Self::CheckAnswers
            } else {
                parent
            });
        }

        if state.is_checking_answers && self != Self::CheckAnswers {
            if self == Self::RelationshipToPrisoner && !state.relationship_to_prisoner_answered {
                return Some(Self::RelationshipType);
            }
            return Some(Self::CheckAnswers);
        }

        let sequence = state.flow.sequence();
        let position = sequence.iter().position(|s| *s == self)?;
        sequence[..position]
            .iter()
            .rev()
            .copied()
            .find(|s| !s.is_skipped(state))
    }

    /// URL path segment of the step under `/prisoner/{p}/contacts/add/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::ContactMatch => "match",
            Self::EnterName => "enter-name",
            Self::RelationshipType => "select-relationship-type",
            Self::RelationshipToPrisoner => "select-relationship-to-prisoner",
            Self::EmergencyContact => "emergency-contact",
            Self::NextOfKin => "next-of-kin",
            Self::DateOfBirth => "enter-dob",
            Self::PossibleExistingRecords => "possible-existing-records",
            Self::ApprovedVisitor => "approved-to-visit",
            Self::AdditionalInfo => "additional-info",
            Self::PhoneNumbers => "phone-numbers",
            Self::EmailAddresses => "emails",
            Self::IdentityDocuments => "identities",
            Self::RelationshipComments => "enter-relationship-comments",
            Self::CheckAnswers => "check-answers",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ContactStep::*;

    fn state(flow: ContactFlow) -> ContactNavigationState {
        ContactNavigationState {
            flow,
            is_checking_answers: false,
            can_approve_visitors: false,
            has_unreviewed_possible_records: false,
            relationship_to_prisoner_answered: true,
        }
    }

    fn walk(start: ContactStep, state: &ContactNavigationState) -> Vec<ContactStep> {
        let mut steps = vec![start];
        let mut current = start;
        while current != CheckAnswers {
            current = current.next(state);
            steps.push(current);
        }
        steps
    }

    #[test]
    fn test_create_flow_walks_linear_order_without_optional_steps() {
        let s = state(ContactFlow::Create);
        assert_eq!(
            walk(EnterName, &s),
            vec![
                EnterName,
                RelationshipType,
                RelationshipToPrisoner,
                EmergencyContact,
                NextOfKin,
                DateOfBirth,
                AdditionalInfo,
                CheckAnswers
            ]
        );
    }

    #[test]
    fn test_create_flow_includes_conditional_steps_when_applicable() {
        let s = ContactNavigationState {
            can_approve_visitors: true,
            has_unreviewed_possible_records: true,
            ..state(ContactFlow::Create)
        };
        assert_eq!(DateOfBirth.next(&s), PossibleExistingRecords);
        assert_eq!(PossibleExistingRecords.next(&s), ApprovedVisitor);
        assert_eq!(ApprovedVisitor.next(&s), AdditionalInfo);
    }

    #[test]
    fn test_add_existing_flow_walks_linear_order() {
        let s = ContactNavigationState {
            can_approve_visitors: true,
            ..state(ContactFlow::AddExisting)
        };
        assert_eq!(
            walk(ContactMatch, &s),
            vec![
                ContactMatch,
                RelationshipType,
                RelationshipToPrisoner,
                EmergencyContact,
                NextOfKin,
                ApprovedVisitor,
                RelationshipComments,
                CheckAnswers
            ]
        );
    }

    #[test]
    fn test_checking_answers_returns_straight_to_check_answers() {
        let s = ContactNavigationState {
            is_checking_answers: true,
            ..state(ContactFlow::Create)
        };
        for step in [EnterName, EmergencyContact, NextOfKin, DateOfBirth, PhoneNumbers, RelationshipType] {
            assert_eq!(step.next(&s), CheckAnswers, "{step:?}");
        }
    }

    #[test]
    fn test_changed_relationship_type_forces_relationship_selection() {
        let s = ContactNavigationState {
            is_checking_answers: true,
            relationship_to_prisoner_answered: false,
            ..state(ContactFlow::Create)
        };
        assert_eq!(RelationshipType.next(&s), RelationshipToPrisoner);
        assert_eq!(RelationshipToPrisoner.previous(&s), Some(RelationshipType));

        let answered = ContactNavigationState {
            relationship_to_prisoner_answered: true,
            ..s
        };
        assert_eq!(RelationshipToPrisoner.next(&answered), CheckAnswers);
    }

    #[test]
    fn test_sub_steps_return_to_hub_or_check_answers() {
        let s = state(ContactFlow::Create);
        assert_eq!(PhoneNumbers.next(&s), AdditionalInfo);
        assert_eq!(EmailAddresses.previous(&s), Some(AdditionalInfo));
        assert_eq!(RelationshipComments.next(&s), AdditionalInfo);

        let checking = ContactNavigationState {
            is_checking_answers: true,
            ..s
        };
        assert_eq!(IdentityDocuments.next(&checking), CheckAnswers);
        assert_eq!(IdentityDocuments.previous(&checking), Some(CheckAnswers));
    }

    #[test]
    fn test_back_navigation_mirrors_forward_with_skips() {
        let s = state(ContactFlow::Create);
        assert_eq!(AdditionalInfo.previous(&s), Some(DateOfBirth));
        assert_eq!(EnterName.previous(&s), Some(Search));
        assert_eq!(Search.previous(&s), None);

        let with_all = ContactNavigationState {
            can_approve_visitors: true,
            has_unreviewed_possible_records: true,
            ..s
        };
        assert_eq!(AdditionalInfo.previous(&with_all), Some(ApprovedVisitor));
        assert_eq!(ApprovedVisitor.previous(&with_all), Some(PossibleExistingRecords));

        let existing = state(ContactFlow::AddExisting);
        assert_eq!(RelationshipComments.previous(&existing), Some(NextOfKin));
        assert_eq!(RelationshipType.previous(&existing), Some(ContactMatch));
    }

    #[test]
    fn test_back_from_check_answers_is_last_linear_step() {
        let s = ContactNavigationState {
            is_checking_answers: true,
            ..state(ContactFlow::AddExisting)
        };
        assert_eq!(CheckAnswers.previous(&s), Some(RelationshipComments));
        assert_eq!(EmergencyContact.previous(&s), Some(CheckAnswers));
    }

    #[test]
    fn test_steps_belong_to_their_flows() {
        assert!(DateOfBirth.belongs_to(ContactFlow::Create));
        assert!(!DateOfBirth.belongs_to(ContactFlow::AddExisting));
        assert!(PhoneNumbers.belongs_to(ContactFlow::Create));
        assert!(!PhoneNumbers.belongs_to(ContactFlow::AddExisting));
        assert!(RelationshipComments.belongs_to(ContactFlow::AddExisting));
        assert!(!EnterName.belongs_to(ContactFlow::AddExisting));
    }
}
