//! Step table for changing the type of an existing relationship.
//!
//! ```text
//! SelectType → SelectRelationship → (submit)
//! ```
//!
//! The relationship page is never skipped: a new type means a new code list, and even when the
//! type is unchanged the user confirms the code on the second page.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipTypeStep {
    SelectType,
    SelectRelationship,
}

impl RelationshipTypeStep {
    /// The following step. `None` means the journey is ready to submit.
    pub fn next(self) -> Option<RelationshipTypeStep> {
        match self {
            Self::SelectType => Some(Self::SelectRelationship),
            Self::SelectRelationship => None,
        }
    }

    /// The step the back link points at. `None` means return to the contact details page.
    pub fn previous(self) -> Option<RelationshipTypeStep> {
        match self {
            Self::SelectType => None,
            Self::SelectRelationship => Some(Self::SelectType),
        }
    }

    pub fn path_segment(self) -> &'static str {
        match self {
            Self::SelectType => "select-type",
            Self::SelectRelationship => "select-relationship",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_type_steps() {
        assert_eq!(
            RelationshipTypeStep::SelectType.next(),
            Some(RelationshipTypeStep::SelectRelationship)
        );
        assert_eq!(RelationshipTypeStep::SelectRelationship.next(), None);
        assert_eq!(RelationshipTypeStep::SelectType.previous(), None);
        assert_eq!(
            RelationshipTypeStep::SelectRelationship.previous(),
            Some(RelationshipTypeStep::SelectType)
        );
    }
}
