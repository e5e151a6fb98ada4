//! Step table for the add-restriction journey.
//!
//! ```text
//! EnterRestriction → CheckAnswers → (submit)
//! ```

/// One page of the add-restriction journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionStep {
    EnterRestriction,
    CheckAnswers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictionNavigationState {
    pub is_checking_answers: bool,
}

impl RestrictionStep {
    pub fn next(self, _state: &RestrictionNavigationState) -> RestrictionStep {
        Self::CheckAnswers
    }

    /// The step the back link points at. `None` means return to the contact details page.
    pub fn previous(self, state: &RestrictionNavigationState) -> Option<RestrictionStep> {
        match self {
            Self::EnterRestriction if state.is_checking_answers => Some(Self::CheckAnswers),
            Self::EnterRestriction => None,
            Self::CheckAnswers => Some(Self::EnterRestriction),
        }
    }

    pub fn path_segment(self) -> &'static str {
        match self {
            Self::EnterRestriction => "enter-restriction",
            Self::CheckAnswers => "check-answers",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restriction_steps() {
        let fresh = RestrictionNavigationState {
            is_checking_answers: false,
        };
        let checking = RestrictionNavigationState {
            is_checking_answers: true,
        };

        assert_eq!(
            RestrictionStep::EnterRestriction.next(&fresh),
            RestrictionStep::CheckAnswers
        );
        assert_eq!(RestrictionStep::EnterRestriction.previous(&fresh), None);
        assert_eq!(
            RestrictionStep::EnterRestriction.previous(&checking),
            Some(RestrictionStep::CheckAnswers)
        );
        assert_eq!(
            RestrictionStep::CheckAnswers.previous(&checking),
            Some(RestrictionStep::EnterRestriction)
        );
    }
}
