//! Enumerated answers collected by the wizards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A yes/no radio answer, posted as `YES` / `NO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Parses the posted form value. Anything other than `YES` or `NO` is treated as unanswered.
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "YES" => Some(Self::Yes),
            "NO" => Some(Self::No),
            _ => None,
        }
    }

    pub fn as_form_value(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }

    pub fn as_bool(self) -> bool {
        matches!(self, Self::Yes)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Top-level classification of a contact's relationship to a prisoner.
///
/// Serialised with the single-letter codes used by the contacts API (`S`, `O`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    #[serde(rename = "S")]
    Social,
    #[serde(rename = "O")]
    Official,
}

impl RelationshipType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::Social),
            "O" => Some(Self::Official),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Social => "S",
            Self::Official => "O",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Social => "Social",
            Self::Official => "Official",
        }
    }

    /// Reference-code group holding the relationship-to-prisoner codes for this type.
    pub fn relationship_group(self) -> crate::ReferenceCodeGroup {
        match self {
            Self::Social => crate::ReferenceCodeGroup::SocialRelationship,
            Self::Official => crate::ReferenceCodeGroup::OfficialRelationship,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReferenceCodeGroup;

    #[test]
    fn test_yes_no_form_values() {
        assert_eq!(YesNo::from_form_value("YES"), Some(YesNo::Yes));
        assert_eq!(YesNo::from_form_value("NO"), Some(YesNo::No));
        assert_eq!(YesNo::from_form_value("yes"), None);
        assert_eq!(YesNo::from_form_value(""), None);
        assert_eq!(YesNo::Yes.label(), "Yes");
        assert!(!YesNo::No.as_bool());
    }

    #[test]
    fn test_relationship_type_codes() {
        assert_eq!(RelationshipType::from_code("S"), Some(RelationshipType::Social));
        assert_eq!(RelationshipType::from_code("X"), None);
        assert_eq!(RelationshipType::Official.label(), "Official");
        assert_eq!(
            RelationshipType::Social.relationship_group(),
            ReferenceCodeGroup::SocialRelationship
        );
        assert_eq!(
            serde_json::to_string(&RelationshipType::Official).unwrap(),
            "\"O\""
        );
    }
}
