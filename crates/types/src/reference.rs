//! Reference codes published by the contacts API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group of reference codes, as named by the contacts API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceCodeGroup {
    Title,
    SocialRelationship,
    OfficialRelationship,
    PhoneType,
    IdType,
    #[serde(rename = "RESTRICTION")]
    RestrictionType,
}

impl ReferenceCodeGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::SocialRelationship => "SOCIAL_RELATIONSHIP",
            Self::OfficialRelationship => "OFFICIAL_RELATIONSHIP",
            Self::PhoneType => "PHONE_TYPE",
            Self::IdType => "ID_TYPE",
            Self::RestrictionType => "RESTRICTION",
        }
    }
}

impl fmt::Display for ReferenceCodeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One code/description pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCode {
    pub group_code: ReferenceCodeGroup,
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub display_order: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_code_deserialises_api_shape() {
        let json = r#"{"groupCode":"SOCIAL_RELATIONSHIP","code":"MOT","description":"Mother","displayOrder":3}"#;
        let code: ReferenceCode = serde_json::from_str(json).unwrap();
        assert_eq!(code.group_code, ReferenceCodeGroup::SocialRelationship);
        assert_eq!(code.code, "MOT");
        assert_eq!(code.display_order, Some(3));
        assert!(code.is_active);
    }

    #[test]
    fn test_restriction_group_uses_api_name() {
        assert_eq!(
            serde_json::to_string(&ReferenceCodeGroup::RestrictionType).unwrap(),
            "\"RESTRICTION\""
        );
        assert_eq!(ReferenceCodeGroup::IdType.as_str(), "ID_TYPE");
    }
}
