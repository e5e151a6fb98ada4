//! Request and response bodies of the contacts API.
//!
//! Field names follow the API's camelCase JSON. Optional request fields are omitted rather than
//! sent as `null`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The relationship part of a create-contact or add-relationship request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRelationship {
    pub prisoner_number: String,
    pub relationship_type_code: String,
    pub relationship_to_prisoner_code: String,
    pub is_next_of_kin: bool,
    pub is_emergency_contact: bool,
    pub is_approved_visitor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberRequest {
    pub phone_type: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddressRequest {
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRequest {
    pub identity_type: String,
    pub identity_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,
}

/// `POST /contact`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_code: Option<String>,
    pub last_name: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<ContactRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<PhoneNumberRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email_addresses: Vec<EmailAddressRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identities: Vec<IdentityRequest>,
    pub created_by: String,
}

/// `POST /prisoner-contact`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddContactRelationshipRequest {
    pub contact_id: i64,
    pub relationship: ContactRelationship,
    pub created_by: String,
}

/// `PATCH /prisoner-contact/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRelationshipRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_to_prisoner_code: Option<String>,
    pub updated_by: String,
}

/// Body of both restriction creation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestrictionRequest {
    pub restriction_type: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub id: i64,
    #[serde(default)]
    pub title_code: Option<String>,
    #[serde(default)]
    pub title_description: Option<String>,
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_names: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

impl ContactDetails {
    pub fn formatted_name(&self) -> String {
        format_name(&self.last_name, &self.first_name, self.middle_names.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrisonerContactRelationshipDetails {
    pub prisoner_contact_id: i64,
    pub contact_id: i64,
    pub prisoner_number: String,
    pub relationship_type_code: String,
    #[serde(default)]
    pub relationship_type_description: Option<String>,
    pub relationship_to_prisoner_code: String,
    #[serde(default)]
    pub relationship_to_prisoner_description: Option<String>,
    pub is_emergency_contact: bool,
    pub is_next_of_kin: bool,
    pub is_approved_visitor: bool,
    #[serde(default = "default_true")]
    pub is_relationship_active: bool,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Response of `POST /contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCreationResult {
    pub created_contact: ContactDetails,
    #[serde(default)]
    pub created_relationship: Option<PrisonerContactRelationshipDetails>,
}

/// One row of `GET /prisoner/{prisonerNumber}/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrisonerContactSummary {
    pub prisoner_contact_id: i64,
    pub contact_id: i64,
    pub prisoner_number: String,
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_names: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub relationship_type_code: String,
    pub relationship_to_prisoner_code: String,
    #[serde(default)]
    pub relationship_to_prisoner_description: Option<String>,
    pub is_emergency_contact: bool,
    pub is_next_of_kin: bool,
    pub is_approved_visitor: bool,
    #[serde(default = "default_true")]
    pub is_relationship_active: bool,
}

impl PrisonerContactSummary {
    pub fn formatted_name(&self) -> String {
        format_name(&self.last_name, &self.first_name, self.middle_names.as_deref())
    }
}

/// One row of `GET /contact/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSearchResultItem {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_names: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

impl ContactSearchResultItem {
    pub fn formatted_name(&self) -> String {
        format_name(&self.last_name, &self.first_name, self.middle_names.as_deref())
    }
}

/// Query of `GET /contact/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSearchRequest {
    pub last_name: String,
    pub first_name: Option<String>,
    pub middle_names: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl ContactSearchRequest {
    pub(crate) fn query_pairs(&self, page: &Pagination) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("lastName", self.last_name.clone())];
        if let Some(first) = &self.first_name {
            pairs.push(("firstName", first.clone()));
        }
        if let Some(middle) = &self.middle_names {
            pairs.push(("middleNames", middle.clone()));
        }
        if let Some(dob) = self.date_of_birth {
            pairs.push(("dateOfBirth", dob.format("%Y-%m-%d").to_string()));
        }
        pairs.extend(page.query_pairs());
        pairs
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Pagination {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("size", self.size.to_string())]
    }
}

/// A page of results in the API's paging envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.number + 1 >= self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrisonerContactRestrictionDetails {
    pub prisoner_contact_restriction_id: i64,
    pub restriction_type: String,
    #[serde(default)]
    pub restriction_type_description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactGlobalRestrictionDetails {
    pub contact_restriction_id: i64,
    pub restriction_type: String,
    #[serde(default)]
    pub restriction_type_description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Response of `GET /prisoner-contact/{id}/restriction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrisonerContactRestrictions {
    #[serde(default)]
    pub prisoner_contact_restrictions: Vec<PrisonerContactRestrictionDetails>,
    #[serde(default)]
    pub contact_global_restrictions: Vec<ContactGlobalRestrictionDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedPrisonerRelationship {
    pub prisoner_contact_id: i64,
    pub relationship_type_code: String,
    pub relationship_to_prisoner_code: String,
    #[serde(default)]
    pub relationship_to_prisoner_description: Option<String>,
}

/// One row of `GET /contact/{id}/linked-prisoners`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedPrisonerDetails {
    pub prisoner_number: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub relationships: Vec<LinkedPrisonerRelationship>,
}

fn default_true() -> bool {
    true
}

fn format_name(last: &str, first: &str, middle: Option<&str>) -> String {
    match middle {
        Some(middle) if !middle.is_empty() => format!("{last}, {first} {middle}"),
        _ => format!("{last}, {first}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_relationship_body_shape() {
        let request = AddContactRelationshipRequest {
            contact_id: 123,
            relationship: ContactRelationship {
                prisoner_number: "A1234BC".into(),
                relationship_type_code: "S".into(),
                relationship_to_prisoner_code: "MOT".into(),
                is_next_of_kin: true,
                is_emergency_contact: false,
                is_approved_visitor: false,
                comments: None,
            },
            created_by: "USER1".into(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contactId": 123,
                "relationship": {
                    "prisonerNumber": "A1234BC",
                    "relationshipTypeCode": "S",
                    "relationshipToPrisonerCode": "MOT",
                    "isNextOfKin": true,
                    "isEmergencyContact": false,
                    "isApprovedVisitor": false
                },
                "createdBy": "USER1"
            })
        );
    }

    #[test]
    fn test_create_contact_omits_absent_fields() {
        let request = CreateContactRequest {
            title_code: None,
            last_name: "Last".into(),
            first_name: "First".into(),
            middle_names: None,
            date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 2),
            relationship: None,
            phone_numbers: vec![],
            email_addresses: vec![],
            identities: vec![],
            created_by: "USER1".into(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "lastName": "Last",
                "firstName": "First",
                "dateOfBirth": "1980-01-02",
                "createdBy": "USER1"
            })
        );
    }

    #[test]
    fn test_page_envelope() {
        let page: Page<ContactSearchResultItem> = serde_json::from_value(json!({
            "content": [{"id": 1, "lastName": "Smith", "firstName": "Jo", "middleNames": "Ann"}],
            "totalElements": 11,
            "totalPages": 2,
            "number": 1,
            "size": 10
        }))
        .unwrap();
        assert!(page.is_last());
        assert_eq!(page.content[0].formatted_name(), "Smith, Jo Ann");
    }

    #[test]
    fn test_search_query_pairs() {
        let request = ContactSearchRequest {
            last_name: "Smith".into(),
            first_name: None,
            middle_names: None,
            date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 2),
        };
        let pairs = request.query_pairs(&Pagination::new(0, 10));
        assert_eq!(
            pairs,
            vec![
                ("lastName", "Smith".to_string()),
                ("dateOfBirth", "1980-01-02".to_string()),
                ("page", "0".to_string()),
                ("size", "10".to_string()),
            ]
        );
    }
}
