//! Validator for the contact search form.

use super::{is_valid_name, FormValues, ValidationErrors, ValidationResult};
use crate::constants::MAX_NAME_LENGTH;
use serde::{Deserialize, Serialize};

pub const LAST_NAME: &str = "lastName";
pub const FIRST_NAME: &str = "firstName";
pub const MIDDLE_NAMES: &str = "middleNames";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSearchCriteria {
    pub last_name: String,
    pub first_name: Option<String>,
    pub middle_names: Option<String>,
}

/// Validates search criteria read from the query string.
pub fn validate_search(form: &FormValues) -> ValidationResult<ContactSearchCriteria> {
    let mut errors = ValidationErrors::new();
    let mut check = |field: &str, label: &str| -> Option<String> {
        let value = form.get(field)?;
        if value.chars().count() > MAX_NAME_LENGTH {
            errors.push(
                field,
                format!("Contact’s {label} must be {MAX_NAME_LENGTH} characters or less"),
            );
        } else if !is_valid_name(value) {
            errors.push(field, format!("Contact’s {label} must not contain special characters"));
        }
        Some(value.to_string())
    };

    let last_name = check(LAST_NAME, "last name");
    let first_name = check(FIRST_NAME, "first name");
    let middle_names = check(MIDDLE_NAMES, "middle names");
    if last_name.is_none() {
        errors.push(LAST_NAME, "Enter the contact’s last name");
    }

    match last_name {
        Some(last_name) if errors.is_empty() => Ok(ContactSearchCriteria {
            last_name,
            first_name,
            middle_names,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_name_required() {
        let errors = validate_search(&FormValues::new().with(FIRST_NAME, "Jo")).unwrap_err();
        assert_eq!(errors.for_field(LAST_NAME), Some("Enter the contact’s last name"));
    }

    #[test]
    fn test_valid_search() {
        let criteria = validate_search(&FormValues::new().with(LAST_NAME, "Smith")).unwrap();
        assert_eq!(
            criteria,
            ContactSearchCriteria {
                last_name: "Smith".into(),
                first_name: None,
                middle_names: None,
            }
        );
    }

    #[test]
    fn test_special_characters_rejected() {
        let form = FormValues::new()
            .with(LAST_NAME, "Smith")
            .with(MIDDLE_NAMES, "%");
        assert_eq!(
            validate_search(&form).unwrap_err().for_field(MIDDLE_NAMES),
            Some("Contact’s middle names must not contain special characters")
        );
    }
}
