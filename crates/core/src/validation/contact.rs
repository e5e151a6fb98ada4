//! Validators for the add-contact and change-relationship-type steps.

use super::date::{read_date, DateInput};
use super::{
    is_valid_name, optional_text, required_yes_no, FormValues, ValidationErrors, ValidationResult,
};
use crate::constants::{MAX_NAME_LENGTH, MAX_RELATIONSHIP_COMMENTS_LENGTH};
use crate::journey::{ContactNames, DateOfBirthAnswer};
use chrono::NaiveDate;
use contacts_types::{RelationshipType, YesNo};

pub const TITLE: &str = "title";
pub const LAST_NAME: &str = "lastName";
pub const FIRST_NAME: &str = "firstName";
pub const MIDDLE_NAMES: &str = "middleNames";
pub const RELATIONSHIP_TYPE: &str = "relationshipType";
pub const RELATIONSHIP: &str = "relationship";
pub const IS_EMERGENCY_CONTACT: &str = "isEmergencyContact";
pub const IS_NEXT_OF_KIN: &str = "isNextOfKin";
pub const IS_APPROVED_VISITOR: &str = "isApprovedVisitor";
pub const IS_DOB_KNOWN: &str = "isKnown";
pub const DOB: &str = "dob";
pub const COMMENTS: &str = "comments";
pub const IS_CONTACT_MATCHED: &str = "isContactMatched";
pub const DUPLICATE_ACTION: &str = "duplicateAction";

/// Answer to "is this the right contact?" on the search match page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMatchAnswer {
    Yes,
    NoSearchAgain,
    NoCreateNew,
}

impl ContactMatchAnswer {
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "YES" => Some(Self::Yes),
            "NO_SEARCH_AGAIN" => Some(Self::NoSearchAgain),
            "NO_CREATE_NEW" => Some(Self::NoCreateNew),
            _ => None,
        }
    }

    pub fn as_form_value(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::NoSearchAgain => "NO_SEARCH_AGAIN",
            Self::NoCreateNew => "NO_CREATE_NEW",
        }
    }
}

/// What to do after the backend reported the relationship already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateAction {
    GoToDuplicate,
    GoToContactList,
}

impl DuplicateAction {
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "GO_TO_DUPLICATE" => Some(Self::GoToDuplicate),
            "GO_TO_CONTACT_LIST" => Some(Self::GoToContactList),
            _ => None,
        }
    }
}

fn name_field(
    form: &FormValues,
    field: &str,
    label: &str,
    required: bool,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let Some(value) = form.get(field) else {
        if required {
            errors.push(field, format!("Enter the contact’s {label}"));
        }
        return None;
    };
    if value.chars().count() > MAX_NAME_LENGTH {
        errors.push(
            field,
            format!("Contact’s {label} must be {MAX_NAME_LENGTH} characters or less"),
        );
    } else if !is_valid_name(value) {
        errors.push(field, format!("Contact’s {label} must not contain special characters"));
    }
    Some(value.to_string())
}

/// Validates the enter-name page.
///
/// Last and first names are required. Middle names and title are optional.
pub fn validate_names(form: &FormValues) -> ValidationResult<ContactNames> {
    let mut errors = ValidationErrors::new();
    let title = form.get(TITLE).map(str::to_string);
    let last_name = name_field(form, LAST_NAME, "last name", true, &mut errors);
    let first_name = name_field(form, FIRST_NAME, "first name", true, &mut errors);
    let middle_names = name_field(form, MIDDLE_NAMES, "middle names", false, &mut errors);

    match (last_name, first_name) {
        (Some(last_name), Some(first_name)) if errors.is_empty() => Ok(ContactNames {
            title,
            last_name,
            first_name,
            middle_names,
        }),
        _ => Err(errors),
    }
}

pub fn validate_relationship_type(form: &FormValues) -> ValidationResult<RelationshipType> {
    form.get(RELATIONSHIP_TYPE)
        .and_then(RelationshipType::from_code)
        .ok_or_else(|| {
            ValidationErrors::single(
                RELATIONSHIP_TYPE,
                "Select whether the contact is a social or official contact",
            )
        })
}

/// Validates the relationship-to-prisoner page against the codes valid for the chosen type.
///
/// An empty `allowed` list accepts any non-blank code.
pub fn validate_relationship_to_prisoner(
    form: &FormValues,
    allowed: &[&str],
) -> ValidationResult<String> {
    form.get(RELATIONSHIP)
        .filter(|code| allowed.is_empty() || allowed.contains(code))
        .map(str::to_string)
        .ok_or_else(|| {
            ValidationErrors::single(RELATIONSHIP, "Select the contact’s relationship to the prisoner")
        })
}

pub fn validate_emergency_contact(form: &FormValues) -> ValidationResult<YesNo> {
    required_yes_no(
        form,
        IS_EMERGENCY_CONTACT,
        "Select whether the contact is an emergency contact for the prisoner",
    )
}

pub fn validate_next_of_kin(form: &FormValues) -> ValidationResult<YesNo> {
    required_yes_no(
        form,
        IS_NEXT_OF_KIN,
        "Select whether the contact is next of kin for the prisoner",
    )
}

pub fn validate_approved_visitor(form: &FormValues) -> ValidationResult<YesNo> {
    required_yes_no(
        form,
        IS_APPROVED_VISITOR,
        "Select whether the contact is approved to visit the prisoner",
    )
}

/// Validates the date-of-birth page.
///
/// # Arguments
///
/// * `form` - Submitted `isKnown` radio plus `dob-day/month/year`.
/// * `today` - The current date; a known date of birth must be before it.
pub fn validate_date_of_birth(
    form: &FormValues,
    today: NaiveDate,
) -> ValidationResult<DateOfBirthAnswer> {
    let known = required_yes_no(
        form,
        IS_DOB_KNOWN,
        "Select whether the contact’s date of birth is known",
    )?;
    if known == YesNo::No {
        return Ok(DateOfBirthAnswer::Unknown);
    }
    match read_date(form, DOB, "The contact’s date of birth") {
        Ok(DateInput::Blank) => Err(ValidationErrors::single(
            DOB,
            "Enter the contact’s date of birth",
        )),
        Ok(DateInput::Date(date)) if date >= today => Err(ValidationErrors::single(
            DOB,
            "The contact’s date of birth must be in the past",
        )),
        Ok(DateInput::Date(date)) => Ok(DateOfBirthAnswer::Known(date)),
        Err(message) => Err(ValidationErrors::single(DOB, message)),
    }
}

/// Optional relationship comments.
pub fn validate_comments(form: &FormValues) -> ValidationResult<Option<String>> {
    let mut errors = ValidationErrors::new();
    let comments = optional_text(
        form,
        COMMENTS,
        MAX_RELATIONSHIP_COMMENTS_LENGTH,
        "Comments must be 240 characters or less",
        &mut errors,
    );
    errors.into_result(comments)
}

pub fn validate_contact_match(form: &FormValues) -> ValidationResult<ContactMatchAnswer> {
    form.get(IS_CONTACT_MATCHED)
        .and_then(ContactMatchAnswer::from_form_value)
        .ok_or_else(|| {
            ValidationErrors::single(IS_CONTACT_MATCHED, "Select whether this is the right contact")
        })
}

/// The possible-existing-record match page only offers yes or no.
pub fn validate_possible_record_match(form: &FormValues) -> ValidationResult<YesNo> {
    required_yes_no(
        form,
        IS_CONTACT_MATCHED,
        "Select whether this is the right contact",
    )
}

pub fn validate_duplicate_action(form: &FormValues) -> ValidationResult<DuplicateAction> {
    form.get(DUPLICATE_ACTION)
        .and_then(DuplicateAction::from_form_value)
        .ok_or_else(|| {
            ValidationErrors::single(DUPLICATE_ACTION, "Select what you want to do next")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_required_in_page_order() {
        let errors = validate_names(&FormValues::new()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec![LAST_NAME, FIRST_NAME]);
        assert_eq!(errors.for_field(LAST_NAME), Some("Enter the contact’s last name"));
        assert_eq!(errors.for_field(FIRST_NAME), Some("Enter the contact’s first name"));
    }

    #[test]
    fn test_names_length_and_characters() {
        let long = "a".repeat(36);
        let form = FormValues::new()
            .with(LAST_NAME, &long)
            .with(FIRST_NAME, "J0")
            .with(MIDDLE_NAMES, "Ann");
        let errors = validate_names(&form).unwrap_err();
        assert_eq!(
            errors.for_field(LAST_NAME),
            Some("Contact’s last name must be 35 characters or less")
        );
        assert_eq!(
            errors.for_field(FIRST_NAME),
            Some("Contact’s first name must not contain special characters")
        );
        assert_eq!(errors.for_field(MIDDLE_NAMES), None);
    }

    #[test]
    fn test_names_valid() {
        let form = FormValues::new()
            .with(TITLE, "MR")
            .with(LAST_NAME, " Last ")
            .with(FIRST_NAME, "First")
            .with(MIDDLE_NAMES, "");
        let names = validate_names(&form).unwrap();
        assert_eq!(names.title.as_deref(), Some("MR"));
        assert_eq!(names.last_name, "Last");
        assert_eq!(names.middle_names, None);
    }

    #[test]
    fn test_next_of_kin_required_message() {
        let errors = validate_next_of_kin(&FormValues::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.for_field("isNextOfKin"),
            Some("Select whether the contact is next of kin for the prisoner")
        );
    }

    #[test]
    fn test_relationship_type_and_code() {
        assert_eq!(
            validate_relationship_type(&FormValues::new().with(RELATIONSHIP_TYPE, "O")),
            Ok(RelationshipType::Official)
        );
        assert_eq!(
            validate_relationship_type(&FormValues::new().with(RELATIONSHIP_TYPE, "X"))
                .unwrap_err()
                .for_field(RELATIONSHIP_TYPE),
            Some("Select whether the contact is a social or official contact")
        );

        let form = FormValues::new().with(RELATIONSHIP, "MOT");
        assert_eq!(
            validate_relationship_to_prisoner(&form, &["MOT", "FA"]),
            Ok("MOT".to_string())
        );
        assert_eq!(
            validate_relationship_to_prisoner(&form, &["DR"])
                .unwrap_err()
                .for_field(RELATIONSHIP),
            Some("Select the contact’s relationship to the prisoner")
        );
    }

    #[test]
    fn test_date_of_birth() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let unknown = FormValues::new().with(IS_DOB_KNOWN, "NO").with("dob-day", "99");
        assert_eq!(
            validate_date_of_birth(&unknown, today),
            Ok(DateOfBirthAnswer::Unknown)
        );

        let known = |d: &str, m: &str, y: &str| {
            FormValues::new()
                .with(IS_DOB_KNOWN, "YES")
                .with("dob-day", d)
                .with("dob-month", m)
                .with("dob-year", y)
        };
        assert_eq!(
            validate_date_of_birth(&known("15", "6", "1980"), today),
            Ok(DateOfBirthAnswer::Known(NaiveDate::from_ymd_opt(1980, 6, 15).unwrap()))
        );
        assert_eq!(
            validate_date_of_birth(&known("", "", ""), today)
                .unwrap_err()
                .for_field(DOB),
            Some("Enter the contact’s date of birth")
        );
        assert_eq!(
            validate_date_of_birth(&known("1", "6", "2024"), today)
                .unwrap_err()
                .for_field(DOB),
            Some("The contact’s date of birth must be in the past")
        );
        assert_eq!(
            validate_date_of_birth(&known("30", "2", "1980"), today)
                .unwrap_err()
                .for_field(DOB),
            Some("The contact’s date of birth must be a real date")
        );
        assert_eq!(
            validate_date_of_birth(&FormValues::new(), today)
                .unwrap_err()
                .for_field(IS_DOB_KNOWN),
            Some("Select whether the contact’s date of birth is known")
        );
    }

    #[test]
    fn test_comments_limit() {
        assert_eq!(validate_comments(&FormValues::new()), Ok(None));
        let form = FormValues::new().with(COMMENTS, &"x".repeat(241));
        assert_eq!(
            validate_comments(&form).unwrap_err().for_field(COMMENTS),
            Some("Comments must be 240 characters or less")
        );
    }

    #[test]
    fn test_match_and_duplicate_answers() {
        assert_eq!(
            validate_contact_match(&FormValues::new().with(IS_CONTACT_MATCHED, "NO_CREATE_NEW")),
            Ok(ContactMatchAnswer::NoCreateNew)
        );
        assert!(validate_contact_match(&FormValues::new()).is_err());
        assert!(validate_possible_record_match(
            &FormValues::new().with(IS_CONTACT_MATCHED, "NO_SEARCH_AGAIN")
        )
        .is_err());
        assert_eq!(
            validate_duplicate_action(&FormValues::new())
                .unwrap_err()
                .for_field(DUPLICATE_ACTION),
            Some("Select what you want to do next")
        );
        assert_eq!(
            validate_duplicate_action(
                &FormValues::new().with(DUPLICATE_ACTION, "GO_TO_DUPLICATE")
            ),
            Ok(DuplicateAction::GoToDuplicate)
        );
    }
}
