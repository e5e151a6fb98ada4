//! Validator for the enter-restriction page.

use super::date::{read_date, DateInput};
use super::{optional_text, FormValues, ValidationErrors, ValidationResult};
use crate::journey::{RestrictionAnswers, RestrictionClass};

pub const TYPE: &str = "type";
pub const START_DATE: &str = "startDate";
pub const EXPIRY_DATE: &str = "expiryDate";
pub const COMMENTS: &str = "comments";

/// Validates a new restriction of `class`.
///
/// The type and start date are required, and the type must be one of `allowed_types` when that
/// list is non-empty. An expiry date, when given, must not be before the start date. The comment
/// limit depends on the restriction class.
pub fn validate_restriction(
    form: &FormValues,
    class: RestrictionClass,
    allowed_types: &[&str],
) -> ValidationResult<RestrictionAnswers> {
    let mut errors = ValidationErrors::new();

    let restriction_type = form
        .get(TYPE)
        .filter(|code| allowed_types.is_empty() || allowed_types.contains(code))
        .map(str::to_string);
    if restriction_type.is_none() {
        errors.push(TYPE, "Select the restriction type");
    }

    let start_date = match read_date(form, START_DATE, "The start date") {
        Ok(DateInput::Date(date)) => Some(date),
        Ok(DateInput::Blank) => {
            errors.push(START_DATE, "Enter the start date for the restriction");
            None
        }
        Err(message) => {
            errors.push(START_DATE, message);
            None
        }
    };

    let expiry_date = match read_date(form, EXPIRY_DATE, "The expiry date") {
        Ok(DateInput::Date(date)) => Some(date),
        Ok(DateInput::Blank) => None,
        Err(message) => {
            errors.push(EXPIRY_DATE, message);
            None
        }
    };
    if let (Some(start), Some(expiry)) = (start_date, expiry_date) {
        if expiry < start {
            errors.push(
                EXPIRY_DATE,
                "The expiry date must be the same as or after the start date",
            );
        }
    }

    let max = class.max_comment_length();
    let comments = optional_text(
        form,
        COMMENTS,
        max,
        &format!("Comment must be {max} characters or less"),
        &mut errors,
    );

    match (restriction_type, start_date) {
        (Some(restriction_type), Some(start_date)) if errors.is_empty() => Ok(RestrictionAnswers {
            restriction_type,
            start_date,
            expiry_date,
            comments,
        }),
        _ => Err(errors),
    }
}
