//! Redisplaying a form after a failed submission.

use crate::validation::{FormValues, ValidationErrors};

/// The errors and raw values of a rejected submission, kept for exactly one redisplay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashedForm {
    pub errors: ValidationErrors,
    pub values: FormValues,
}

impl FlashedForm {
    pub fn new(errors: ValidationErrors, values: FormValues) -> Self {
        Self { errors, values }
    }

    /// The value the user typed into `field`, untrimmed, if it was submitted.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.raw(field)
    }
}

/// Chooses the value to pre-populate a field with.
///
/// A flashed value wins even when it is empty, so a field the user cleared stays cleared. Then
/// the journey's stored answer, then `default`.
pub fn resolve_field(flashed: Option<&str>, journey: Option<&str>, default: &str) -> String {
    flashed.or(journey).unwrap_or(default).to_string()
}

/// [`resolve_field`] reading the flashed value out of an optional [`FlashedForm`].
pub fn resolve_from(
    flash: Option<&FlashedForm>,
    field: &str,
    journey: Option<&str>,
    default: &str,
) -> String {
    resolve_field(flash.and_then(|f| f.value(field)), journey, default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(resolve_field(Some("flash"), Some("journey"), "default"), "flash");
        assert_eq!(resolve_field(None, Some("journey"), "default"), "journey");
        assert_eq!(resolve_field(None, None, "default"), "default");
    }

    #[test]
    fn test_empty_flashed_value_wins() {
        assert_eq!(resolve_field(Some(""), Some("journey"), "default"), "");
    }

    #[test]
    fn test_resolve_from_flash() {
        let flash = FlashedForm::new(
            ValidationErrors::single("lastName", "Enter the contact’s last name"),
            FormValues::new().with("lastName", "").with("firstName", "Jo"),
        );
        assert_eq!(resolve_from(Some(&flash), "lastName", Some("Smith"), ""), "");
        assert_eq!(resolve_from(Some(&flash), "firstName", None, ""), "Jo");
        assert_eq!(resolve_from(Some(&flash), "middleNames", Some("Ann"), ""), "Ann");
        assert_eq!(resolve_from(None, "lastName", Some("Smith"), ""), "Smith");
    }
}
