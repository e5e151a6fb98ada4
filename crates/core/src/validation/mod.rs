//! Form validation.
//!
//! Every step posts an `application/x-www-form-urlencoded` body which arrives here as
//! [`FormValues`]. A validator either returns the typed answer for the journey or a
//! [`ValidationErrors`] list of `(field, message)` pairs, in the order the fields appear on the
//! page, so the error summary reads top to bottom.
//!
//! Messages are user-facing copy and are asserted verbatim by tests.

pub mod additional_info;
pub mod contact;
pub mod date;
pub mod restriction;
pub mod search;

use contacts_types::YesNo;
use serde::Serialize;
use std::collections::BTreeMap;

/// A submitted form body, keeping repeated keys and their order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(Vec<(String, String)>);

impl From<Vec<(String, String)>> for FormValues {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and by handlers that synthesise a form.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.push((name.to_string(), value.to_string()));
        self
    }

    /// Trimmed value of the first field called `name`, or `None` when absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.raw(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Untrimmed value of the first field called `name`, if it was submitted at all.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// First value per field, for handing to templates.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for (k, v) in &self.0 {
            map.entry(k.clone()).or_insert_with(|| v.clone());
        }
        map
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered list of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a single error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Adds an error unless the field already has one; the first message per field wins.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.for_field(&field).is_none() {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        for e in other.0 {
            self.push(e.field, e.message);
        }
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Field → message map for templates.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|e| (e.field.clone(), e.message.clone()))
            .collect()
    }

    /// `Ok(value)` when no errors were collected.
    pub fn into_result<T>(self, value: T) -> ValidationResult<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Requires a yes/no radio answer.
pub fn required_yes_no(form: &FormValues, field: &str, message: &str) -> ValidationResult<YesNo> {
    form.get(field)
        .and_then(YesNo::from_form_value)
        .ok_or_else(|| ValidationErrors::single(field, message))
}

/// Optional free text, trimmed, bounded by `max` characters.
pub(crate) fn optional_text(
    form: &FormValues,
    field: &str,
    max: usize,
    too_long: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = form.get(field)?;
    if value.chars().count() > max {
        errors.push(field, too_long);
    }
    Some(value.to_string())
}

/// Characters permitted in a person's name.
pub(crate) fn is_valid_name(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_alphabetic() || matches!(c, ' ' | '-' | '\'' | '’' | ',' | '.'))
}
