//! Repeating-row forms for phone numbers, email addresses and identity documents.
//!
//! Rows are posted as `prefix[index][column]`, e.g. `phones[0][phoneNumber]`. Errors use the
//! same names so each message lands on its own input. The page's submit buttons are:
//!
//! - `add` appends a blank row,
//! - `remove=<n>` drops row `n`,
//! - `save` (or any other submission) validates and stores the list.

use super::{FormValues, ValidationErrors, ValidationResult};
use crate::constants::{
    MAX_EMAIL_LENGTH, MAX_IDENTITY_VALUE_LENGTH, MAX_ISSUING_AUTHORITY_LENGTH,
    MAX_PHONE_EXTENSION_LENGTH, MAX_PHONE_NUMBER_LENGTH, PNC_IDENTITY_TYPE,
};
use crate::journey::{EmailEntry, IdentityEntry, PhoneNumberEntry};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const PHONES: &str = "phones";
pub const EMAILS: &str = "emails";
pub const IDENTITIES: &str = "identities";

pub const PHONE_COLUMNS: &[&str] = &["type", "phoneNumber", "extension"];
pub const EMAIL_COLUMNS: &[&str] = &["emailAddress"];
pub const IDENTITY_COLUMNS: &[&str] = &["identityType", "identityValue", "issuingAuthority"];

static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[\d\s()]+$").unwrap_or_else(|e| unreachable!("phone pattern: {e}"))
});

static EMAIL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| unreachable!("email pattern: {e}"))
});

static PNC_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}|\d{4})/(\d{1,7})([A-Z])$").unwrap_or_else(|e| unreachable!("pnc pattern: {e}"))
});

const PNC_CHECK_CHARACTERS: &[u8] = b"ZABCDEFGHJKLMNPQRTUVWXY";

/// One row of a repeating form: column name → trimmed value.
pub type Row = BTreeMap<String, String>;

/// The button used to submit a repeating-row page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Add,
    Remove(usize),
    Save,
}

impl ListAction {
    pub fn from_form(form: &FormValues) -> Self {
        if form.contains("add") {
            return Self::Add;
        }
        match form.get("remove").and_then(|v| v.parse().ok()) {
            Some(index) => Self::Remove(index),
            None => Self::Save,
        }
    }
}

/// Field name of one cell.
pub fn cell_name(prefix: &str, index: usize, column: &str) -> String {
    format!("{prefix}[{index}][{column}]")
}

/// Reads every `prefix[i][column]` row in index order. Gaps in the numbering are closed up.
pub fn parse_rows(form: &FormValues, prefix: &str, columns: &[&str]) -> Vec<Row> {
    let mut rows: BTreeMap<usize, Row> = BTreeMap::new();
    for (name, value) in form.pairs() {
        let Some((index, column)) = split_cell_name(name, prefix) else {
            continue;
        };
        if !columns.contains(&column) {
            continue;
        }
        rows.entry(index)
            .or_default()
            .entry(column.to_string())
            .or_insert_with(|| value.trim().to_string());
    }
    rows.into_values()
        .map(|mut row| {
            for column in columns {
                row.entry((*column).to_string()).or_default();
            }
            row
        })
        .collect()
}

fn split_cell_name<'a>(name: &'a str, prefix: &str) -> Option<(usize, &'a str)> {
    let rest = name.strip_prefix(prefix)?.strip_prefix('[')?;
    let (index, rest) = rest.split_once("][")?;
    let column = rest.strip_suffix(']')?;
    Some((index.parse().ok()?, column))
}

/// Writes rows back out as form values so an edited list can be flashed and redisplayed.
pub fn rows_to_form(prefix: &str, rows: &[Row]) -> FormValues {
    let mut pairs = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        for (column, value) in row {
            pairs.push((cell_name(prefix, index, column), value.clone()));
        }
    }
    FormValues::from(pairs)
}

/// Applies an `add` or `remove` action to the submitted rows.
///
/// # Returns
///
/// The rows to redisplay, always at least one so the page has something to fill in.
pub fn apply_list_action(mut rows: Vec<Row>, action: ListAction, columns: &[&str]) -> Vec<Row> {
    let blank = || -> Row {
        columns
            .iter()
            .map(|c| ((*c).to_string(), String::new()))
            .collect()
    };
    match action {
        ListAction::Add => rows.push(blank()),
        ListAction::Remove(index) if index < rows.len() => {
            rows.remove(index);
        }
        ListAction::Remove(_) | ListAction::Save => {}
    }
    if rows.is_empty() {
        rows.push(blank());
    }
    rows
}

fn is_blank(row: &Row) -> bool {
    row.values().all(String::is_empty)
}

fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or_default()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub fn phone_rows(entries: &[PhoneNumberEntry]) -> Vec<Row> {
    entries
        .iter()
        .map(|e| {
            Row::from([
                ("type".to_string(), e.phone_type.clone()),
                ("phoneNumber".to_string(), e.phone_number.clone()),
                ("extension".to_string(), e.extension.clone().unwrap_or_default()),
            ])
        })
        .collect()
}

pub fn email_rows(entries: &[EmailEntry]) -> Vec<Row> {
    entries
        .iter()
        .map(|e| Row::from([("emailAddress".to_string(), e.email_address.clone())]))
        .collect()
}

pub fn identity_rows(entries: &[IdentityEntry]) -> Vec<Row> {
    entries
        .iter()
        .map(|e| {
            Row::from([
                ("identityType".to_string(), e.identity_type.clone()),
                ("identityValue".to_string(), e.identity_value.clone()),
                (
                    "issuingAuthority".to_string(),
                    e.issuing_authority.clone().unwrap_or_default(),
                ),
            ])
        })
        .collect()
}

/// Validates the phone numbers page. Fully blank rows are dropped.
pub fn validate_phone_numbers(form: &FormValues) -> ValidationResult<Vec<PhoneNumberEntry>> {
    let mut errors = ValidationErrors::new();
    let mut entries = Vec::new();
    for (index, row) in parse_rows(form, PHONES, PHONE_COLUMNS).iter().enumerate() {
        if is_blank(row) {
            continue;
        }
        let name = |column: &str| cell_name(PHONES, index, column);
        let phone_type = cell(row, "type");
        let number = cell(row, "phoneNumber");
        let extension = cell(row, "extension");

        if phone_type.is_empty() {
            errors.push(name("type"), "Select the type of phone number");
        }
        if number.is_empty() {
            errors.push(name("phoneNumber"), "Enter a phone number");
        } else if number.chars().count() > MAX_PHONE_NUMBER_LENGTH {
            errors.push(
                name("phoneNumber"),
                format!("Phone number must be {MAX_PHONE_NUMBER_LENGTH} characters or less"),
            );
        } else if !PHONE_NUMBER.is_match(number) {
            errors.push(name("phoneNumber"), "Enter a phone number in the correct format");
        }
        if extension.chars().count() > MAX_PHONE_EXTENSION_LENGTH {
            errors.push(
                name("extension"),
                format!("Extension must be {MAX_PHONE_EXTENSION_LENGTH} characters or less"),
            );
        }
        entries.push(PhoneNumberEntry {
            phone_type: phone_type.to_string(),
            phone_number: number.to_string(),
            extension: non_empty(extension),
        });
    }
    errors.into_result(entries)
}

/// Validates the email addresses page. Fully blank rows are dropped.
pub fn validate_email_addresses(form: &FormValues) -> ValidationResult<Vec<EmailEntry>> {
    let mut errors = ValidationErrors::new();
    let mut entries: Vec<EmailEntry> = Vec::new();
    for (index, row) in parse_rows(form, EMAILS, EMAIL_COLUMNS).iter().enumerate() {
        if is_blank(row) {
            continue;
        }
        let field = cell_name(EMAILS, index, "emailAddress");
        let address = cell(row, "emailAddress");
        if address.chars().count() > MAX_EMAIL_LENGTH {
            errors.push(
                field,
                format!("Email address must be {MAX_EMAIL_LENGTH} characters or less"),
            );
        } else if !EMAIL_ADDRESS.is_match(address) {
            errors.push(
                field,
                "Enter an email address in the correct format, like name@example.com",
            );
        } else if entries
            .iter()
            .any(|e| e.email_address.eq_ignore_ascii_case(address))
        {
            errors.push(field, "Email addresses must be different");
        }
        entries.push(EmailEntry {
            email_address: address.to_string(),
        });
    }
    errors.into_result(entries)
}

/// Validates the identity documents page. Fully blank rows are dropped.
pub fn validate_identities(form: &FormValues) -> ValidationResult<Vec<IdentityEntry>> {
    let mut errors = ValidationErrors::new();
    let mut entries = Vec::new();
    for (index, row) in parse_rows(form, IDENTITIES, IDENTITY_COLUMNS)
        .iter()
        .enumerate()
    {
        if is_blank(row) {
            continue;
        }
        let name = |column: &str| cell_name(IDENTITIES, index, column);
        let identity_type = cell(row, "identityType");
        let value = cell(row, "identityValue");
        let authority = cell(row, "issuingAuthority");

        if identity_type.is_empty() {
            errors.push(name("identityType"), "Select the type of identity document");
        }
        if value.is_empty() {
            errors.push(name("identityValue"), "Enter the document number");
        } else if value.chars().count() > MAX_IDENTITY_VALUE_LENGTH {
            errors.push(
                name("identityValue"),
                format!("Document number must be {MAX_IDENTITY_VALUE_LENGTH} characters or less"),
            );
        } else if identity_type == PNC_IDENTITY_TYPE && !is_valid_pnc(value) {
            errors.push(name("identityValue"), "Enter a PNC number in the correct format");
        }
        if authority.chars().count() > MAX_ISSUING_AUTHORITY_LENGTH {
            errors.push(
                name("issuingAuthority"),
                format!("Issuing authority must be {MAX_ISSUING_AUTHORITY_LENGTH} characters or less"),
            );
        }
        entries.push(IdentityEntry {
            identity_type: identity_type.to_string(),
            identity_value: value.to_string(),
            issuing_authority: non_empty(authority),
        });
    }
    errors.into_result(entries)
}

/// Checks a Police National Computer number, `YY/NNNNNNNC` or `YYYY/NNNNNNNC`.
///
/// The check character is indexed by `(two-digit year * 10^7 + serial) mod 23`.
pub fn is_valid_pnc(value: &str) -> bool {
    let upper = value.to_ascii_uppercase();
    let Some(captures) = PNC_NUMBER.captures(&upper) else {
        return false;
    };
    let year = &captures[1];
    let (Ok(year), Ok(serial)) = (year[year.len() - 2..].parse::<u64>(), captures[2].parse::<u64>())
    else {
        return false;
    };
    let index = ((year * 10_000_000 + serial) % 23) as usize;
    let expected = PNC_CHECK_CHARACTERS[index];
    captures[3].as_bytes().first() == Some(&expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_action() {
        assert_eq!(ListAction::from_form(&FormValues::new().with("add", "")), ListAction::Add);
        assert_eq!(
            ListAction::from_form(&FormValues::new().with("remove", "2")),
            ListAction::Remove(2)
        );
        assert_eq!(ListAction::from_form(&FormValues::new().with("save", "")), ListAction::Save);
    }

    #[test]
    fn test_parse_rows_orders_by_index_and_fills_columns() {
        let form = FormValues::new()
            .with("emails[3][emailAddress]", "b@example.com")
            .with("emails[0][emailAddress]", " a@example.com ")
            .with("emails[0][unknown]", "x")
            .with("phones[0][type]", "MOB");
        let rows = parse_rows(&form, EMAILS, EMAIL_COLUMNS);
        assert_eq!(rows.len(), 2);
        assert_eq!(cell(&rows[0], "emailAddress"), "a@example.com");
        assert_eq!(cell(&rows[1], "emailAddress"), "b@example.com");
        assert_eq!(rows[0].len(), 1);
    }

    #[test]
    fn test_add_and_remove_rows() {
        let form = FormValues::new()
            .with("phones[0][phoneNumber]", "01234")
            .with("phones[1][phoneNumber]", "05678");
        let rows = parse_rows(&form, PHONES, PHONE_COLUMNS);

        let added = apply_list_action(rows.clone(), ListAction::Add, PHONE_COLUMNS);
        assert_eq!(added.len(), 3);
        assert!(is_blank(&added[2]));

        let removed = apply_list_action(rows, ListAction::Remove(0), PHONE_COLUMNS);
        assert_eq!(removed.len(), 1);
        assert_eq!(cell(&removed[0], "phoneNumber"), "05678");

        let reflashed = rows_to_form(PHONES, &removed);
        assert_eq!(reflashed.get("phones[0][phoneNumber]"), Some("05678"));

        let emptied = apply_list_action(removed, ListAction::Remove(0), PHONE_COLUMNS);
        assert_eq!(emptied.len(), 1);
        assert!(is_blank(&emptied[0]));
    }

    #[test]
    fn test_phone_numbers() {
        let form = FormValues::new()
            .with("phones[0][type]", "MOB")
            .with("phones[0][phoneNumber]", "+44 (0)7700 900000")
            .with("phones[0][extension]", "")
            .with("phones[1][type]", "")
            .with("phones[1][phoneNumber]", "")
            .with("phones[1][extension]", "");
        let entries = validate_phone_numbers(&form).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].extension, None);

        let bad = FormValues::new()
            .with("phones[0][phoneNumber]", "abc")
            .with("phones[0][extension]", "12345678");
        let errors = validate_phone_numbers(&bad).unwrap_err();
        assert_eq!(
            errors.for_field("phones[0][type]"),
            Some("Select the type of phone number")
        );
        assert_eq!(
            errors.for_field("phones[0][phoneNumber]"),
            Some("Enter a phone number in the correct format")
        );
        assert_eq!(
            errors.for_field("phones[0][extension]"),
            Some("Extension must be 7 characters or less")
        );
    }

    #[test]
    fn test_email_addresses() {
        let form = FormValues::new()
            .with("emails[0][emailAddress]", "name@example.com")
            .with("emails[1][emailAddress]", "NAME@example.com")
            .with("emails[2][emailAddress]", "not-an-email");
        let errors = validate_email_addresses(&form).unwrap_err();
        assert_eq!(errors.for_field("emails[0][emailAddress]"), None);
        assert_eq!(
            errors.for_field("emails[1][emailAddress]"),
            Some("Email addresses must be different")
        );
        assert_eq!(
            errors.for_field("emails[2][emailAddress]"),
            Some("Enter an email address in the correct format, like name@example.com")
        );
    }

    #[test]
    fn test_identities() {
        let form = FormValues::new()
            .with("identities[0][identityType]", "PNC")
            .with("identities[0][identityValue]", "12/1A")
            .with("identities[1][identityType]", "PASS")
            .with("identities[1][identityValue]", "")
            .with("identities[1][issuingAuthority]", &"x".repeat(41));
        let errors = validate_identities(&form).unwrap_err();
        assert_eq!(
            errors.for_field("identities[0][identityValue]"),
            Some("Enter a PNC number in the correct format")
        );
        assert_eq!(
            errors.for_field("identities[1][identityValue]"),
            Some("Enter the document number")
        );
        assert_eq!(
            errors.for_field("identities[1][issuingAuthority]"),
            Some("Issuing authority must be 40 characters or less")
        );

        let ok = FormValues::new()
            .with("identities[0][identityType]", "DL")
            .with("identities[0][identityValue]", "SMITH123")
            .with("identities[0][issuingAuthority]", "DVLA");
        let entries = validate_identities(&ok).unwrap();
        assert_eq!(entries[0].issuing_authority.as_deref(), Some("DVLA"));
    }

    #[test]
    fn test_pnc_check_character() {
        assert!(is_valid_pnc("12/1H"));
        assert!(is_valid_pnc("2012/0000001H"));
        assert!(is_valid_pnc("12/1h"));
        assert!(!is_valid_pnc("12/1A"));
        assert!(!is_valid_pnc("123/1H"));
        assert!(!is_valid_pnc("12/12345678H"));
    }

    #[test]
    fn test_entries_round_trip_to_rows() {
        let rows = identity_rows(&[IdentityEntry {
            identity_type: "PASS".into(),
            identity_value: "123".into(),
            issuing_authority: None,
        }]);
        assert_eq!(cell(&rows[0], "issuingAuthority"), "");
        let entries = validate_identities(&rows_to_form(IDENTITIES, &rows)).unwrap();
        assert_eq!(entries[0].identity_value, "123");
    }
}
