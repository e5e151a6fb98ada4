//! Day/month/year date inputs.
//!
//! A date input posts three fields named `{field}-day`, `{field}-month` and `{field}-year`.
//! Errors are reported against `{field}`.

use super::FormValues;
use chrono::NaiveDate;

/// Result of reading one date input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// All three parts were left empty.
    Blank,
    Date(NaiveDate),
}

/// Reads the `{field}-day/month/year` parts.
///
/// `subject` is the sentence subject used in messages, e.g. "The start date".
///
/// # Errors
///
/// Returns the user-facing message when the parts are partially filled or do not form a real date.
pub fn read_date(form: &FormValues, field: &str, subject: &str) -> Result<DateInput, String> {
    let day = form.get(&format!("{field}-day"));
    let month = form.get(&format!("{field}-month"));
    let year = form.get(&format!("{field}-year"));

    if day.is_none() && month.is_none() && year.is_none() {
        return Ok(DateInput::Blank);
    }

    let missing: Vec<&str> = [("day", day), ("month", month), ("year", year)]
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(format!("{subject} must include a {}", missing.join(" and ")));
    }

    let real_date = || format!("{subject} must be a real date");
    let parse = |v: Option<&str>| -> Option<u32> {
        let v = v?;
        if v.bytes().all(|b| b.is_ascii_digit()) {
            v.parse().ok()
        } else {
            None
        }
    };

    let (Some(d), Some(m), Some(y)) = (parse(day), parse(month), parse(year)) else {
        return Err(real_date());
    };
    if year.map(str::len) != Some(4) {
        return Err(format!("{subject} year must include 4 numbers"));
    }
    let y = i32::try_from(y).map_err(|_| real_date())?;
    NaiveDate::from_ymd_opt(y, m, d)
        .map(DateInput::Date)
        .ok_or_else(real_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(day: &str, month: &str, year: &str) -> FormValues {
        FormValues::new()
            .with("startDate-day", day)
            .with("startDate-month", month)
            .with("startDate-year", year)
    }

    #[test]
    fn test_blank_date() {
        assert_eq!(read_date(&form("", "", ""), "startDate", "The start date"), Ok(DateInput::Blank));
        assert_eq!(read_date(&FormValues::new(), "startDate", "The start date"), Ok(DateInput::Blank));
    }

    #[test]
    fn test_valid_date() {
        assert_eq!(
            read_date(&form("1", "2", "2024"), "startDate", "The start date"),
            Ok(DateInput::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()))
        );
    }

    #[test]
    fn test_partial_date_names_missing_parts() {
        assert_eq!(
            read_date(&form("", "2", "2024"), "startDate", "The start date"),
            Err("The start date must include a day".to_string())
        );
        assert_eq!(
            read_date(&form("1", "", ""), "startDate", "The start date"),
            Err("The start date must include a month and year".to_string())
        );
    }

    #[test]
    fn test_impossible_dates() {
        for (d, m, y) in [("31", "2", "2024"), ("x", "1", "2024"), ("1", "13", "2024"), ("-1", "1", "2024")] {
            assert_eq!(
                read_date(&form(d, m, y), "startDate", "The start date"),
                Err("The start date must be a real date".to_string()),
                "{d}/{m}/{y}"
            );
        }
        assert_eq!(
            read_date(&form("1", "1", "24"), "startDate", "The start date"),
            Err("The start date year must include 4 numbers".to_string())
        );
    }
}
