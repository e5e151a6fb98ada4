//! HTML rendering with minijinja.
//!
//! Templates are embedded at compile time and loaded into one process-wide environment on first
//! use. Every page extends `layout.html`, which renders the error summary when `page.errors` is
//! non-empty.

use crate::error::AppResult;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::NaiveDate;
use contacts_core::{FieldError, FlashedForm, ValidationErrors};
use minijinja::{context, Environment, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("macros.html", include_str!("../templates/macros.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("contact_list.html", include_str!("../templates/contact_list.html")),
    ("contact_details.html", include_str!("../templates/contact_details.html")),
    ("success.html", include_str!("../templates/success.html")),
    ("search.html", include_str!("../templates/search.html")),
    ("contact_match.html", include_str!("../templates/contact_match.html")),
    ("enter_name.html", include_str!("../templates/enter_name.html")),
    ("relationship_type.html", include_str!("../templates/relationship_type.html")),
    ("relationship_to_prisoner.html", include_str!("../templates/relationship_to_prisoner.html")),
    ("yes_no.html", include_str!("../templates/yes_no.html")),
    ("date_of_birth.html", include_str!("../templates/date_of_birth.html")),
    ("possible_existing_records.html", include_str!("../templates/possible_existing_records.html")),
    ("additional_info.html", include_str!("../templates/additional_info.html")),
    ("phone_numbers.html", include_str!("../templates/phone_numbers.html")),
    ("emails.html", include_str!("../templates/emails.html")),
    ("identities.html", include_str!("../templates/identities.html")),
    ("comments.html", include_str!("../templates/comments.html")),
    ("check_answers.html", include_str!("../templates/check_answers.html")),
    ("delete_entry.html", include_str!("../templates/delete_entry.html")),
    ("handle_duplicate.html", include_str!("../templates/handle_duplicate.html")),
    ("enter_restriction.html", include_str!("../templates/enter_restriction.html")),
    ("restriction_check_answers.html", include_str!("../templates/restriction_check_answers.html")),
];

static ENVIRONMENT: LazyLock<Environment<'static>> = LazyLock::new(build_environment);

fn build_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::error!(template = name, error = %e, "failed to load template");
        }
    }
    env.add_filter("yes_no", yes_no);
    env.add_filter("format_date", format_date);
    env
}

/// Renders `value` as `Yes`/`No`. Accepts booleans and the posted `YES`/`NO` form values.
fn yes_no(value: Value) -> String {
    match value.as_str() {
        Some("YES") => "Yes".into(),
        Some("NO") => "No".into(),
        Some(other) => other.to_string(),
        None if value.is_undefined() || value.is_none() => "Not provided".into(),
        None if value.is_true() => "Yes".into(),
        None => "No".into(),
    }
}

/// Renders an ISO date as `1 February 2024`. Anything else is passed through unchanged.
fn format_date(value: Value) -> String {
    match value.as_str() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| d.format("%-d %B %Y").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None if value.is_undefined() || value.is_none() => "Not provided".into(),
        None => value.to_string(),
    }
}

/// Values every page needs, exposed to templates as `page`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub back_url: Option<String>,
    pub caption: Option<String>,
    pub errors: Vec<FieldError>,
    pub error_map: BTreeMap<String, String>,
}

impl PageMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn back(mut self, url: impl Into<String>) -> Self {
        self.back_url = Some(url.into());
        self
    }

    pub fn caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption;
        self
    }

    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = errors.iter().cloned().collect();
        self.error_map = errors.to_map();
        self
    }

    /// Takes the errors out of a flashed submission, if there is one.
    pub fn flashed(self, flash: Option<&FlashedForm>) -> Self {
        match flash {
            Some(flash) => self.errors(&flash.errors),
            None => self,
        }
    }
}

/// Renders `name` with `page` plus the page-specific `values`.
pub fn render(name: &str, page: &PageMeta, values: Value) -> AppResult<Html<String>> {
    let template = ENVIRONMENT.get_template(name)?;
    let body = template.render(context! { page => page, ..values })?;
    Ok(Html(body))
}

/// Renders the error page, falling back to plain text if the template itself fails.
pub fn error_page(status: StatusCode, title: &str, message: &str) -> Response {
    let page = PageMeta::new(title);
    match render("error.html", &page, context! { message => message }) {
        Ok(html) => (status, html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render error page");
            (status, format!("{title}\n{message}")).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_loads() {
        for (name, _) in TEMPLATES {
            assert!(ENVIRONMENT.get_template(name).is_ok(), "{name} failed to load");
        }
    }

    #[test]
    fn test_yes_no_filter() {
        assert_eq!(yes_no(Value::from("YES")), "Yes");
        assert_eq!(yes_no(Value::from("NO")), "No");
        assert_eq!(yes_no(Value::from(true)), "Yes");
        assert_eq!(yes_no(Value::from(false)), "No");
        assert_eq!(yes_no(Value::UNDEFINED), "Not provided");
    }

    #[test]
    fn test_format_date_filter() {
        assert_eq!(format_date(Value::from("2024-02-01")), "1 February 2024");
        assert_eq!(format_date(Value::from("soon")), "soon");
        assert_eq!(format_date(Value::from(())), "Not provided");
    }

    #[test]
    fn test_error_summary_rendered() {
        let errors = ValidationErrors::single("lastName", "Enter the contact’s last name");
        let page = PageMeta::new("Name").errors(&errors);
        let html = render("error.html", &page, context! { message => "m" }).unwrap().0;
        assert!(html.contains("There is a problem"));
        assert!(html.contains("href=\"#lastName\""));
        assert!(html.contains("Enter the contact’s last name"));
    }
}
