use crate::templates;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use contacts_api_client::ApiError;
use contacts_core::CoreError;
use thiserror::Error;

/// Failure of a request handler. Every variant renders as an HTML page or a redirect.
#[derive(Debug, Error)]
pub enum AppError {
    /// The URL names something that does not exist, usually after manual URL entry.
    #[error("not found: {0}")]
    NotFound(String),
    /// The journey id is unknown to this session; the user is sent back to the start of the flow.
    #[error("no {flow} journey {journey_id}")]
    MissingJourney {
        flow: &'static str,
        journey_id: String,
        restart_url: String,
    },
    #[error("no access token on request")]
    Unauthorised,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MissingJourney {
                flow,
                journey_id,
                restart_url,
            } => {
                tracing::warn!(flow, %journey_id, "journey not found in session, restarting flow");
                Redirect::to(&restart_url).into_response()
            }
            AppError::NotFound(what) => not_found(&what),
            AppError::Core(CoreError::IndexNotFound { kind, index }) => {
                not_found(&format!("{kind} {index}"))
            }
            AppError::Core(CoreError::Text(e)) => not_found(&e.to_string()),
            AppError::Api(ApiError::NotFound { path }) => not_found(&path),
            AppError::Unauthorised => templates::error_page(
                StatusCode::UNAUTHORIZED,
                "You are not signed in",
                "Sign in to manage contacts.",
            ),
            other => {
                tracing::error!(error = %other, "request failed");
                templates::error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Sorry, there is a problem with the service",
                    "Try again later.",
                )
            }
        }
    }
}

fn not_found(what: &str) -> Response {
    tracing::warn!(what, "not found, likely manual URL entry");
    templates::error_page(
        StatusCode::NOT_FOUND,
        "Page not found",
        "If you typed the web address, check it is correct.",
    )
}
