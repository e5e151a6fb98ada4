use thiserror::Error;

/// Failure talking to the contacts API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API url: {0}")]
    Url(String),
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} not found")]
    NotFound { path: String },
    #[error("{path} conflicts with an existing record")]
    Conflict { path: String },
    #[error("{path} returned {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
