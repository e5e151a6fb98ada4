use contacts_types::TextError;
use contacts_uuid::UuidError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid text: {0}")]
    Text(#[from] TextError),
    #[error("invalid identifier: {0}")]
    Identifier(#[from] UuidError),
    #[error("no {flow} journey with id {journey_id} in session")]
    JourneyNotFound {
        flow: &'static str,
        journey_id: String,
    },
    #[error("no {kind} at index {index}")]
    IndexNotFound { kind: &'static str, index: usize },
    #[error("journey is not ready to submit: {0}")]
    IncompleteJourney(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
