use thiserror::Error;
use uuid::Uuid;

use geria_core::error::CoreError;
use geria_scoring::ScoringError;
use geria_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(StorageError),

    #[error(transparent)]
    Scoring(ScoringError),
}

impl EvaluationError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<StorageError> for EvaluationError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::PreconditionFailed { key } => {
                EvaluationError::Conflict(format!("{key} was modified concurrently"))
            }
            other => EvaluationError::Storage(other),
        }
    }
}

impl From<ScoringError> for EvaluationError {
    fn from(e: ScoringError) -> Self {
        match e {
            ScoringError::UnknownOption { option_id, .. } => {
                EvaluationError::not_found("option", option_id)
            }
            ScoringError::FormMismatch { .. } => EvaluationError::BadRequest(e.to_string()),
            other => EvaluationError::Scoring(other),
        }
    }
}

impl From<CoreError> for EvaluationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidTransition { .. } => EvaluationError::Conflict(e.to_string()),
            CoreError::MissingField(_) | CoreError::TooManySubmissions(_) => {
                EvaluationError::BadRequest(e.to_string())
            }
        }
    }
}
