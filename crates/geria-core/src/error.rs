use thiserror::Error;

use crate::models::evaluation_answer::EvaluationStatus;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: EvaluationStatus,
        to: EvaluationStatus,
    },

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("expected exactly one form answer, got {0}")]
    TooManySubmissions(usize),
}
