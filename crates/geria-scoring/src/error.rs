use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid rule {rule_id}: {reason}")]
    InvalidRule { rule_id: Uuid, reason: String },

    #[error("option {option_id} not found on question {question_id}")]
    UnknownOption { question_id: Uuid, option_id: Uuid },

    #[error("submission for form {actual} cannot be scored against form {expected}")]
    FormMismatch { expected: Uuid, actual: Uuid },
}
