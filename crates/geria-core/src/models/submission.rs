use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// One form's worth of answers as submitted by an evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormSubmission {
    pub form_id: Uuid,
    #[serde(default)]
    pub question_answers: Vec<QuestionSubmission>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionSubmission {
    pub question_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_boolean: Option<bool>,
    /// Either an inline `data:` URL or a reference to an already stored image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<Uuid>,
    /// Raw score for SCORE questions and rule-less BOOLEAN questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub option_answers: Vec<OptionSubmission>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionSubmission {
    pub option_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_boolean: Option<bool>,
}

/// Prefix marking an `answer_image` as an inline payload rather than a stored reference.
pub const INLINE_IMAGE_PREFIX: &str = "data:";

impl QuestionSubmission {
    pub fn has_inline_image(&self) -> bool {
        self.answer_image
            .as_deref()
            .is_some_and(|img| img.starts_with(INLINE_IMAGE_PREFIX))
    }
}

/// Take the single submission out of `submissions`, failing unless there is exactly one.
pub fn exactly_one(submissions: Vec<FormSubmission>) -> Result<FormSubmission, CoreError> {
    let count = submissions.len();
    let mut iter = submissions.into_iter();
    match (iter.next(), count) {
        (Some(first), 1) => Ok(first),
        (None, _) => Err(CoreError::MissingField("form_answers".to_string())),
        _ => Err(CoreError::TooManySubmissions(count)),
    }
}

/// Body of a create call. `form_answers` must hold exactly one submission.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateEvaluationAnswerRequest {
    pub evaluation_id: Uuid,
    pub subject_id: Uuid,
    pub professional_id: Uuid,
    #[serde(default)]
    pub form_answers: Vec<FormSubmission>,
}

/// Body of the add-form, pause and complete calls.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormAnswersRequest {
    pub professional_id: Uuid,
    #[serde(default)]
    pub form_answers: Vec<FormSubmission>,
}
