use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::form::QuestionType;
use super::subject::SubjectSummary;
use crate::error::CoreError;

/// One subject undergoing one evaluation. The whole answer tree lives in
/// this aggregate and is persisted as a single document.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationAnswer {
    pub id: Uuid,
    pub evaluation_id: Uuid,
    pub subject_id: Uuid,
    pub status: EvaluationStatus,
    #[serde(default)]
    pub form_answers: Vec<FormAnswer>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum EvaluationStatus {
    InProgress,
    Paused,
    Completed,
}

impl EvaluationStatus {
    /// Validate a lifecycle transition. `Completed` is terminal.
    pub fn transition(self, to: EvaluationStatus) -> Result<EvaluationStatus, CoreError> {
        match self {
            EvaluationStatus::Completed => Err(CoreError::InvalidTransition { from: self, to }),
            EvaluationStatus::InProgress | EvaluationStatus::Paused => Ok(to),
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EvaluationStatus::InProgress => "IN_PROGRESS",
            EvaluationStatus::Paused => "PAUSED",
            EvaluationStatus::Completed => "COMPLETED",
        })
    }
}

/// The scored answer to one form. At most one per form within an
/// [`EvaluationAnswer`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormAnswer {
    pub id: Uuid,
    pub form_id: Uuid,
    pub form_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    pub professional_id: Uuid,
    pub total_score: f64,
    #[serde(default)]
    pub question_answers: Vec<QuestionAnswer>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionAnswer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub question_title: String,
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_boolean: Option<bool>,
    /// Stored image reference. Inline payloads never reach the aggregate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<Uuid>,
    pub score: f64,
    #[serde(default)]
    pub option_answers: Vec<OptionAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionAnswer {
    pub id: Uuid,
    pub option_id: Uuid,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_boolean: Option<bool>,
    /// Resolved from the option definition at answer time.
    pub score: f64,
}

impl EvaluationAnswer {
    pub fn new(
        id: Uuid,
        evaluation_id: Uuid,
        subject_id: Uuid,
        now: jiff::Timestamp,
    ) -> Self {
        Self {
            id,
            evaluation_id,
            subject_id,
            status: EvaluationStatus::InProgress,
            form_answers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn form_answer(&self, form_id: Uuid) -> Option<&FormAnswer> {
        self.form_answers.iter().find(|fa| fa.form_id == form_id)
    }

    /// Insert `answer`, or replace the existing answer for the same form.
    ///
    /// A replacement keeps the existing answer's id and creation time and
    /// swaps its whole question tree for the new one.
    pub fn upsert_form_answer(&mut self, mut answer: FormAnswer) {
        if let Some(existing) = self
            .form_answers
            .iter_mut()
            .find(|fa| fa.form_id == answer.form_id)
        {
            answer.id = existing.id;
            answer.created_at = existing.created_at;
            *existing = answer;
        } else {
            self.form_answers.push(answer);
        }
    }

    pub fn set_status(
        &mut self,
        status: EvaluationStatus,
        now: jiff::Timestamp,
    ) -> Result<(), CoreError> {
        self.status = self.status.transition(status)?;
        self.updated_at = now;
        Ok(())
    }
}

/// An evaluation answer together with the subject it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationAnswerView {
    #[serde(flatten)]
    pub answer: EvaluationAnswer,
    pub subject: SubjectSummary,
}

/// Row shown in evaluation-answer listings.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationAnswerSummary {
    pub id: Uuid,
    pub evaluation_id: Uuid,
    pub subject: SubjectSummary,
    pub status: EvaluationStatus,
    pub form_count: usize,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl EvaluationAnswerSummary {
    pub fn new(answer: &EvaluationAnswer, subject: SubjectSummary) -> Self {
        Self {
            id: answer.id,
            evaluation_id: answer.evaluation_id,
            subject,
            status: answer.status,
            form_count: answer.form_answers.len(),
            created_at: answer.created_at,
            updated_at: answer.updated_at,
        }
    }
}
