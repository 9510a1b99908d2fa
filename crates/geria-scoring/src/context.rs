use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use geria_core::models::form::QuestionOption;
use geria_core::models::rule::{ContextField, Operand};
use geria_core::models::subject::Subject;

/// A computed score for one node (question or section) of a form tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NodeScore {
    pub id: Uuid,
    pub score: f64,
}

/// Everything a rule may read when it is evaluated.
///
/// `as_of` is the reference date for age computations; callers supply it so
/// that evaluation never reads the clock.
#[derive(Debug, Clone)]
pub struct ScoringContext<'a> {
    pub subject: &'a Subject,
    pub as_of: jiff::civil::Date,
    pub input: ContextInput<'a>,
}

/// The level-specific part of a scoring context.
#[derive(Debug, Clone)]
pub enum ContextInput<'a> {
    /// SELECT / MULTISELECT questions.
    Options { selected: Vec<&'a QuestionOption> },
    /// BOOLEAN questions.
    Boolean { answer: bool },
    Section {
        question_scores: &'a [NodeScore],
        answered_count: usize,
        total_count: usize,
    },
    Form {
        question_scores: &'a [NodeScore],
        section_scores: &'a [NodeScore],
    },
}

/// A resolved operand value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value<'a> {
    Number(f64),
    Text(&'a str),
    Bool(bool),
    Missing,
}

impl<'a> ScoringContext<'a> {
    pub fn new(subject: &'a Subject, as_of: jiff::civil::Date, input: ContextInput<'a>) -> Self {
        Self {
            subject,
            as_of,
            input,
        }
    }

    /// The score list rules aggregate over.
    pub fn scores(&self) -> Vec<f64> {
        match &self.input {
            ContextInput::Options { selected } => selected.iter().map(|o| o.score).collect(),
            ContextInput::Boolean { answer } => vec![if *answer { 1.0 } else { 0.0 }],
            ContextInput::Section {
                question_scores, ..
            } => question_scores.iter().map(|s| s.score).collect(),
            ContextInput::Form {
                question_scores,
                section_scores,
            } => question_scores
                .iter()
                .chain(section_scores.iter())
                .map(|s| s.score)
                .collect(),
        }
    }

    pub fn total(&self) -> f64 {
        self.scores().iter().sum()
    }

    pub fn answered_count(&self) -> usize {
        match &self.input {
            ContextInput::Options { selected } => selected.len(),
            ContextInput::Boolean { .. } => 1,
            ContextInput::Section { answered_count, .. } => *answered_count,
            ContextInput::Form {
                question_scores,
                section_scores,
            } => question_scores.len() + section_scores.len(),
        }
    }

    pub fn total_count(&self) -> usize {
        match &self.input {
            ContextInput::Section { total_count, .. } => *total_count,
            _ => self.answered_count(),
        }
    }

    pub(crate) fn resolve<'r>(&self, operand: &'r Operand) -> Value<'r> {
        match operand {
            Operand::Number { value } => Value::Number(*value),
            Operand::Text { value } => Value::Text(value),
            Operand::Boolean { value } => Value::Bool(*value),
            Operand::Field { field } => self.field(*field),
        }
    }

    fn field(&self, field: ContextField) -> Value<'static> {
        let number = |v: Option<f64>| v.map(Value::Number).unwrap_or(Value::Missing);
        match field {
            ContextField::Age => Value::Number(f64::from(self.subject.age_on(self.as_of))),
            ContextField::Weight => number(self.subject.weight),
            ContextField::Height => number(self.subject.height),
            ContextField::Bmi => number(self.subject.bmi()),
            ContextField::Sex => Value::Text(self.subject.sex.as_str()),
            ContextField::Total => Value::Number(self.total()),
            ContextField::AnsweredCount => Value::Number(self.answered_count() as f64),
            ContextField::TotalCount => Value::Number(self.total_count() as f64),
            ContextField::SelectedCount => match &self.input {
                ContextInput::Options { selected } => Value::Number(selected.len() as f64),
                _ => Value::Missing,
            },
            ContextField::AnswerBoolean => match &self.input {
                ContextInput::Boolean { answer } => Value::Bool(*answer),
                _ => Value::Missing,
            },
        }
    }
}
