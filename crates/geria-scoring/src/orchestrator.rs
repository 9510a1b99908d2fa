//! Scores one form submission against its form definition tree.

use std::collections::HashSet;

use uuid::Uuid;

use geria_core::models::form::{Form, Question, QuestionOption, QuestionType};
use geria_core::models::subject::Subject;
use geria_core::models::submission::{FormSubmission, OptionSubmission, QuestionSubmission};

use crate::context::{ContextInput, NodeScore, ScoringContext};
use crate::engine::evaluate;
use crate::error::ScoringError;

/// Whether rules run, or every score is forced to 0 (saving progress verbatim).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    Full,
    Unscored,
}

/// The result of scoring one submission, borrowing from the form and the submission.
#[derive(Debug, Clone)]
pub struct ScoredForm<'a> {
    pub form: &'a Form,
    pub total_score: f64,
    pub section_scores: Vec<NodeScore>,
    /// Answered questions in form-tree order.
    pub questions: Vec<ScoredQuestion<'a>>,
}

#[derive(Debug, Clone)]
pub struct ScoredQuestion<'a> {
    pub question: &'a Question,
    pub submission: &'a QuestionSubmission,
    pub score: f64,
    pub options: Vec<ScoredOption<'a>>,
}

/// A submitted option answer resolved against its option definition.
#[derive(Debug, Clone)]
pub struct ScoredOption<'a> {
    pub option: &'a QuestionOption,
    pub submission: &'a OptionSubmission,
    /// The option's authoritative score, or 0 when unscored. Caller-supplied
    /// scores are never used.
    pub score: f64,
}

/// Score `submission` against `form`.
///
/// Submitted answers whose question is not in the form tree are skipped.
/// Questions without a submitted answer are not scored. Option ids must
/// belong to their question in either mode.
pub fn score_form<'a>(
    form: &'a Form,
    submission: &'a FormSubmission,
    subject: &Subject,
    as_of: jiff::civil::Date,
    mode: ScoringMode,
) -> Result<ScoredForm<'a>, ScoringError> {
    if submission.form_id != form.id {
        return Err(ScoringError::FormMismatch {
            expected: form.id,
            actual: submission.form_id,
        });
    }

    let mut questions = Vec::new();
    let mut matched = HashSet::new();
    for question in form.all_questions() {
        let Some(answer) = submission
            .question_answers
            .iter()
            .find(|qa| qa.question_id == question.id)
        else {
            continue;
        };
        if !matched.insert(question.id) {
            continue;
        }

        let options = resolve_options(question, answer, mode)?;
        let score = match mode {
            ScoringMode::Full => score_question(question, answer, &options, subject, as_of)?,
            ScoringMode::Unscored => 0.0,
        };
        questions.push(ScoredQuestion {
            question,
            submission: answer,
            score,
            options,
        });
    }

    let skipped = submission
        .question_answers
        .iter()
        .filter(|qa| !matched.contains(&qa.question_id))
        .count();
    if skipped > 0 {
        tracing::debug!(
            form_id = %form.id,
            skipped,
            "skipping answers for questions outside the form tree"
        );
    }

    let mut section_scores = Vec::with_capacity(form.sections.len());
    for section in &form.sections {
        let question_scores = node_scores(&questions, &section.questions);
        let score = match mode {
            ScoringMode::Full => {
                let ctx = ScoringContext::new(
                    subject,
                    as_of,
                    ContextInput::Section {
                        question_scores: &question_scores,
                        answered_count: question_scores.len(),
                        total_count: section.questions.len(),
                    },
                );
                // A section without a rule scores 0; it does not sum its questions.
                evaluate(section.rule.as_slice(), &ctx)?
            }
            ScoringMode::Unscored => 0.0,
        };
        section_scores.push(NodeScore {
            id: section.id,
            score,
        });
    }

    let top_level = node_scores(&questions, &form.questions);
    let total_score = match (mode, &form.rule) {
        (ScoringMode::Unscored, _) => 0.0,
        (ScoringMode::Full, Some(rule)) => {
            let ctx = ScoringContext::new(
                subject,
                as_of,
                ContextInput::Form {
                    question_scores: &top_level,
                    section_scores: &section_scores,
                },
            );
            evaluate(std::slice::from_ref(rule), &ctx)?
        }
        (ScoringMode::Full, None) => {
            section_scores.iter().map(|s| s.score).sum::<f64>()
                + top_level.iter().map(|s| s.score).sum::<f64>()
        }
    };

    Ok(ScoredForm {
        form,
        total_score,
        section_scores,
        questions,
    })
}

/// Scores of the answered questions among `members`, in form-tree order.
fn node_scores(scored: &[ScoredQuestion<'_>], members: &[Question]) -> Vec<NodeScore> {
    scored
        .iter()
        .filter(|q| members.iter().any(|m| m.id == q.question.id))
        .map(|q| NodeScore {
            id: q.question.id,
            score: q.score,
        })
        .collect()
}

/// The selected option set, in form order. Each option appears once, paired
/// with its first submitted answer. Unknown option ids are rejected.
fn resolve_options<'a>(
    question: &'a Question,
    answer: &'a QuestionSubmission,
    mode: ScoringMode,
) -> Result<Vec<ScoredOption<'a>>, ScoringError> {
    for submission in &answer.option_answers {
        find_option(question, submission.option_id)?;
    }
    if let Some(id) = answer.selected_option_id {
        find_option(question, id)?;
    }

    Ok(question
        .options
        .iter()
        .filter_map(|option| {
            answer
                .option_answers
                .iter()
                .find(|s| s.option_id == option.id)
                .map(|submission| ScoredOption {
                    option,
                    submission,
                    score: match mode {
                        ScoringMode::Full => option.score,
                        ScoringMode::Unscored => 0.0,
                    },
                })
        })
        .collect())
}

fn find_option(question: &Question, option_id: Uuid) -> Result<&QuestionOption, ScoringError> {
    question
        .find_option(option_id)
        .ok_or(ScoringError::UnknownOption {
            question_id: question.id,
            option_id,
        })
}

fn score_question(
    question: &Question,
    answer: &QuestionSubmission,
    options: &[ScoredOption<'_>],
    subject: &Subject,
    as_of: jiff::civil::Date,
) -> Result<f64, ScoringError> {
    let raw = answer.score.unwrap_or(0.0);

    match question.question_type {
        QuestionType::Score => Ok(raw),
        QuestionType::Select => {
            let selected = match answer.selected_option_id {
                Some(id) => Some(find_option(question, id)?),
                None => options.first().map(|o| o.option),
            };
            match (&question.rule, selected) {
                (Some(rule), _) => {
                    let ctx = ScoringContext::new(
                        subject,
                        as_of,
                        ContextInput::Options {
                            selected: selected.into_iter().collect(),
                        },
                    );
                    evaluate(std::slice::from_ref(rule), &ctx)
                }
                (None, Some(option)) => Ok(option.score),
                (None, None) => Ok(0.0),
            }
        }
        QuestionType::Multiselect => {
            let mut selected: Vec<&QuestionOption> = options.iter().map(|o| o.option).collect();
            if selected.is_empty()
                && let Some(id) = answer.selected_option_id
            {
                selected.push(find_option(question, id)?);
            }
            match &question.rule {
                Some(rule) => {
                    let ctx =
                        ScoringContext::new(subject, as_of, ContextInput::Options { selected });
                    evaluate(std::slice::from_ref(rule), &ctx)
                }
                None => Ok(selected.iter().map(|o| o.score).sum()),
            }
        }
        QuestionType::Boolean => match &question.rule {
            Some(rule) => {
                let ctx = ScoringContext::new(
                    subject,
                    as_of,
                    ContextInput::Boolean {
                        answer: answer.answer_boolean.unwrap_or(false),
                    },
                );
                evaluate(std::slice::from_ref(rule), &ctx)
            }
            None => Ok(raw),
        },
        QuestionType::Text | QuestionType::Number | QuestionType::Image | QuestionType::Date => {
            Ok(raw)
        }
    }
}
