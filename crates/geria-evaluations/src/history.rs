//! Read-side reshaping of completed scores into time series and peer averages.
//!
//! Only `COMPLETED` evaluation answers are considered. The pure functions take
//! the aggregates as loaded; [`HistoryReporter`] loads them.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use geria_core::models::evaluation_answer::{EvaluationAnswer, EvaluationStatus, FormAnswer};
use geria_core::models::form::Form;
use geria_core::models::history::{FormScoreHistory, PeerComparison, ScoreHistoryEntry};
use geria_storage::store::ObjectStore;

use crate::collaborators::Collaborators;
use crate::error::EvaluationError;
use crate::repository::EvaluationAnswerRepository;

/// Per form the subject completed, the chronological list of its scores.
///
/// Forms are ordered by their first completed answer.
pub fn score_history(answers: &[EvaluationAnswer], subject_id: Uuid) -> Vec<FormScoreHistory> {
    collect_history(answers, subject_id, |_| true)
}

/// [`score_history`] restricted to forms sharing `form`'s type tag.
///
/// A form without a type tag only matches itself.
pub fn score_history_by_form_type(
    answers: &[EvaluationAnswer],
    subject_id: Uuid,
    form: &Form,
) -> Vec<FormScoreHistory> {
    collect_history(answers, subject_id, |fa| {
        fa.form_id == form.id
            || (form.form_type.is_some() && fa.form_type.as_deref() == form.form_type.as_deref())
    })
}

fn collect_history(
    answers: &[EvaluationAnswer],
    subject_id: Uuid,
    include: impl Fn(&FormAnswer) -> bool,
) -> Vec<FormScoreHistory> {
    let mut histories: Vec<FormScoreHistory> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for (answer, form_answer) in completed(answers) {
        if answer.subject_id != subject_id || !include(form_answer) {
            continue;
        }
        let slot = *index.entry(form_answer.form_id).or_insert_with(|| {
            histories.push(FormScoreHistory {
                form_id: form_answer.form_id,
                form_title: form_answer.form_title.clone(),
                form_type: form_answer.form_type.clone(),
                entries: Vec::new(),
            });
            histories.len() - 1
        });
        let history = &mut histories[slot];
        history.entries.push(ScoreHistoryEntry {
            evaluation_answer_id: answer.id,
            date: form_answer.updated_at,
            total_score: form_answer.total_score,
            status: answer.status,
        });
    }

    for history in &mut histories {
        history.entries.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.evaluation_answer_id.cmp(&b.evaluation_answer_id))
        });
        // Title and type follow the most recent snapshot.
        if let Some(latest) = history.entries.last()
            && let Some(fa) = answers
                .iter()
                .find(|a| a.id == latest.evaluation_answer_id)
                .and_then(|a| a.form_answer(history.form_id))
        {
            history.form_title = fa.form_title.clone();
            history.form_type = fa.form_type.clone();
        }
    }
    histories.sort_by(|a, b| {
        let first = |h: &FormScoreHistory| h.entries.first().map(|e| e.date);
        first(a).cmp(&first(b)).then(a.form_id.cmp(&b.form_id))
    });
    histories
}

/// The subject's latest completed score on `form_id` next to the average of
/// every other subject's latest completed score on it.
pub fn compare_with_peers(
    answers: &[EvaluationAnswer],
    form_id: Uuid,
    subject_id: Uuid,
) -> PeerComparison {
    // Latest completed form answer per subject.
    let mut latest: HashMap<Uuid, &FormAnswer> = HashMap::new();
    for (answer, form_answer) in completed(answers) {
        if form_answer.form_id != form_id {
            continue;
        }
        latest
            .entry(answer.subject_id)
            .and_modify(|current| {
                if form_answer.updated_at > current.updated_at {
                    *current = form_answer;
                }
            })
            .or_insert(form_answer);
    }

    let my_score = latest.get(&subject_id).map(|fa| fa.total_score);
    let peers: Vec<f64> = latest
        .iter()
        .filter(|(id, _)| **id != subject_id)
        .map(|(_, fa)| fa.total_score)
        .collect();
    let average_score = if peers.is_empty() {
        0.0
    } else {
        peers.iter().sum::<f64>() / peers.len() as f64
    };

    PeerComparison {
        form_id,
        my_score,
        average_score,
        participant_count: peers.len(),
    }
}

fn completed(answers: &[EvaluationAnswer]) -> impl Iterator<Item = (&EvaluationAnswer, &FormAnswer)> {
    answers
        .iter()
        .filter(|a| a.status == EvaluationStatus::Completed)
        .flat_map(|a| a.form_answers.iter().map(move |fa| (a, fa)))
}

/// Loads evaluation answers and forms for the history queries.
#[derive(Clone)]
pub struct HistoryReporter {
    answers: EvaluationAnswerRepository,
    collaborators: Collaborators,
}

impl HistoryReporter {
    pub fn new(store: Arc<dyn ObjectStore>, collaborators: Collaborators) -> Self {
        Self {
            answers: EvaluationAnswerRepository::new(store),
            collaborators,
        }
    }

    pub async fn score_history(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<FormScoreHistory>, EvaluationError> {
        let answers = self.answers.list().await?;
        Ok(score_history(&answers, subject_id))
    }

    pub async fn score_history_by_form_type(
        &self,
        subject_id: Uuid,
        form_id: Uuid,
    ) -> Result<Vec<FormScoreHistory>, EvaluationError> {
        let form = self.require_form(form_id).await?;
        let answers = self.answers.list().await?;
        Ok(score_history_by_form_type(&answers, subject_id, &form))
    }

    pub async fn compare_with_peers(
        &self,
        form_id: Uuid,
        subject_id: Uuid,
    ) -> Result<PeerComparison, EvaluationError> {
        self.require_form(form_id).await?;
        if self.collaborators.subjects.get(subject_id).await?.is_none() {
            return Err(EvaluationError::not_found("subject", subject_id));
        }
        let answers = self.answers.list().await?;
        let comparison = compare_with_peers(&answers, form_id, subject_id);
        tracing::debug!(
            %form_id,
            %subject_id,
            participants = comparison.participant_count,
            "peer comparison computed"
        );
        Ok(comparison)
    }

    async fn require_form(&self, form_id: Uuid) -> Result<Form, EvaluationError> {
        self.collaborators
            .forms
            .load_tree(form_id)
            .await?
            .ok_or(EvaluationError::not_found("form", form_id))
    }
}
