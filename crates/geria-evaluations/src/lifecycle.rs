//! The evaluation-answer lifecycle.
//!
//! Each mutating operation is one unit of work on one aggregate: take the
//! aggregate's lock (except on create), load it with its ETag, check every
//! referenced record, score, store inline images, mutate in memory, and write
//! the whole document back with a single conditional PUT. Nothing is visible
//! until that write.

use std::collections::HashMap;
use std::sync::Arc;

use jiff::Timestamp;
use uuid::Uuid;

use geria_core::models::evaluation_answer::{
    EvaluationAnswer, EvaluationAnswerSummary, EvaluationAnswerView, EvaluationStatus, FormAnswer,
    OptionAnswer, QuestionAnswer,
};
use geria_core::models::subject::{Subject, SubjectSummary};
use geria_core::models::submission::{
    CreateEvaluationAnswerRequest, FormAnswersRequest, FormSubmission, exactly_one,
};
use geria_scoring::{ScoredForm, ScoringMode, score_form};
use geria_storage::store::ObjectStore;

use crate::collaborators::Collaborators;
use crate::error::EvaluationError;
use crate::images::store_inline_images;
use crate::locks::AggregateLocks;
use crate::repository::EvaluationAnswerRepository;

#[derive(Clone)]
pub struct EvaluationAnswerService {
    answers: EvaluationAnswerRepository,
    collaborators: Collaborators,
    locks: AggregateLocks,
}

impl EvaluationAnswerService {
    pub fn new(store: Arc<dyn ObjectStore>, collaborators: Collaborators) -> Self {
        Self {
            answers: EvaluationAnswerRepository::new(store),
            collaborators,
            locks: AggregateLocks::new(),
        }
    }

    /// Start an evaluation answer from its first form.
    pub async fn create(
        &self,
        request: CreateEvaluationAnswerRequest,
    ) -> Result<EvaluationAnswerView, EvaluationError> {
        let submission = exactly_one(request.form_answers)?;
        let subject = self.require_subject(request.subject_id).await?;
        self.require_professional(request.professional_id).await?;

        let now = Timestamp::now();
        let mut answer = EvaluationAnswer::new(
            Uuid::new_v4(),
            request.evaluation_id,
            request.subject_id,
            now,
        );

        let form_answer = self
            .score_submission(
                &submission,
                &subject,
                request.professional_id,
                ScoringMode::Full,
                now,
            )
            .await?;
        self.attach(&mut answer, vec![form_answer]).await?;
        self.answers.insert(&answer).await?;

        tracing::info!(
            evaluation_answer_id = %answer.id,
            subject_id = %answer.subject_id,
            form_id = %submission.form_id,
            "evaluation answer created"
        );
        Ok(EvaluationAnswerView {
            answer,
            subject: subject.summary(),
        })
    }

    /// Score and attach any number of forms, leaving the answer in progress.
    pub async fn add_form(
        &self,
        id: Uuid,
        request: FormAnswersRequest,
    ) -> Result<EvaluationAnswerView, EvaluationError> {
        self.submit(
            id,
            request.professional_id,
            request.form_answers,
            ScoringMode::Full,
            EvaluationStatus::InProgress,
        )
        .await
    }

    /// Save the first supplied form verbatim, unscored, and pause.
    pub async fn pause(
        &self,
        id: Uuid,
        request: FormAnswersRequest,
    ) -> Result<EvaluationAnswerView, EvaluationError> {
        let mut forms = request.form_answers;
        if forms.is_empty() {
            return Err(EvaluationError::BadRequest(
                "pause requires a form answer".to_string(),
            ));
        }
        if forms.len() > 1 {
            tracing::warn!(
                evaluation_answer_id = %id,
                ignored = forms.len() - 1,
                "pause saves only the first form answer"
            );
            forms.truncate(1);
        }
        self.submit(
            id,
            request.professional_id,
            forms,
            ScoringMode::Unscored,
            EvaluationStatus::Paused,
        )
        .await
    }

    /// Score the final form and close the evaluation answer.
    pub async fn complete(
        &self,
        id: Uuid,
        request: FormAnswersRequest,
    ) -> Result<EvaluationAnswerView, EvaluationError> {
        let submission = exactly_one(request.form_answers)?;
        self.submit(
            id,
            request.professional_id,
            vec![submission],
            ScoringMode::Full,
            EvaluationStatus::Completed,
        )
        .await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<EvaluationAnswerView, EvaluationError> {
        let answer = self.answers.load(id).await?.value;
        let subject = self.require_subject(answer.subject_id).await?;
        Ok(EvaluationAnswerView {
            answer,
            subject: subject.summary(),
        })
    }

    /// Every evaluation answer, newest first, optionally filtered by the
    /// subject's name or document.
    pub async fn find_all(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<EvaluationAnswerSummary>, EvaluationError> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut answers = self.answers.list().await?;
        sort_newest_first(&mut answers);

        let mut subjects: HashMap<Uuid, Option<SubjectSummary>> = HashMap::new();
        let mut summaries = Vec::with_capacity(answers.len());
        for answer in &answers {
            let subject = match subjects.get(&answer.subject_id) {
                Some(cached) => cached.clone(),
                None => {
                    let found = self
                        .collaborators
                        .subjects
                        .get(answer.subject_id)
                        .await?
                        .map(|s| s.summary());
                    subjects.insert(answer.subject_id, found.clone());
                    found
                }
            };
            let Some(subject) = subject else {
                tracing::warn!(
                    evaluation_answer_id = %answer.id,
                    subject_id = %answer.subject_id,
                    "skipping evaluation answer whose subject no longer exists"
                );
                continue;
            };
            if let Some(needle) = &needle
                && !matches_search(&subject, needle)
            {
                continue;
            }
            summaries.push(EvaluationAnswerSummary::new(answer, subject));
        }
        Ok(summaries)
    }

    /// Every evaluation answer of one subject, newest first.
    pub async fn find_all_by_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<EvaluationAnswerSummary>, EvaluationError> {
        let subject = self.require_subject(subject_id).await?.summary();
        let mut answers: Vec<_> = self
            .answers
            .list()
            .await?
            .into_iter()
            .filter(|a| a.subject_id == subject_id)
            .collect();
        sort_newest_first(&mut answers);
        Ok(answers
            .iter()
            .map(|a| EvaluationAnswerSummary::new(a, subject.clone()))
            .collect())
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), EvaluationError> {
        let _guard = self.locks.acquire(id).await;
        self.answers.load(id).await?;
        self.answers.delete(id).await?;
        tracing::info!(evaluation_answer_id = %id, "evaluation answer deleted");
        Ok(())
    }

    async fn submit(
        &self,
        id: Uuid,
        professional_id: Uuid,
        submissions: Vec<FormSubmission>,
        mode: ScoringMode,
        status: EvaluationStatus,
    ) -> Result<EvaluationAnswerView, EvaluationError> {
        let _guard = self.locks.acquire(id).await;
        let doc = self.answers.load(id).await?;
        let mut answer = doc.value;
        self.require_professional(professional_id).await?;
        let subject = self.require_subject(answer.subject_id).await?;

        let now = Timestamp::now();
        answer.set_status(status, now)?;

        let mut form_answers = Vec::with_capacity(submissions.len());
        for submission in &submissions {
            form_answers.push(
                self.score_submission(submission, &subject, professional_id, mode, now)
                    .await?,
            );
        }
        self.attach(&mut answer, form_answers).await?;
        self.answers.replace(&answer, &doc.etag).await?;

        tracing::info!(
            evaluation_answer_id = %answer.id,
            forms = submissions.len(),
            status = %answer.status,
            "evaluation answer updated"
        );
        Ok(EvaluationAnswerView {
            answer,
            subject: subject.summary(),
        })
    }

    /// Load the form tree and score one submission against it.
    async fn score_submission(
        &self,
        submission: &FormSubmission,
        subject: &Subject,
        professional_id: Uuid,
        mode: ScoringMode,
        now: Timestamp,
    ) -> Result<FormAnswer, EvaluationError> {
        let form = self
            .collaborators
            .forms
            .load_tree(submission.form_id)
            .await?
            .ok_or(EvaluationError::not_found("form", submission.form_id))?;
        let as_of = now.to_zoned(jiff::tz::TimeZone::system()).date();

        let scored = score_form(&form, submission, subject, as_of, mode)?;
        tracing::debug!(
            form_id = %form.id,
            total_score = scored.total_score,
            questions = scored.questions.len(),
            "form scored"
        );
        Ok(build_form_answer(&scored, professional_id, now))
    }

    /// Store inline images, then replace each form's previous answer.
    async fn attach(
        &self,
        answer: &mut EvaluationAnswer,
        mut form_answers: Vec<FormAnswer>,
    ) -> Result<(), EvaluationError> {
        store_inline_images(self.collaborators.images.as_ref(), &mut form_answers).await?;
        for form_answer in form_answers {
            answer.upsert_form_answer(form_answer);
        }
        Ok(())
    }

    async fn require_subject(&self, id: Uuid) -> Result<Subject, EvaluationError> {
        self.collaborators
            .subjects
            .get(id)
            .await?
            .ok_or(EvaluationError::not_found("subject", id))
    }

    async fn require_professional(&self, id: Uuid) -> Result<(), EvaluationError> {
        if self.collaborators.professionals.exists(id).await? {
            Ok(())
        } else {
            Err(EvaluationError::not_found("professional", id))
        }
    }
}

fn build_form_answer(scored: &ScoredForm<'_>, professional_id: Uuid, now: Timestamp) -> FormAnswer {
    let question_answers = scored
        .questions
        .iter()
        .map(|q| QuestionAnswer {
            id: Uuid::new_v4(),
            question_id: q.question.id,
            question_title: q.question.title.clone(),
            question_type: q.question.question_type,
            answer_text: q.submission.answer_text.clone(),
            answer_number: q.submission.answer_number,
            answer_boolean: q.submission.answer_boolean,
            answer_image: q.submission.answer_image.clone(),
            selected_option_id: q.submission.selected_option_id,
            score: q.score,
            option_answers: q
                .options
                .iter()
                .map(|o| OptionAnswer {
                    id: Uuid::new_v4(),
                    option_id: o.option.id,
                    description: o.option.description.clone(),
                    answer_text: o.submission.answer_text.clone(),
                    answer_number: o.submission.answer_number,
                    answer_boolean: o.submission.answer_boolean,
                    score: o.score,
                })
                .collect(),
        })
        .collect();

    FormAnswer {
        id: Uuid::new_v4(),
        form_id: scored.form.id,
        form_title: scored.form.title.clone(),
        form_type: scored.form.form_type.clone(),
        professional_id,
        total_score: scored.total_score,
        question_answers,
        created_at: now,
        updated_at: now,
    }
}

fn sort_newest_first(answers: &mut [EvaluationAnswer]) {
    answers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}

fn matches_search(subject: &SubjectSummary, needle: &str) -> bool {
    subject.name.to_lowercase().contains(needle) || subject.document.to_lowercase().contains(needle)
}
