use std::sync::Arc;

use uuid::Uuid;

use geria_core::models::evaluation_answer::EvaluationAnswer;
use geria_core::s3_keys;
use geria_storage::error::StorageError;
use geria_storage::state::{
    Versioned, load_all, load_state, save_state_if_absent, save_state_if_match,
};
use geria_storage::store::ObjectStore;

use crate::error::EvaluationError;

const ENTITY: &str = "evaluation answer";

/// Evaluation answers, one JSON document per aggregate.
#[derive(Clone)]
pub struct EvaluationAnswerRepository {
    store: Arc<dyn ObjectStore>,
}

impl EvaluationAnswerRepository {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, id: Uuid) -> Result<Versioned<EvaluationAnswer>, EvaluationError> {
        load_state(self.store.as_ref(), &s3_keys::evaluation_answer(id))
            .await
            .map_err(|e| match e {
                StorageError::NotFound { .. } => EvaluationError::not_found(ENTITY, id),
                other => other.into(),
            })
    }

    /// Write a new aggregate. Fails with `Conflict` if the id is taken.
    pub async fn insert(&self, answer: &EvaluationAnswer) -> Result<String, EvaluationError> {
        let key = s3_keys::evaluation_answer(answer.id);
        Ok(save_state_if_absent(self.store.as_ref(), &key, answer).await?)
    }

    /// Overwrite the aggregate read at `etag`. Fails with `Conflict` if it changed since.
    pub async fn replace(
        &self,
        answer: &EvaluationAnswer,
        etag: &str,
    ) -> Result<String, EvaluationError> {
        let key = s3_keys::evaluation_answer(answer.id);
        save_state_if_match(self.store.as_ref(), &key, answer, etag)
            .await
            .map_err(|e| match e {
                StorageError::NotFound { .. } => EvaluationError::not_found(ENTITY, answer.id),
                other => other.into(),
            })
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), EvaluationError> {
        Ok(self.store.delete(&s3_keys::evaluation_answer(id)).await?)
    }

    pub async fn list(&self) -> Result<Vec<EvaluationAnswer>, EvaluationError> {
        Ok(load_all(self.store.as_ref(), s3_keys::EVALUATION_ANSWERS_PREFIX).await?)
    }
}
