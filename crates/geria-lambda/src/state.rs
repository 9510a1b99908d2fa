use std::sync::Arc;

use geria_evaluations::{Collaborators, EvaluationAnswerService, HistoryReporter};
use geria_storage::store::ObjectStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub evaluation_answers: EvaluationAnswerService,
    pub history: HistoryReporter,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        let collaborators = Collaborators::from_store(store.clone());
        Self {
            evaluation_answers: EvaluationAnswerService::new(store.clone(), collaborators.clone()),
            history: HistoryReporter::new(store, collaborators),
        }
    }
}
