//! geria-evaluations
//!
//! The evaluation-answer lifecycle and the history reporter. Wraps the pure
//! scoring in `geria-scoring` in resumable units of work persisted through
//! `geria-storage`, and reads subjects, professionals, form definitions and
//! images through the interfaces in [`collaborators`].

pub mod collaborators;
pub mod error;
pub mod history;
pub mod images;
pub mod lifecycle;
pub mod locks;
pub mod repository;

pub use collaborators::{Collaborators, DocumentStore};
pub use error::EvaluationError;
pub use history::HistoryReporter;
pub use lifecycle::EvaluationAnswerService;
