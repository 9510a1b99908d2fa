//! geria-scoring
//!
//! Form scoring. Pure computation with no I/O and no clock reads.
//! [`engine`] evaluates one structured rule against a scoring context;
//! [`orchestrator`] walks a form definition tree and scores every answered
//! question, every section, and the form itself.

pub mod context;
pub mod engine;
pub mod error;
pub mod orchestrator;

pub use context::{ContextInput, NodeScore, ScoringContext};
pub use engine::evaluate;
pub use error::ScoringError;
pub use orchestrator::{ScoredForm, ScoredOption, ScoredQuestion, ScoringMode, score_form};
