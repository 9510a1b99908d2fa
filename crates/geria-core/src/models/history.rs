use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::evaluation_answer::EvaluationStatus;

/// Chronological scores of one form for one subject.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormScoreHistory {
    pub form_id: Uuid,
    pub form_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    pub entries: Vec<ScoreHistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreHistoryEntry {
    pub evaluation_answer_id: Uuid,
    pub date: jiff::Timestamp,
    pub total_score: f64,
    pub status: EvaluationStatus,
}

/// A subject's latest score on a form next to the average of everyone else.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeerComparison {
    pub form_id: Uuid,
    /// `None` when the subject has no completed answer to the form.
    pub my_score: Option<f64>,
    /// 0 when there are no participants.
    pub average_score: f64,
    pub participant_count: usize,
}
