use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::rule::Rule;

/// The answerable unit: a two-level tree of question-bearing containers.
///
/// Questions hang off the form directly or through exactly one section.
/// The whole tree, rules included, is stored as one document.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Form {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category tag shared by forms that measure the same thing.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum QuestionType {
    Score,
    Select,
    Multiselect,
    Boolean,
    Text,
    Number,
    Image,
    Date,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionOption {
    pub id: Uuid,
    #[serde(default)]
    pub description: String,
    pub score: f64,
}

impl Form {
    /// All questions reachable from this form: top-level first, then each
    /// section's questions in section order.
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.questions.iter()))
    }

    pub fn find_question(&self, id: Uuid) -> Option<&Question> {
        self.all_questions().find(|q| q.id == id)
    }
}

impl Question {
    pub fn find_option(&self, id: Uuid) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == id)
    }
}
