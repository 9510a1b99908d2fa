use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A structured scoring formula attachable to a question, section, or form.
///
/// The structured fields are what gets evaluated. [`Rule::expression`] only
/// renders them for audit display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rule {
    pub id: Uuid,
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value1: Option<Operand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Operand>,
    /// Upper bound of the result. When set, results are clamped to `[0, max_score]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    /// Denominator for prorating partially completed sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u32>,
    /// Positional weights for `weighted_sum`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weights: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RuleKind {
    /// Compare `value1` (default: context total) against `value2`; yield
    /// `max_score` when the comparison holds, else 0.
    ThresholdCompare,
    /// Gate the context total on a comparison over a subject field.
    ConditionalOnSubjectField,
    /// Combine the context's score list with an aggregation operation.
    Aggregate,
    /// Positionally weighted sum of the context's score list.
    WeightedSum,
    /// Scale the context total up to the full item count.
    ProrateByCompleteness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Operation {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "sum")]
    Sum,
    #[serde(rename = "average")]
    Average,
    #[serde(rename = "max")]
    Max,
    #[serde(rename = "min")]
    Min,
}

impl Operation {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operation::Gt
                | Operation::Gte
                | Operation::Lt
                | Operation::Lte
                | Operation::Eq
                | Operation::Ne
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Gt => ">",
            Operation::Gte => ">=",
            Operation::Lt => "<",
            Operation::Lte => "<=",
            Operation::Eq => "==",
            Operation::Ne => "!=",
            Operation::Sum => "sum",
            Operation::Average => "average",
            Operation::Max => "max",
            Operation::Min => "min",
        }
    }
}

/// A rule operand: either a typed constant or a reference to a context field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum Operand {
    Number { value: f64 },
    Text { value: String },
    Boolean { value: bool },
    Field { field: ContextField },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ContextField {
    Age,
    Weight,
    Height,
    Bmi,
    Sex,
    /// Sum of the context's score list.
    Total,
    AnsweredCount,
    TotalCount,
    SelectedCount,
    AnswerBoolean,
}

impl ContextField {
    pub fn is_subject_field(&self) -> bool {
        matches!(
            self,
            ContextField::Age
                | ContextField::Weight
                | ContextField::Height
                | ContextField::Bmi
                | ContextField::Sex
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContextField::Age => "subject.age",
            ContextField::Weight => "subject.weight",
            ContextField::Height => "subject.height",
            ContextField::Bmi => "subject.bmi",
            ContextField::Sex => "subject.sex",
            ContextField::Total => "total",
            ContextField::AnsweredCount => "answered_count",
            ContextField::TotalCount => "total_count",
            ContextField::SelectedCount => "selected_count",
            ContextField::AnswerBoolean => "answer",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number { value } => write!(f, "{value}"),
            Operand::Text { value } => write!(f, "\"{value}\""),
            Operand::Boolean { value } => write!(f, "{value}"),
            Operand::Field { field } => f.write_str(field.name()),
        }
    }
}

impl Rule {
    /// Human-readable rendering of the rule for audit display.
    pub fn expression(&self) -> String {
        let max = self
            .max_score
            .map(|m| m.to_string())
            .unwrap_or_else(|| "1".to_string());
        let operand = |o: &Option<Operand>, default: &str| {
            o.as_ref()
                .map(|o| o.to_string())
                .unwrap_or_else(|| default.to_string())
        };
        let op = self.operation.map(|o| o.symbol()).unwrap_or("?");

        let body = match self.kind {
            RuleKind::ThresholdCompare => format!(
                "{} {op} {} ? {max} : 0",
                operand(&self.value1, "total"),
                operand(&self.value2, "?"),
            ),
            RuleKind::ConditionalOnSubjectField => format!(
                "{} {op} {} ? total : 0",
                operand(&self.value1, "?"),
                operand(&self.value2, "?"),
            ),
            RuleKind::Aggregate => {
                let op = self.operation.unwrap_or(Operation::Sum).symbol();
                format!("{op}(scores)")
            }
            RuleKind::WeightedSum => {
                if self.weights.is_empty() {
                    format!("sum(scores) * {}", operand(&self.value1, "1"))
                } else {
                    let weights: Vec<String> = self.weights.iter().map(|w| w.to_string()).collect();
                    format!("weighted_sum(scores, [{}])", weights.join(", "))
                }
            }
            RuleKind::ProrateByCompleteness => {
                let items = self
                    .total_items
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "total_count".to_string());
                format!("total / answered_count * {items}")
            }
        };

        match self.max_score {
            Some(max) if self.kind != RuleKind::ThresholdCompare => {
                format!("clamp({body}, 0, {max})")
            }
            _ => body,
        }
    }
}
