//! The rule engine.
//!
//! Evaluates a structured [`Rule`] against a [`ScoringContext`]. Identical
//! inputs always produce identical scores.

use geria_core::models::rule::{Operand, Operation, Rule, RuleKind};

use crate::context::{ScoringContext, Value};
use crate::error::ScoringError;

const EPSILON: f64 = 1e-9;

/// Evaluate `rules` against `ctx`.
///
/// An empty rule list scores 0; whether 0 is the right fallback is the
/// caller's decision. Only the first rule is applied; the rest are accepted
/// but not chained.
pub fn evaluate(rules: &[Rule], ctx: &ScoringContext<'_>) -> Result<f64, ScoringError> {
    let Some(rule) = rules.first() else {
        return Ok(0.0);
    };
    if rules.len() > 1 {
        tracing::debug!(
            rule_id = %rule.id,
            ignored = rules.len() - 1,
            "multiple rules attached, applying the first"
        );
    }

    let raw = match rule.kind {
        RuleKind::ThresholdCompare => threshold_compare(rule, ctx)?,
        RuleKind::ConditionalOnSubjectField => conditional_on_subject_field(rule, ctx)?,
        RuleKind::Aggregate => aggregate(rule, ctx)?,
        RuleKind::WeightedSum => weighted_sum(rule, ctx),
        RuleKind::ProrateByCompleteness => prorate(rule, ctx),
    };

    Ok(clamp(raw, rule.max_score))
}

fn clamp(raw: f64, max_score: Option<f64>) -> f64 {
    match max_score {
        Some(max) => raw.min(max).max(0.0),
        None => raw,
    }
}

fn invalid(rule: &Rule, reason: impl Into<String>) -> ScoringError {
    ScoringError::InvalidRule {
        rule_id: rule.id,
        reason: reason.into(),
    }
}

fn comparison(rule: &Rule) -> Result<Operation, ScoringError> {
    match rule.operation {
        Some(op) if op.is_comparison() => Ok(op),
        Some(op) => Err(invalid(
            rule,
            format!("'{}' is not a comparison operator", op.symbol()),
        )),
        None => Err(invalid(rule, "missing comparison operator")),
    }
}

fn required<'r>(
    rule: &Rule,
    operand: &'r Option<Operand>,
    name: &str,
) -> Result<&'r Operand, ScoringError> {
    operand
        .as_ref()
        .ok_or_else(|| invalid(rule, format!("missing {name}")))
}

fn threshold_compare(rule: &Rule, ctx: &ScoringContext<'_>) -> Result<f64, ScoringError> {
    let op = comparison(rule)?;
    let lhs = match &rule.value1 {
        Some(operand) => ctx.resolve(operand),
        None => Value::Number(ctx.total()),
    };
    let rhs = ctx.resolve(required(rule, &rule.value2, "value2")?);

    if compare(&lhs, op, &rhs) {
        Ok(rule.max_score.unwrap_or(1.0))
    } else {
        Ok(0.0)
    }
}

fn conditional_on_subject_field(
    rule: &Rule,
    ctx: &ScoringContext<'_>,
) -> Result<f64, ScoringError> {
    let op = comparison(rule)?;
    let value1 = required(rule, &rule.value1, "value1")?;
    if !matches!(value1, Operand::Field { field } if field.is_subject_field()) {
        return Err(invalid(rule, "value1 must reference a subject field"));
    }
    let lhs = ctx.resolve(value1);
    let rhs = ctx.resolve(required(rule, &rule.value2, "value2")?);

    if compare(&lhs, op, &rhs) {
        Ok(ctx.total())
    } else {
        Ok(0.0)
    }
}

fn aggregate(rule: &Rule, ctx: &ScoringContext<'_>) -> Result<f64, ScoringError> {
    let scores = ctx.scores();
    let result = match rule.operation.unwrap_or(Operation::Sum) {
        Operation::Sum => scores.iter().sum(),
        Operation::Average if scores.is_empty() => 0.0,
        Operation::Average => scores.iter().sum::<f64>() / scores.len() as f64,
        Operation::Max => scores.iter().copied().reduce(f64::max).unwrap_or(0.0),
        Operation::Min => scores.iter().copied().reduce(f64::min).unwrap_or(0.0),
        op => {
            return Err(invalid(
                rule,
                format!("'{}' is not an aggregation operator", op.symbol()),
            ));
        }
    };
    Ok(result)
}

fn weighted_sum(rule: &Rule, ctx: &ScoringContext<'_>) -> f64 {
    let fallback = match rule.value1.as_ref().map(|o| ctx.resolve(o)) {
        Some(Value::Number(w)) => w,
        _ => 1.0,
    };
    ctx.scores()
        .iter()
        .enumerate()
        .map(|(i, score)| score * rule.weights.get(i).copied().unwrap_or(fallback))
        .sum()
}

fn prorate(rule: &Rule, ctx: &ScoringContext<'_>) -> f64 {
    let answered = ctx.answered_count();
    if answered == 0 {
        return 0.0;
    }
    let total_items = rule
        .total_items
        .map(f64::from)
        .unwrap_or(ctx.total_count() as f64);
    ctx.total() / answered as f64 * total_items
}

/// Apply a comparison. Missing values and mismatched types never match.
fn compare(lhs: &Value<'_>, op: Operation, rhs: &Value<'_>) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(*a, op, *b),
        (Value::Bool(a), Value::Number(b)) => compare_numbers(f64::from(u8::from(*a)), op, *b),
        (Value::Number(a), Value::Bool(b)) => compare_numbers(*a, op, f64::from(u8::from(*b))),
        (Value::Bool(a), Value::Bool(b)) => match op {
            Operation::Eq => a == b,
            Operation::Ne => a != b,
            _ => false,
        },
        (Value::Text(a), Value::Text(b)) => match op {
            Operation::Eq => a.eq_ignore_ascii_case(b),
            Operation::Ne => !a.eq_ignore_ascii_case(b),
            _ => false,
        },
        _ => false,
    }
}

fn compare_numbers(a: f64, op: Operation, b: f64) -> bool {
    match op {
        Operation::Gt => a > b,
        Operation::Gte => a > b || (a - b).abs() < EPSILON,
        Operation::Lt => a < b,
        Operation::Lte => a < b || (a - b).abs() < EPSILON,
        Operation::Eq => (a - b).abs() < EPSILON,
        Operation::Ne => (a - b).abs() >= EPSILON,
        _ => false,
    }
}
