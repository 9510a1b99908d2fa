use jiff::civil::date;
use uuid::Uuid;

use geria_core::models::form::QuestionOption;
use geria_core::models::rule::{ContextField, Operand, Operation, Rule, RuleKind};
use geria_core::models::subject::{Sex, Subject};
use geria_scoring::{ContextInput, NodeScore, ScoringContext, ScoringError, evaluate};

fn subject(weight: f64) -> Subject {
    Subject {
        id: Uuid::new_v4(),
        name: "Maria".to_string(),
        document: "123.456.789-00".to_string(),
        date_of_birth: date(1950, 6, 15),
        sex: Sex::Female,
        weight: Some(weight),
        height: Some(1.60),
        bmi: None,
    }
}

fn rule(kind: RuleKind) -> Rule {
    Rule {
        id: Uuid::new_v4(),
        kind,
        operation: None,
        value1: None,
        value2: None,
        max_score: None,
        total_items: None,
        weights: Vec::new(),
        description: None,
    }
}

fn field(field: ContextField) -> Option<Operand> {
    Some(Operand::Field { field })
}

fn number(value: f64) -> Option<Operand> {
    Some(Operand::Number { value })
}

fn scores(values: &[f64]) -> Vec<NodeScore> {
    values
        .iter()
        .map(|&score| NodeScore {
            id: Uuid::new_v4(),
            score,
        })
        .collect()
}

fn weight_threshold() -> Rule {
    Rule {
        operation: Some(Operation::Gte),
        value1: field(ContextField::Weight),
        value2: number(70.0),
        max_score: Some(10.0),
        ..rule(RuleKind::ThresholdCompare)
    }
}

#[test]
fn empty_rule_list_scores_zero() {
    let s = subject(80.0);
    let question_scores = scores(&[3.0, 4.0]);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Form {
            question_scores: &question_scores,
            section_scores: &[],
        },
    );
    assert_eq!(evaluate(&[], &ctx).unwrap(), 0.0);
}

#[test]
fn threshold_on_subject_weight() {
    let heavy = subject(82.0);
    let light = subject(50.0);
    let rules = [weight_threshold()];

    let heavy_ctx = ScoringContext::new(
        &heavy,
        date(2026, 1, 1),
        ContextInput::Form {
            question_scores: &[],
            section_scores: &[],
        },
    );
    let light_ctx = ScoringContext::new(
        &light,
        date(2026, 1, 1),
        ContextInput::Form {
            question_scores: &[],
            section_scores: &[],
        },
    );

    assert_eq!(evaluate(&rules, &heavy_ctx).unwrap(), 10.0);
    assert_eq!(evaluate(&rules, &light_ctx).unwrap(), 0.0);
}

#[test]
fn evaluation_is_deterministic() {
    let s = subject(82.0);
    let question_scores = scores(&[1.0, 2.5, 4.0]);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Section {
            question_scores: &question_scores,
            answered_count: 3,
            total_count: 5,
        },
    );
    let rules = [Rule {
        total_items: Some(5),
        ..rule(RuleKind::ProrateByCompleteness)
    }];

    let first = evaluate(&rules, &ctx).unwrap();
    for _ in 0..10 {
        assert_eq!(evaluate(&rules, &ctx).unwrap(), first);
    }
}

#[test]
fn result_is_clamped_to_max_score() {
    let s = subject(70.0);
    let question_scores = scores(&[7.0, 8.0]);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Section {
            question_scores: &question_scores,
            answered_count: 2,
            total_count: 2,
        },
    );
    let rules = [Rule {
        operation: Some(Operation::Sum),
        max_score: Some(10.0),
        ..rule(RuleKind::Aggregate)
    }];

    assert_eq!(evaluate(&rules, &ctx).unwrap(), 10.0);
}

#[test]
fn negative_results_clamp_to_zero_when_capped() {
    let s = subject(70.0);
    let question_scores = scores(&[2.0, 3.0]);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Section {
            question_scores: &question_scores,
            answered_count: 2,
            total_count: 2,
        },
    );
    let rules = [Rule {
        weights: vec![-1.0, -1.0],
        max_score: Some(10.0),
        ..rule(RuleKind::WeightedSum)
    }];

    assert_eq!(evaluate(&rules, &ctx).unwrap(), 0.0);
}

#[test]
fn only_the_first_rule_applies() {
    let s = subject(82.0);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Form {
            question_scores: &[],
            section_scores: &[],
        },
    );
    let second = Rule {
        max_score: Some(99.0),
        ..weight_threshold()
    };

    assert_eq!(evaluate(&[weight_threshold(), second], &ctx).unwrap(), 10.0);
}

#[test]
fn aggregate_operations() {
    let s = subject(70.0);
    let question_scores = scores(&[2.0, 6.0, 4.0]);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Section {
            question_scores: &question_scores,
            answered_count: 3,
            total_count: 3,
        },
    );
    let with = |op| {
        [Rule {
            operation: Some(op),
            ..rule(RuleKind::Aggregate)
        }]
    };

    assert_eq!(evaluate(&with(Operation::Sum), &ctx).unwrap(), 12.0);
    assert_eq!(evaluate(&with(Operation::Average), &ctx).unwrap(), 4.0);
    assert_eq!(evaluate(&with(Operation::Max), &ctx).unwrap(), 6.0);
    assert_eq!(evaluate(&with(Operation::Min), &ctx).unwrap(), 2.0);
}

#[test]
fn aggregate_rejects_comparison_operator() {
    let s = subject(70.0);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Boolean { answer: true },
    );
    let rules = [Rule {
        operation: Some(Operation::Gt),
        ..rule(RuleKind::Aggregate)
    }];

    assert!(matches!(
        evaluate(&rules, &ctx),
        Err(ScoringError::InvalidRule { .. })
    ));
}

#[test]
fn weighted_sum_uses_positional_weights_then_fallback() {
    let s = subject(70.0);
    let options = vec![
        QuestionOption {
            id: Uuid::new_v4(),
            description: "a".to_string(),
            score: 1.0,
        },
        QuestionOption {
            id: Uuid::new_v4(),
            description: "b".to_string(),
            score: 2.0,
        },
        QuestionOption {
            id: Uuid::new_v4(),
            description: "c".to_string(),
            score: 3.0,
        },
    ];
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Options {
            selected: options.iter().collect(),
        },
    );
    let rules = [Rule {
        weights: vec![2.0, 0.5],
        value1: number(10.0),
        ..rule(RuleKind::WeightedSum)
    }];

    // 1*2 + 2*0.5 + 3*10
    assert_eq!(evaluate(&rules, &ctx).unwrap(), 33.0);
}

#[test]
fn prorate_scales_partial_completion_to_total_items() {
    let s = subject(70.0);
    let question_scores = scores(&[1.0, 1.0, 0.0, 1.0]);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Section {
            question_scores: &question_scores,
            answered_count: 4,
            total_count: 4,
        },
    );
    let rules = [Rule {
        total_items: Some(8),
        ..rule(RuleKind::ProrateByCompleteness)
    }];

    assert_eq!(evaluate(&rules, &ctx).unwrap(), 6.0);
}

#[test]
fn prorate_with_nothing_answered_is_zero() {
    let s = subject(70.0);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Section {
            question_scores: &[],
            answered_count: 0,
            total_count: 6,
        },
    );
    let rules = [rule(RuleKind::ProrateByCompleteness)];

    assert_eq!(evaluate(&rules, &ctx).unwrap(), 0.0);
}

#[test]
fn conditional_gates_total_on_subject_age() {
    let s = subject(70.0);
    let question_scores = scores(&[3.0, 2.0]);
    let rules = [Rule {
        operation: Some(Operation::Gte),
        value1: field(ContextField::Age),
        value2: number(80.0),
        ..rule(RuleKind::ConditionalOnSubjectField)
    }];
    let (s, question_scores) = (&s, &question_scores[..]);
    let on = move |as_of| {
        ScoringContext::new(
            s,
            as_of,
            ContextInput::Section {
                question_scores,
                answered_count: 2,
                total_count: 2,
            },
        )
    };

    // Turns 80 on 2030-06-15.
    assert_eq!(evaluate(&rules, &on(date(2030, 6, 14))).unwrap(), 0.0);
    assert_eq!(evaluate(&rules, &on(date(2030, 6, 15))).unwrap(), 5.0);
}

#[test]
fn conditional_requires_subject_field() {
    let s = subject(70.0);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Boolean { answer: true },
    );
    let rules = [Rule {
        operation: Some(Operation::Eq),
        value1: field(ContextField::AnswerBoolean),
        value2: Some(Operand::Boolean { value: true }),
        ..rule(RuleKind::ConditionalOnSubjectField)
    }];

    assert!(matches!(
        evaluate(&rules, &ctx),
        Err(ScoringError::InvalidRule { .. })
    ));
}

#[test]
fn sex_comparison_is_case_insensitive() {
    let s = subject(70.0);
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Boolean { answer: true },
    );
    let rules = [Rule {
        operation: Some(Operation::Eq),
        value1: field(ContextField::Sex),
        value2: Some(Operand::Text {
            value: "FEMALE".to_string(),
        }),
        max_score: Some(2.0),
        ..rule(RuleKind::ThresholdCompare)
    }];

    assert_eq!(evaluate(&rules, &ctx).unwrap(), 2.0);
}

#[test]
fn boolean_answer_threshold() {
    let s = subject(70.0);
    let rules = [Rule {
        operation: Some(Operation::Eq),
        value1: field(ContextField::AnswerBoolean),
        value2: Some(Operand::Boolean { value: true }),
        max_score: Some(3.0),
        ..rule(RuleKind::ThresholdCompare)
    }];
    let s = &s;
    let ctx = move |answer| ScoringContext::new(s, date(2026, 1, 1), ContextInput::Boolean { answer });

    assert_eq!(evaluate(&rules, &ctx(true)).unwrap(), 3.0);
    assert_eq!(evaluate(&rules, &ctx(false)).unwrap(), 0.0);
}

#[test]
fn missing_subject_value_closes_the_gate() {
    let mut s = subject(70.0);
    s.weight = None;
    let ctx = ScoringContext::new(
        &s,
        date(2026, 1, 1),
        ContextInput::Form {
            question_scores: &[],
            section_scores: &[],
        },
    );

    assert_eq!(evaluate(&[weight_threshold()], &ctx).unwrap(), 0.0);
}

#[test]
fn expression_renders_threshold_rule() {
    assert_eq!(
        weight_threshold().expression(),
        "subject.weight >= 70 ? 10 : 0"
    );
}
