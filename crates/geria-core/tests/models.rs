use jiff::civil::date;
use jiff::Timestamp;
use uuid::Uuid;

use geria_core::error::CoreError;
use geria_core::models::evaluation_answer::{EvaluationAnswer, EvaluationStatus, FormAnswer};
use geria_core::models::form::{Form, Question, QuestionType, Section};
use geria_core::models::rule::{Operation, Rule, RuleKind};
use geria_core::models::subject::{Sex, Subject};
use geria_core::models::submission::{FormSubmission, QuestionSubmission, exactly_one};

fn subject() -> Subject {
    Subject {
        id: Uuid::new_v4(),
        name: "Maria".to_string(),
        document: "000".to_string(),
        date_of_birth: date(1940, 2, 29),
        sex: Sex::Female,
        weight: Some(64.0),
        height: Some(1.60),
        bmi: None,
    }
}

fn form_answer(form_id: Uuid, score: f64, at: Timestamp) -> FormAnswer {
    FormAnswer {
        id: Uuid::new_v4(),
        form_id,
        form_title: "f".to_string(),
        form_type: None,
        professional_id: Uuid::new_v4(),
        total_score: score,
        question_answers: Vec::new(),
        created_at: at,
        updated_at: at,
    }
}

fn question() -> Question {
    Question {
        id: Uuid::new_v4(),
        title: "q".to_string(),
        question_type: QuestionType::Score,
        options: vec![],
        rule: None,
    }
}

#[test]
fn age_counts_completed_years() {
    let s = subject();
    assert_eq!(s.age_on(date(2026, 2, 28)), 85);
    assert_eq!(s.age_on(date(2026, 3, 1)), 86);
}

#[test]
fn bmi_prefers_stored_value() {
    let mut s = subject();
    assert_eq!(s.bmi(), Some(64.0 / (1.60 * 1.60)));
    s.bmi = Some(24.0);
    assert_eq!(s.bmi(), Some(24.0));
    s.bmi = None;
    s.height = Some(0.0);
    assert_eq!(s.bmi(), None);
}

#[test]
fn upsert_replaces_answer_for_same_form() {
    let t0 = Timestamp::from_second(1_700_000_000).unwrap();
    let t1 = Timestamp::from_second(1_700_000_600).unwrap();
    let form_id = Uuid::new_v4();
    let mut answer = EvaluationAnswer::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), t0);

    let first = form_answer(form_id, 3.0, t0);
    let first_id = first.id;
    answer.upsert_form_answer(first);
    answer.upsert_form_answer(form_answer(form_id, 7.0, t1));
    answer.upsert_form_answer(form_answer(Uuid::new_v4(), 1.0, t1));

    assert_eq!(answer.form_answers.len(), 2);
    let replaced = answer.form_answer(form_id).unwrap();
    assert_eq!(replaced.id, first_id);
    assert_eq!(replaced.created_at, t0);
    assert_eq!(replaced.updated_at, t1);
    assert_eq!(replaced.total_score, 7.0);
}

#[test]
fn completed_is_terminal() {
    let now = Timestamp::from_second(1_700_000_000).unwrap();
    let mut answer = EvaluationAnswer::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), now);
    assert_eq!(answer.status, EvaluationStatus::InProgress);

    answer.set_status(EvaluationStatus::Paused, now).unwrap();
    answer.set_status(EvaluationStatus::InProgress, now).unwrap();
    answer.set_status(EvaluationStatus::Completed, now).unwrap();

    let err = answer
        .set_status(EvaluationStatus::InProgress, now)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidTransition {
            from: EvaluationStatus::Completed,
            to: EvaluationStatus::InProgress
        }
    ));
    assert_eq!(answer.status, EvaluationStatus::Completed);
}

#[test]
fn all_questions_lists_top_level_then_sections() {
    let (top, a, b) = (question(), question(), question());
    let ids = vec![top.id, a.id, b.id];
    let form = Form {
        id: Uuid::new_v4(),
        title: "f".to_string(),
        description: None,
        form_type: None,
        questions: vec![top],
        sections: vec![
            Section {
                id: Uuid::new_v4(),
                title: "s1".to_string(),
                questions: vec![a],
                rule: None,
            },
            Section {
                id: Uuid::new_v4(),
                title: "s2".to_string(),
                questions: vec![b],
                rule: None,
            },
        ],
        rule: None,
    };

    let walked: Vec<Uuid> = form.all_questions().map(|q| q.id).collect();
    assert_eq!(walked, ids);
    assert!(form.find_question(ids[2]).is_some());
    assert!(form.find_question(Uuid::new_v4()).is_none());
}

#[test]
fn exactly_one_rejects_zero_and_many() {
    let submission = || FormSubmission {
        form_id: Uuid::new_v4(),
        question_answers: vec![],
    };

    assert!(exactly_one(vec![submission()]).is_ok());
    assert!(matches!(
        exactly_one(vec![]),
        Err(CoreError::MissingField(_))
    ));
    assert!(matches!(
        exactly_one(vec![submission(), submission()]),
        Err(CoreError::TooManySubmissions(2))
    ));
}

#[test]
fn inline_image_is_detected_by_prefix() {
    let mut qs = QuestionSubmission::default();
    assert!(!qs.has_inline_image());
    qs.answer_image = Some("images/abc.png".to_string());
    assert!(!qs.has_inline_image());
    qs.answer_image = Some("data:image/png;base64,AAAA".to_string());
    assert!(qs.has_inline_image());
}

#[test]
fn rule_wire_format() {
    let rule: Rule = serde_json::from_value(serde_json::json!({
        "id": Uuid::new_v4(),
        "kind": "threshold_compare",
        "operation": ">=",
        "value1": { "type": "field", "field": "weight" },
        "value2": { "type": "number", "value": 70 },
        "max_score": 10
    }))
    .unwrap();

    assert_eq!(rule.kind, RuleKind::ThresholdCompare);
    assert_eq!(rule.operation, Some(Operation::Gte));
    assert_eq!(rule.expression(), "subject.weight >= 70 ? 10 : 0");
}

#[test]
fn status_serializes_screaming_snake() {
    assert_eq!(
        serde_json::to_value(EvaluationStatus::InProgress).unwrap(),
        serde_json::json!("IN_PROGRESS")
    );
}
