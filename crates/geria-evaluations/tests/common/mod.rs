#![allow(dead_code)]

use std::sync::Arc;

use jiff::civil::date;
use uuid::Uuid;

use geria_core::models::form::{Form, Question, QuestionOption, QuestionType, Section};
use geria_core::models::professional::Professional;
use geria_core::models::rule::{Operation, Rule, RuleKind};
use geria_core::models::subject::{Sex, Subject};
use geria_core::models::submission::{
    CreateEvaluationAnswerRequest, FormAnswersRequest, FormSubmission, OptionSubmission,
    QuestionSubmission,
};
use geria_core::s3_keys;
use geria_evaluations::{Collaborators, EvaluationAnswerService, HistoryReporter};
use geria_storage::state::save_state;
use geria_storage::store::MemoryObjectStore;

pub struct Fixture {
    pub store: Arc<MemoryObjectStore>,
    pub service: EvaluationAnswerService,
    pub reporter: HistoryReporter,
    pub professional_id: Uuid,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryObjectStore::new());
        let collaborators = Collaborators::from_store(store.clone());
        let service = EvaluationAnswerService::new(store.clone(), collaborators.clone());
        let reporter = HistoryReporter::new(store.clone(), collaborators);

        let professional = Professional {
            id: Uuid::new_v4(),
            name: "Dra. Helena".to_string(),
            registration: Some("CRM-12345".to_string()),
        };
        save_state(
            store.as_ref(),
            &s3_keys::professional(professional.id),
            &professional,
        )
        .await
        .unwrap();

        Self {
            store,
            service,
            reporter,
            professional_id: professional.id,
        }
    }

    pub async fn subject(&self, name: &str, weight: f64) -> Subject {
        let subject = Subject {
            id: Uuid::new_v4(),
            name: name.to_string(),
            document: format!("{:011}", name.len() * 7919),
            date_of_birth: date(1948, 3, 2),
            sex: Sex::Female,
            weight: Some(weight),
            height: Some(1.58),
            bmi: None,
        };
        save_state(self.store.as_ref(), &s3_keys::subject(subject.id), &subject)
            .await
            .unwrap();
        subject
    }

    pub async fn form(&self, form: Form) -> Form {
        save_state(self.store.as_ref(), &s3_keys::form(form.id), &form)
            .await
            .unwrap();
        form
    }

    pub fn create(&self, subject_id: Uuid, forms: Vec<FormSubmission>) -> CreateEvaluationAnswerRequest {
        CreateEvaluationAnswerRequest {
            evaluation_id: Uuid::new_v4(),
            subject_id,
            professional_id: self.professional_id,
            form_answers: forms,
        }
    }

    pub fn forms(&self, forms: Vec<FormSubmission>) -> FormAnswersRequest {
        FormAnswersRequest {
            professional_id: self.professional_id,
            form_answers: forms,
        }
    }
}

pub fn option(description: &str, score: f64) -> QuestionOption {
    QuestionOption {
        id: Uuid::new_v4(),
        description: description.to_string(),
        score,
    }
}

pub fn question(question_type: QuestionType, options: Vec<QuestionOption>) -> Question {
    Question {
        id: Uuid::new_v4(),
        title: format!("{question_type:?} question"),
        question_type,
        options,
        rule: None,
    }
}

pub fn form(title: &str, questions: Vec<Question>, sections: Vec<Section>) -> Form {
    Form {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        form_type: None,
        questions,
        sections,
        rule: None,
    }
}

pub fn section(questions: Vec<Question>, rule: Option<Rule>) -> Section {
    Section {
        id: Uuid::new_v4(),
        title: "section".to_string(),
        questions,
        rule,
    }
}

pub fn sum_rule() -> Rule {
    Rule {
        id: Uuid::new_v4(),
        kind: RuleKind::Aggregate,
        operation: Some(Operation::Sum),
        value1: None,
        value2: None,
        max_score: None,
        total_items: None,
        weights: Vec::new(),
        description: None,
    }
}

/// A single-question form whose SELECT question offers A(2) and B(5).
pub fn select_form(title: &str) -> Form {
    form(
        title,
        vec![question(
            QuestionType::Select,
            vec![option("A", 2.0), option("B", 5.0)],
        )],
        vec![],
    )
}

pub fn select(form: &Form, option_index: usize) -> FormSubmission {
    let q = &form.questions[0];
    FormSubmission {
        form_id: form.id,
        question_answers: vec![QuestionSubmission {
            question_id: q.id,
            selected_option_id: Some(q.options[option_index].id),
            ..Default::default()
        }],
    }
}

pub fn raw_score(question_id: Uuid, score: f64) -> QuestionSubmission {
    QuestionSubmission {
        question_id,
        score: Some(score),
        ..Default::default()
    }
}

pub fn picked(option_id: Uuid) -> OptionSubmission {
    OptionSubmission {
        option_id,
        ..Default::default()
    }
}
