pub mod evaluation_answer;
pub mod form;
pub mod history;
pub mod professional;
pub mod rule;
pub mod subject;
pub mod submission;
