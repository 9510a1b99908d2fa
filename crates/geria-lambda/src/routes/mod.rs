pub mod evaluation_answers;
pub mod health;
pub mod history;
