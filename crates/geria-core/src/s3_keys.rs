//! S3 key/path conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the
//! canonical layout of objects in the Geria bucket.

use uuid::Uuid;

pub fn subject(id: Uuid) -> String {
    format!("subjects/{id}.json")
}

pub fn professional(id: Uuid) -> String {
    format!("professionals/{id}.json")
}

pub fn form(id: Uuid) -> String {
    format!("forms/{id}.json")
}

pub fn evaluation_answer(id: Uuid) -> String {
    format!("evaluation-answers/{id}.json")
}

pub const EVALUATION_ANSWERS_PREFIX: &str = "evaluation-answers/";

pub fn image(id: Uuid, extension: &str) -> String {
    format!("images/{id}.{extension}")
}
