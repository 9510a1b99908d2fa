//! geria-core
//!
//! Pure domain types and S3 key conventions.
//! No AWS SDK dependency. This is the shared vocabulary of the Geria system:
//! subjects, form definition trees, scoring rules, submissions, and the
//! evaluation-answer aggregate they produce.

pub mod error;
pub mod models;
pub mod s3_keys;
