use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// The health professional who records a form answer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Professional {
    pub id: Uuid,
    pub name: String,
    pub registration: Option<String>,
}
