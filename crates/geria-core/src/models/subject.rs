use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// The elderly person being assessed.
///
/// Registered by an external collaborator; read-only to the scoring core.
/// Weight is in kilograms and height in metres.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    /// National identifier (e.g. CPF) used for search.
    pub document: String,
    pub date_of_birth: jiff::civil::Date,
    pub sex: Sex,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    /// Stored body-mass index. When absent it is derived from weight and height.
    pub bmi: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Sex {
    Female,
    Male,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
            Sex::Other => "other",
        }
    }
}

impl Subject {
    /// Age in whole years on `as_of`.
    pub fn age_on(&self, as_of: jiff::civil::Date) -> i32 {
        let dob = self.date_of_birth;
        let mut years = i32::from(as_of.year()) - i32::from(dob.year());
        if (as_of.month(), as_of.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        years.max(0)
    }

    pub fn bmi(&self) -> Option<f64> {
        if self.bmi.is_some() {
            return self.bmi;
        }
        match (self.weight, self.height) {
            (Some(weight), Some(height)) if height > 0.0 => Some(weight / (height * height)),
            _ => None,
        }
    }

    pub fn summary(&self) -> SubjectSummary {
        SubjectSummary {
            id: self.id,
            name: self.name.clone(),
            document: self.document.clone(),
        }
    }
}

/// The identifying slice of a subject shown next to evaluation answers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubjectSummary {
    pub id: Uuid,
    pub name: String,
    pub document: String,
}
