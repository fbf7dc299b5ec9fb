//! Business decision log entry.

use super::{Record, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: DecisionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDecision {
    pub id: Option<String>,
    pub title: String,
    pub date: NaiveDate,
    pub status: DecisionStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<DecisionStatus>,
    pub notes: Option<String>,
}

impl Decision {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        Ok(())
    }

    pub(crate) fn apply(&mut self, patch: DecisionPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }
}

impl Record for Decision {
    const STORAGE_KEY: &'static str = "trebisacce_decisions_v1";
    const ID_PREFIX: &'static str = "dec";
    const ENTITY: &'static str = "Decision";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        [
            ("dec-001", "Renovar contrato proveedor A", 10, DecisionStatus::Closed),
            ("dec-002", "Inversión en marketing Q2", 15, DecisionStatus::Open),
        ]
        .into_iter()
        .filter_map(|(id, title, day, status)| {
            Some(Decision {
                id: id.to_string(),
                title: title.to_string(),
                date: NaiveDate::from_ymd_opt(2025, 1, day)?,
                status,
                notes: None,
                created_at: None,
                updated_at: None,
            })
        })
        .collect()
    }
}
