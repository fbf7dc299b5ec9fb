//! Sales quote (presupuesto) record.

use super::invoice::references_client;
use super::Record;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
}

impl QuoteStatus {
    /// Draft and sent quotes still await a customer answer.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Draft | Self::Sent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: QuoteStatus,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub id: Option<String>,
    pub number: String,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub date: NaiveDate,
    pub status: QuoteStatus,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotePatch {
    pub number: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<QuoteStatus>,
    pub total: Option<Decimal>,
}

impl Quote {
    pub fn references_client(&self, client_id: &str, normalized_name: &str) -> bool {
        references_client(
            self.client_id.as_deref(),
            self.client_name.as_deref(),
            client_id,
            normalized_name,
        )
    }

    pub(crate) fn apply(&mut self, patch: QuotePatch) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if patch.client_id.is_some() {
            self.client_id = patch.client_id;
        }
        if patch.client_name.is_some() {
            self.client_name = patch.client_name;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(total) = patch.total {
            self.total = total;
        }
    }
}

impl From<NewQuote> for Quote {
    fn from(value: NewQuote) -> Self {
        Self {
            id: value.id.unwrap_or_default(),
            number: value.number,
            client_id: value.client_id,
            client_name: value.client_name,
            date: value.date,
            status: value.status,
            total: value.total,
        }
    }
}

impl Record for Quote {
    const STORAGE_KEY: &'static str = "trebisacce_quotes";
    const ID_PREFIX: &'static str = "quo";
    const ENTITY: &'static str = "Quote";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        [
            ("quo-001", "P-2025-010", "Acme Corp", 20, QuoteStatus::Sent, 4200),
            ("quo-002", "P-2025-009", "Tech Solutions", 18, QuoteStatus::Draft, 1850),
            ("quo-003", "P-2025-008", "Global Services", 12, QuoteStatus::Accepted, 7600),
            ("quo-004", "P-2025-007", "Northwind", 9, QuoteStatus::Rejected, 2350),
        ]
        .into_iter()
        .filter_map(|(id, number, client_name, day, status, total)| {
            Some(Quote {
                id: id.to_string(),
                number: number.to_string(),
                client_id: None,
                client_name: Some(client_name.to_string()),
                date: NaiveDate::from_ymd_opt(2025, 1, day)?,
                status,
                total: Decimal::from(total),
            })
        })
        .collect()
    }
}
