//! Sales invoice record.
//!
//! `status` is partly derived: once an invoice leaves `draft`, payment
//! reconciliation moves it between `issued` and `paid`.

use super::{ensure_within_limit, Record, ValidationError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Not yet issued; payments are rejected.
    #[default]
    Draft,
    Issued,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub id: Option<String>,
    pub number: String,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
    pub total: Decimal,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoicePatch {
    pub number: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub total: Option<Decimal>,
    pub updated_at: Option<i64>,
}

impl Invoice {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.total <= Decimal::ZERO {
            return Err(ValidationError::TotalNotPositive(self.total));
        }
        ensure_within_limit("total", self.total)
    }

    /// Whether the invoice belongs to the contact, by id or by name.
    ///
    /// `normalized_name` must already be passed through `normalize_name`.
    pub fn references_client(&self, client_id: &str, normalized_name: &str) -> bool {
        references_client(
            self.client_id.as_deref(),
            self.client_name.as_deref(),
            client_id,
            normalized_name,
        )
    }

    pub(crate) fn apply(&mut self, patch: InvoicePatch) {
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
        if patch.updated_at.is_some() {
            self.updated_at = patch.updated_at;
        }
    }
}

pub(crate) fn references_client(
    record_client_id: Option<&str>,
    record_client_name: Option<&str>,
    client_id: &str,
    normalized_name: &str,
) -> bool {
    if record_client_id == Some(client_id) {
        return true;
    }
    record_client_name
        .map(super::normalize::normalize_name)
        .is_some_and(|name| !name.is_empty() && name == normalized_name)
}

impl Record for Invoice {
    const STORAGE_KEY: &'static str = "trebisacce_invoices";
    const ID_PREFIX: &'static str = "inv";
    const ENTITY: &'static str = "Invoice";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        [
            ("inv-001", "F-2025-0042", "Acme Corp", 18, InvoiceStatus::Issued, 3450),
            ("inv-002", "F-2025-0041", "Tech Solutions", 16, InvoiceStatus::Issued, 1890),
            ("inv-003", "F-2025-0045", "Acme Corp", 10, InvoiceStatus::Draft, 2500),
            ("inv-004", "F-2025-0046", "Global Services", 8, InvoiceStatus::Paid, 980),
        ]
        .into_iter()
        .filter_map(|(id, number, client_name, day, status, total)| {
            Some(Invoice {
                id: id.to_string(),
                number: number.to_string(),
                client_id: None,
                client_name: Some(client_name.to_string()),
                date: NaiveDate::from_ymd_opt(2025, 1, day)?,
                status,
                total: Decimal::from(total),
                created_at: None,
                updated_at: None,
            })
        })
        .collect()
    }
}
