//! Invoice payment record.

use super::{ensure_within_limit, Record, ValidationError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
    MercadoPago,
    #[default]
    Other,
}

impl PaymentMethod {
    /// Maps loosely typed method labels onto a known method.
    ///
    /// Exact wire values win; otherwise Spanish and English fragments are
    /// recognised (`mercado`, `transf`, `efect`, `tarj`). Anything else,
    /// including blank input, is `Other`.
    pub fn normalize(value: &str) -> Self {
        let raw = value.trim().to_lowercase();
        match raw.as_str() {
            "cash" => return Self::Cash,
            "transfer" => return Self::Transfer,
            "card" => return Self::Card,
            "mercado_pago" => return Self::MercadoPago,
            "other" | "" => return Self::Other,
            _ => {}
        }

        if raw.contains("mercado") {
            Self::MercadoPago
        } else if raw.contains("transf") {
            Self::Transfer
        } else if raw.contains("efect") {
            Self::Cash
        } else if raw.contains("tarj") {
            Self::Card
        } else {
            Self::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::Card => "card",
            Self::MercadoPago => "mercado_pago",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub id: Option<String>,
    pub invoice_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl NewPayment {
    pub fn new(
        invoice_id: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id: None,
            invoice_id: invoice_id.into(),
            date,
            amount,
            method,
            reference: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentPatch {
    /// Moves the payment to another invoice; both invoices are reconciled.
    pub invoice_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub method: Option<PaymentMethod>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub updated_at: Option<i64>,
}

impl Payment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.invoice_id.trim().is_empty() {
            return Err(ValidationError::InvoiceIdRequired);
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::AmountNotPositive(self.amount));
        }
        ensure_within_limit("amount", self.amount)
    }

    pub(crate) fn apply(&mut self, patch: PaymentPatch) {
        if let Some(invoice_id) = patch.invoice_id {
            self.invoice_id = invoice_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(method) = patch.method {
            self.method = method;
        }
        if patch.reference.is_some() {
            self.reference = patch.reference;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }
}

impl Record for Payment {
    const STORAGE_KEY: &'static str = "trebisacce_payments_v1";
    const ID_PREFIX: &'static str = "pay";
    const ENTITY: &'static str = "Payment";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        [
            ("pay-001", "inv-001", 19, 1200, PaymentMethod::Transfer, "TRX-0012", ""),
            ("pay-002", "inv-001", 20, 900, PaymentMethod::Card, "VISA-4821", ""),
            ("pay-003", "inv-002", 18, 800, PaymentMethod::Cash, "", "Anticipo en caja"),
            ("pay-004", "inv-002", 19, 500, PaymentMethod::MercadoPago, "MP-7782", ""),
            ("pay-005", "inv-004", 9, 980, PaymentMethod::Transfer, "TRX-0021", ""),
        ]
        .into_iter()
        .filter_map(|(id, invoice_id, day, amount, method, reference, notes)| {
            Some(Payment {
                id: id.to_string(),
                invoice_id: invoice_id.to_string(),
                date: NaiveDate::from_ymd_opt(2025, 1, day)?,
                amount: Decimal::from(amount),
                method,
                reference: Some(reference.to_string()).filter(|value| !value.is_empty()),
                notes: Some(notes.to_string()).filter(|value| !value.is_empty()),
                created_at: None,
                updated_at: None,
            })
        })
        .collect()
    }
}
