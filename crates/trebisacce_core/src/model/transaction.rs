//! Ledger entry record.
//!
//! # Invariants
//! - `amount` is strictly positive; the sign comes from `kind`.
//! - Income/expense entries reference `account_id`.
//! - Transfers reference distinct `from_account_id` and `to_account_id`.

use super::{ensure_within_limit, Record, ValidationError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Free-form pointer to the record that produced the entry, e.g. `inv-001`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub id: Option<String>,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub account_id: Option<String>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub related_entity: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl NewTransaction {
    /// Income or expense entry against one account.
    pub fn single(
        kind: TransactionKind,
        date: NaiveDate,
        amount: Decimal,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            date,
            kind,
            amount,
            account_id: Some(account_id.into()),
            from_account_id: None,
            to_account_id: None,
            category: None,
            description: None,
            reference: None,
            related_entity: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Transfer between two accounts.
    pub fn transfer(
        date: NaiveDate,
        amount: Decimal,
        from_account_id: impl Into<String>,
        to_account_id: impl Into<String>,
    ) -> Self {
        Self {
            account_id: None,
            from_account_id: Some(from_account_id.into()),
            to_account_id: Some(to_account_id.into()),
            ..Self::single(TransactionKind::Transfer, date, amount, String::new())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub amount: Option<Decimal>,
    pub account_id: Option<String>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub related_entity: Option<String>,
    pub updated_at: Option<i64>,
}

impl Transaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::AmountNotPositive(self.amount));
        }
        ensure_within_limit("amount", self.amount)?;

        match self.kind {
            TransactionKind::Transfer => {
                let from = non_blank(self.from_account_id.as_deref());
                let to = non_blank(self.to_account_id.as_deref());
                match (from, to) {
                    (Some(from), Some(to)) if from == to => {
                        Err(ValidationError::TransferSameAccount(from.to_string()))
                    }
                    (Some(_), Some(_)) => Ok(()),
                    _ => Err(ValidationError::TransferAccountsRequired),
                }
            }
            TransactionKind::Income | TransactionKind::Expense => {
                if non_blank(self.account_id.as_deref()).is_none() {
                    return Err(ValidationError::AccountRequired);
                }
                Ok(())
            }
        }
    }

    /// Whether the entry shows up in an account-filtered view: transfers
    /// match either side, other entries match `account_id`.
    pub fn matches_account(&self, account_id: &str) -> bool {
        match self.kind {
            TransactionKind::Transfer => {
                self.from_account_id.as_deref() == Some(account_id)
                    || self.to_account_id.as_deref() == Some(account_id)
            }
            _ => self.account_id.as_deref() == Some(account_id),
        }
    }

    /// Whether any account field, whatever the kind, points at `account_id`.
    pub fn references_account(&self, account_id: &str) -> bool {
        [
            self.account_id.as_deref(),
            self.from_account_id.as_deref(),
            self.to_account_id.as_deref(),
        ]
        .contains(&Some(account_id))
    }

    pub(crate) fn apply(&mut self, patch: TransactionPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        merge(&mut self.account_id, patch.account_id);
        merge(&mut self.from_account_id, patch.from_account_id);
        merge(&mut self.to_account_id, patch.to_account_id);
        merge(&mut self.category, patch.category);
        merge(&mut self.description, patch.description);
        merge(&mut self.reference, patch.reference);
        merge(&mut self.related_entity, patch.related_entity);
    }
}

fn merge(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl From<NewTransaction> for Transaction {
    fn from(value: NewTransaction) -> Self {
        Self {
            id: value.id.unwrap_or_default(),
            date: value.date,
            kind: value.kind,
            amount: value.amount,
            account_id: value.account_id,
            from_account_id: value.from_account_id,
            to_account_id: value.to_account_id,
            category: value.category,
            description: value.description,
            reference: value.reference,
            related_entity: value.related_entity,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl Record for Transaction {
    const STORAGE_KEY: &'static str = "trebisacce_transactions_v1";
    const ID_PREFIX: &'static str = "tx";
    const ENTITY: &'static str = "Transaction";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        use TransactionKind::{Expense, Income, Transfer};

        let rows: [(&str, u32, TransactionKind, i64, &str, Option<&str>, &str); 12] = [
            ("tx-001", 18, Expense, 240, "acc-001", Some("Oficina"), "Suministros oficina"),
            ("tx-002", 17, Expense, 89, "acc-002", Some("Servicios"), "Hosting mensual"),
            ("tx-003", 16, Income, 3450, "acc-002", Some("Ventas"), "Cobro factura F-2025-0042"),
            ("tx-004", 15, Income, 1200, "acc-003", Some("Online"), "Ventas ecommerce"),
            ("tx-005", 14, Expense, 310, "acc-001", Some("Logistica"), "Envios"),
            ("tx-006", 13, Income, 980, "acc-001", Some("Ventas"), "Cobro mostrador"),
            ("tx-007", 12, Transfer, 500, "acc-001>acc-002", None, "Reposicion banco"),
            ("tx-008", 11, Expense, 140, "acc-003", Some("Comisiones"), "Comision MP"),
            ("tx-009", 10, Income, 760, "acc-002", Some("Servicios"), "Consultoria"),
            ("tx-010", 9, Expense, 210, "acc-001", Some("Marketing"), "Campana redes"),
            ("tx-011", 8, Transfer, 300, "acc-002>acc-003", None, "Fondeo MP"),
            ("tx-012", 7, Expense, 95, "acc-002", Some("Servicios"), "Dominios"),
        ];

        rows.into_iter()
            .filter_map(|(id, day, kind, amount, accounts, category, description)| {
                let date = NaiveDate::from_ymd_opt(2025, 1, day)?;
                let (account_id, from_account_id, to_account_id) = match accounts.split_once('>') {
                    Some((from, to)) => (None, Some(from.to_string()), Some(to.to_string())),
                    None => (Some(accounts.to_string()), None, None),
                };
                Some(Transaction {
                    id: id.to_string(),
                    date,
                    kind,
                    amount: Decimal::from(amount),
                    account_id,
                    from_account_id,
                    to_account_id,
                    category: category.map(str::to_string),
                    description: Some(description.to_string()),
                    reference: None,
                    related_entity: None,
                    created_at: None,
                    updated_at: None,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTransaction, Transaction, TransactionKind};
    use crate::model::ValidationError;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn transfer_requires_two_distinct_accounts() {
        let mut tx: Transaction =
            NewTransaction::transfer(day(5), Decimal::from(10), "acc-001", "acc-001").into();
        assert_eq!(
            tx.validate().unwrap_err(),
            ValidationError::TransferSameAccount("acc-001".to_string())
        );

        tx.to_account_id = None;
        assert_eq!(
            tx.validate().unwrap_err(),
            ValidationError::TransferAccountsRequired
        );
    }

    #[test]
    fn income_requires_account_and_positive_amount() {
        let mut tx: Transaction =
            NewTransaction::single(TransactionKind::Income, day(5), Decimal::ZERO, " ").into();
        assert_eq!(
            tx.validate().unwrap_err(),
            ValidationError::AmountNotPositive(Decimal::ZERO)
        );

        tx.amount = Decimal::from(5);
        assert_eq!(tx.validate().unwrap_err(), ValidationError::AccountRequired);
    }

    #[test]
    fn account_matching_distinguishes_filter_and_reference() {
        let mut tx: Transaction =
            NewTransaction::transfer(day(5), Decimal::from(10), "acc-001", "acc-002").into();
        assert!(tx.matches_account("acc-002"));

        // A stale account_id left on a transfer still blocks account removal.
        tx.account_id = Some("acc-009".to_string());
        assert!(!tx.matches_account("acc-009"));
        assert!(tx.references_account("acc-009"));
    }

    #[test]
    fn seed_ledger_serializes_with_wire_names() {
        let seed = <Transaction as crate::model::Record>::seed();
        assert_eq!(seed.len(), 12);

        let transfer = serde_json::to_value(&seed[6]).unwrap();
        assert_eq!(transfer["type"], "transfer");
        assert_eq!(transfer["fromAccountId"], "acc-001");
        assert_eq!(transfer["toAccountId"], "acc-002");
        assert_eq!(transfer["date"], "2025-01-12");
        assert!(transfer.get("accountId").is_none());
    }
}
