//! Ledger use-case service and balance derivation.
//!
//! # Responsibility
//! - CRUD over ledger entries with kind-specific validation.
//! - Derive account balances and period aggregates from the ledger.
//!
//! # Invariants
//! - Balances are never stored; they are recomputed from every entry.
//! - Income adds to `account_id`, expense subtracts from it, transfers move
//!   the amount from `from_account_id` to `to_account_id`.
//! - Listings are sorted by date descending; ties keep stored order.

use super::{assign_id, creation_stamps, position_of, DateRange, ServiceResult};
use crate::model::transaction::{NewTransaction, Transaction, TransactionKind, TransactionPatch};
use crate::model::{now_epoch_ms, require_id, Record};
use crate::repo::record_store::RecordStore;
use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

const UNCATEGORIZED: &str = "Sin categoria";
const NO_ACCOUNT: &str = "sin-cuenta";

/// Ledger query options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub range: DateRange,
    pub kind: Option<TransactionKind>,
    /// Transfers match on either side.
    pub account_id: Option<String>,
}

impl TransactionFilter {
    pub fn within(range: DateRange) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.kind.is_some_and(|kind| tx.kind != kind) {
            return false;
        }
        if !self.range.contains(tx.date) {
            return false;
        }
        match self.account_id.as_deref() {
            Some(account_id) => tx.matches_account(account_id),
            None => true,
        }
    }
}

/// Income/expense totals; transfers are neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyNet {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTotal {
    pub account_id: String,
    pub value: Decimal,
}

pub struct TransactionService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> TransactionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list_transactions(&self, filter: &TransactionFilter) -> ServiceResult<Vec<Transaction>> {
        self.store.pause();
        let mut items: Vec<Transaction> = self
            .store
            .load::<Transaction>()?
            .into_iter()
            .filter(|tx| filter.matches(tx))
            .collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(items)
    }

    pub fn create_transaction(&self, new: NewTransaction) -> ServiceResult<Transaction> {
        self.store.pause();
        let mut ledger = self.store.load::<Transaction>()?;
        let (created_at, updated_at) = creation_stamps(new.created_at, new.updated_at);
        let mut tx = Transaction::from(new);
        tx.id = assign_id::<Transaction>(Some(tx.id));
        tx.created_at = Some(created_at);
        tx.updated_at = Some(updated_at);
        tx.validate()?;

        ledger.insert(0, tx.clone());
        self.store.save(&ledger)?;
        log_transactions_changed("create", &tx.id, ledger.len());
        Ok(tx)
    }

    pub fn update_transaction(
        &self,
        id: &str,
        patch: TransactionPatch,
    ) -> ServiceResult<Transaction> {
        self.store.pause();
        let id = require_id(Transaction::ENTITY, id)?;
        let mut ledger = self.store.load::<Transaction>()?;
        let index = position_of(&ledger, id)?;

        let mut updated = ledger[index].clone();
        let updated_at = patch.updated_at.unwrap_or_else(now_epoch_ms);
        updated.apply(patch);
        updated.updated_at = Some(updated_at);
        updated.validate()?;

        ledger[index] = updated.clone();
        self.store.save(&ledger)?;
        log_transactions_changed("update", id, ledger.len());
        Ok(updated)
    }

    /// Removes one entry. Returns the removed id.
    pub fn remove_transaction(&self, id: &str) -> ServiceResult<String> {
        self.store.pause();
        let id = require_id(Transaction::ENTITY, id)?;
        let mut ledger = self.store.load::<Transaction>()?;
        let index = position_of(&ledger, id)?;

        ledger.remove(index);
        self.store.save(&ledger)?;
        log_transactions_changed("remove", id, ledger.len());
        Ok(id.to_string())
    }

    /// Balance per account over the whole ledger.
    ///
    /// Every id in `account_ids` is present (zero when untouched); accounts
    /// that only appear in the ledger are included as well.
    pub fn account_balances(&self, account_ids: &[String]) -> ServiceResult<BTreeMap<String, Decimal>> {
        self.store.pause();
        let ledger = self.store.load::<Transaction>()?;
        Ok(balances_from_ledger(&ledger, account_ids))
    }

    pub fn transactions_summary(&self, filter: &TransactionFilter) -> ServiceResult<LedgerSummary> {
        self.store.pause();
        let ledger = self.filtered(filter)?;
        Ok(summarize(&ledger))
    }

    pub fn daily_net_series(&self, filter: &TransactionFilter) -> ServiceResult<Vec<DailyNet>> {
        self.store.pause();
        let ledger = self.filtered(filter)?;
        Ok(daily_series(&ledger))
    }

    /// Expense totals per category, ordered by category name.
    pub fn expense_by_category(
        &self,
        filter: &TransactionFilter,
    ) -> ServiceResult<Vec<CategoryTotal>> {
        self.store.pause();
        let ledger = self.filtered(filter)?;
        let totals = totals_by(&ledger, TransactionKind::Expense, |tx| {
            tx.category
                .as_deref()
                .filter(|value| !value.is_empty())
                .unwrap_or(UNCATEGORIZED)
        });
        Ok(totals
            .into_iter()
            .map(|(name, value)| CategoryTotal { name, value })
            .collect())
    }

    /// Income totals per account id, ordered by account id.
    pub fn income_by_account(&self, filter: &TransactionFilter) -> ServiceResult<Vec<AccountTotal>> {
        self.store.pause();
        let ledger = self.filtered(filter)?;
        let totals = totals_by(&ledger, TransactionKind::Income, |tx| {
            tx.account_id
                .as_deref()
                .filter(|value| !value.is_empty())
                .unwrap_or(NO_ACCOUNT)
        });
        Ok(totals
            .into_iter()
            .map(|(account_id, value)| AccountTotal { account_id, value })
            .collect())
    }

    fn filtered(&self, filter: &TransactionFilter) -> ServiceResult<Vec<Transaction>> {
        Ok(self
            .store
            .load::<Transaction>()?
            .into_iter()
            .filter(|tx| filter.matches(tx))
            .collect())
    }
}

/// Folds the ledger into per-account balances.
pub fn balances_from_ledger(
    ledger: &[Transaction],
    account_ids: &[String],
) -> BTreeMap<String, Decimal> {
    let mut balances: BTreeMap<String, Decimal> = account_ids
        .iter()
        .filter(|id| !id.is_empty())
        .map(|id| (id.clone(), Decimal::ZERO))
        .collect();

    let mut post = |account_id: Option<&str>, delta: Decimal| {
        if let Some(account_id) = account_id.filter(|value| !value.is_empty()) {
            *balances.entry(account_id.to_string()).or_default() += delta;
        }
    };

    for tx in ledger {
        match tx.kind {
            TransactionKind::Income => post(tx.account_id.as_deref(), tx.amount),
            TransactionKind::Expense => post(tx.account_id.as_deref(), -tx.amount),
            TransactionKind::Transfer => {
                post(tx.from_account_id.as_deref(), -tx.amount);
                post(tx.to_account_id.as_deref(), tx.amount);
            }
        }
    }

    balances
}

pub fn summarize(ledger: &[Transaction]) -> LedgerSummary {
    let mut summary = LedgerSummary::default();
    for tx in ledger {
        match tx.kind {
            TransactionKind::Income => summary.income += tx.amount,
            TransactionKind::Expense => summary.expense += tx.amount,
            TransactionKind::Transfer => {}
        }
    }
    summary.net = summary.income - summary.expense;
    summary
}

/// One point per date that has entries, ascending.
pub fn daily_series(ledger: &[Transaction]) -> Vec<DailyNet> {
    let mut by_date: BTreeMap<NaiveDate, DailyNet> = BTreeMap::new();
    for tx in ledger {
        let point = by_date.entry(tx.date).or_insert_with(|| DailyNet {
            date: tx.date,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            net: Decimal::ZERO,
        });
        match tx.kind {
            TransactionKind::Income => point.income += tx.amount,
            TransactionKind::Expense => point.expense += tx.amount,
            TransactionKind::Transfer => {}
        }
        point.net = point.income - point.expense;
    }
    by_date.into_values().collect()
}

fn totals_by<'a>(
    ledger: &'a [Transaction],
    kind: TransactionKind,
    key: impl Fn(&'a Transaction) -> &'a str,
) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for tx in ledger.iter().filter(|tx| tx.kind == kind) {
        *totals.entry(key(tx).to_string()).or_default() += tx.amount;
    }
    totals
}

fn log_transactions_changed(action: &str, id: &str, rows: usize) {
    info!(
        "event=transactions_changed module=service status=ok action={} id={} rows={}",
        action, id, rows
    );
}
