//! Treasury dashboard aggregate.
//!
//! Composes the account, ledger and payment services; balances always span
//! the whole ledger while every other figure honours the requested range.

use super::account_service::AccountService;
use super::payment_service::{MethodTotal, PaymentService};
use super::transaction_service::{
    AccountTotal, CategoryTotal, DailyNet, TransactionFilter, TransactionService,
};
use super::{DateRange, ServiceResult};
use crate::model::account::Account;
use crate::repo::record_store::RecordStore;
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryKpis {
    /// Sum of every account balance.
    pub total_balance: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryOverview {
    pub accounts: Vec<Account>,
    pub balances: BTreeMap<String, Decimal>,
    pub kpis: TreasuryKpis,
    pub daily_net: Vec<DailyNet>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub income_by_account: Vec<AccountTotal>,
    pub payments_by_method: Vec<MethodTotal>,
}

pub struct TreasuryAnalytics<S: RecordStore + Clone> {
    accounts: AccountService<S>,
    transactions: TransactionService<S>,
    payments: PaymentService<S>,
}

impl<S: RecordStore + Clone> TreasuryAnalytics<S> {
    pub fn new(store: S) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            transactions: TransactionService::new(store.clone()),
            payments: PaymentService::new(store),
        }
    }

    pub fn treasury_overview(&self, range: DateRange) -> ServiceResult<TreasuryOverview> {
        let started_at = Instant::now();
        let filter = TransactionFilter::within(range);

        let accounts = self.accounts.list_accounts()?;
        let account_ids: Vec<String> = accounts.iter().map(|account| account.id.clone()).collect();
        let balances = self.transactions.account_balances(&account_ids)?;
        let summary = self.transactions.transactions_summary(&filter)?;
        let daily_net = self.transactions.daily_net_series(&filter)?;
        let expense_by_category = self.transactions.expense_by_category(&filter)?;
        let income_by_account = self.transactions.income_by_account(&filter)?;
        let payments = self.payments.payments_summary(range)?;

        let kpis = TreasuryKpis {
            total_balance: balances.values().copied().sum(),
            income: summary.income,
            expense: summary.expense,
            net: summary.income - summary.expense,
        };

        info!(
            "event=treasury_overview module=service status=ok accounts={} days={} duration_ms={}",
            accounts.len(),
            daily_net.len(),
            started_at.elapsed().as_millis()
        );
        Ok(TreasuryOverview {
            accounts,
            balances,
            kpis,
            daily_net,
            expense_by_category,
            income_by_account,
            payments_by_method: payments.by_method,
        })
    }
}
