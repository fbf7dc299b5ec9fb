//! Treasury account use-case service.
//!
//! # Invariants
//! - Account names are unique after `normalize_name`.
//! - An account referenced by any ledger entry cannot be removed.
//! - Balances are not stored here; see `TransactionService::account_balances`.

use super::{
    assign_id, creation_stamps, ensure_unique_name, position_of, ServiceError, ServiceResult,
};
use crate::model::account::{Account, AccountPatch, NewAccount};
use crate::model::transaction::Transaction;
use crate::model::{now_epoch_ms, require_id, Record};
use crate::repo::record_store::RecordStore;
use log::info;

const FALLBACK_CURRENCY: &str = "ARS";

pub struct AccountService<S: RecordStore> {
    store: S,
    default_currency: String,
}

impl<S: RecordStore> AccountService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            default_currency: FALLBACK_CURRENCY.to_string(),
        }
    }

    /// Currency given to new accounts that do not name one.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    pub fn list_accounts(&self) -> ServiceResult<Vec<Account>> {
        self.store.pause();
        Ok(self.store.load::<Account>()?)
    }

    pub fn get_account(&self, id: &str) -> ServiceResult<Option<Account>> {
        let id = require_id(Account::ENTITY, id)?;
        let accounts = self.store.load::<Account>()?;
        Ok(accounts.into_iter().find(|account| account.id == id))
    }

    pub fn create_account(&self, new: NewAccount) -> ServiceResult<Account> {
        self.store.pause();
        let mut accounts = self.store.load::<Account>()?;
        let (created_at, updated_at) = creation_stamps(new.created_at, new.updated_at);
        let currency = new
            .currency
            .map(|value| value.trim().to_uppercase())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.default_currency.clone());
        let account = Account {
            id: assign_id::<Account>(new.id),
            name: new.name,
            kind: new.kind,
            currency,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        };
        account.validate()?;
        ensure_unique_name(
            Account::ENTITY,
            accounts.iter().map(|a| (a.id.as_str(), a.name.as_str())),
            &account.name,
            None,
        )?;

        accounts.insert(0, account.clone());
        self.store.save(&accounts)?;
        log_accounts_changed("create", &account.id, accounts.len());
        Ok(account)
    }

    pub fn update_account(&self, id: &str, patch: AccountPatch) -> ServiceResult<Account> {
        self.store.pause();
        let id = require_id(Account::ENTITY, id)?;
        let mut accounts = self.store.load::<Account>()?;
        let index = position_of(&accounts, id)?;

        let mut updated = accounts[index].clone();
        let updated_at = patch.updated_at.unwrap_or_else(now_epoch_ms);
        updated.apply(patch);
        updated.updated_at = Some(updated_at);
        updated.validate()?;
        ensure_unique_name(
            Account::ENTITY,
            accounts.iter().map(|a| (a.id.as_str(), a.name.as_str())),
            &updated.name,
            Some(id),
        )?;

        accounts[index] = updated.clone();
        self.store.save(&accounts)?;
        log_accounts_changed("update", id, accounts.len());
        Ok(updated)
    }

    /// Removes an account with no ledger history. Returns the removed id.
    pub fn remove_account(&self, id: &str) -> ServiceResult<String> {
        self.store.pause();
        let id = require_id(Account::ENTITY, id)?;
        let mut accounts = self.store.load::<Account>()?;
        let index = position_of(&accounts, id)?;

        let ledger = self.store.load_existing::<Transaction>()?;
        if ledger.iter().any(|tx| tx.references_account(id)) {
            return Err(ServiceError::InUse {
                entity: Account::ENTITY,
                id: id.to_string(),
                referenced_by: "transactions",
            });
        }

        accounts.remove(index);
        self.store.save(&accounts)?;
        log_accounts_changed("remove", id, accounts.len());
        Ok(id.to_string())
    }
}

fn log_accounts_changed(action: &str, id: &str, rows: usize) {
    info!(
        "event=accounts_changed module=service status=ok action={} id={} rows={}",
        action, id, rows
    );
}
