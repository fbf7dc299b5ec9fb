//! Typed JSON lists over the SQLite key-value table.
//!
//! # Responsibility
//! - Map each `Record` type to one JSON array under `Record::STORAGE_KEY`.
//! - Seed a missing list and reset a corrupt one.
//!
//! # Invariants
//! - `load` always leaves a well-formed list in storage.
//! - `load_existing` never writes.

use super::latency::Latency;
use super::{RepoError, RepoResult};
use crate::config::AppConfig;
use crate::db::kv::{kv_get, kv_set};
use crate::model::Record;
use log::{info, warn};
use rusqlite::Connection;

/// Persistence contract used by every service.
pub trait RecordStore {
    /// Reads the list for `T`, seeding or resetting it when needed.
    fn load<T: Record>(&self) -> RepoResult<Vec<T>>;

    /// Reads the list for `T` without side effects. Missing or corrupt lists
    /// read as empty; rows that do not parse are skipped one by one.
    fn load_existing<T: Record>(&self) -> RepoResult<Vec<T>>;

    /// Overwrites the whole list for `T`.
    fn save<T: Record>(&self, items: &[T]) -> RepoResult<()>;

    /// Simulated round-trip delay before a public operation.
    fn pause(&self) {}
}

/// SQLite-backed record store.
#[derive(Debug, Clone, Copy)]
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
    seed_demo_data: bool,
    latency: Latency,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Store over a migrated connection, with demo seeding and no latency.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            seed_demo_data: true,
            latency: Latency::NONE,
        }
    }

    /// Missing lists start empty instead of receiving demo rows.
    pub fn without_seed(mut self) -> Self {
        self.seed_demo_data = false;
        self
    }

    pub fn with_seed(mut self, seed_demo_data: bool) -> Self {
        self.seed_demo_data = seed_demo_data;
        self
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Applies the seeding and latency settings of `config`.
    pub fn configured(conn: &'conn Connection, config: &AppConfig) -> Self {
        Self::new(conn)
            .with_seed(config.seed_demo_data)
            .with_latency(config.latency.into())
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    fn initial_rows<T: Record>(&self) -> Vec<T> {
        if self.seed_demo_data {
            T::seed()
        } else {
            Vec::new()
        }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn load<T: Record>(&self) -> RepoResult<Vec<T>> {
        let Some(raw) = kv_get(self.conn, T::STORAGE_KEY)? else {
            let initial = self.initial_rows::<T>();
            self.save(&initial)?;
            info!(
                "event=list_init module=repo status=ok key={} rows={}",
                T::STORAGE_KEY,
                initial.len()
            );
            return Ok(initial);
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                let initial = self.initial_rows::<T>();
                warn!(
                    "event=list_reset module=repo status=error key={} rows={} error_code=corrupt_list error={}",
                    T::STORAGE_KEY,
                    initial.len(),
                    err
                );
                self.save(&initial)?;
                Ok(initial)
            }
        }
    }

    fn load_existing<T: Record>(&self) -> RepoResult<Vec<T>> {
        let Some(raw) = kv_get(self.conn, T::STORAGE_KEY)? else {
            return Ok(Vec::new());
        };
        let Ok(rows) = serde_json::from_str::<Vec<serde_json::Value>>(&raw) else {
            return Ok(Vec::new());
        };
        let total = rows.len();
        let items: Vec<T> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();
        if items.len() < total {
            warn!(
                "event=list_read module=repo status=partial key={} rows={} skipped={}",
                T::STORAGE_KEY,
                items.len(),
                total - items.len()
            );
        }
        Ok(items)
    }

    fn save<T: Record>(&self, items: &[T]) -> RepoResult<()> {
        let encoded = serde_json::to_string(items).map_err(|source| RepoError::Encode {
            key: T::STORAGE_KEY,
            source,
        })?;
        kv_set(self.conn, T::STORAGE_KEY, &encoded)?;
        Ok(())
    }

    fn pause(&self) {
        self.latency.pause();
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordStore, SqliteRecordStore};
    use crate::db::kv::{kv_get, kv_set};
    use crate::db::open_db_in_memory;
    use crate::model::account::Account;
    use crate::model::invoice::Invoice;
    use crate::model::transaction::Transaction;
    use crate::model::Record;

    #[test]
    fn first_load_writes_seed_rows() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteRecordStore::new(&conn);

        let accounts: Vec<Account> = store.load().unwrap();
        assert_eq!(accounts, Account::seed());
        assert!(kv_get(&conn, Account::STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn corrupt_list_is_reset_to_seed() {
        let conn = open_db_in_memory().unwrap();
        kv_set(&conn, Account::STORAGE_KEY, "{not json").unwrap();
        let store = SqliteRecordStore::new(&conn);

        let accounts: Vec<Account> = store.load().unwrap();
        assert_eq!(accounts.len(), 3);

        let raw = kv_get(&conn, Account::STORAGE_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
    }

    #[test]
    fn non_array_value_is_reset_to_empty_without_seed() {
        let conn = open_db_in_memory().unwrap();
        kv_set(&conn, Account::STORAGE_KEY, "{\"id\":\"acc-001\"}").unwrap();
        let store = SqliteRecordStore::new(&conn).without_seed();

        let accounts: Vec<Account> = store.load().unwrap();
        assert!(accounts.is_empty());
        assert_eq!(kv_get(&conn, Account::STORAGE_KEY).unwrap().unwrap(), "[]");
    }

    #[test]
    fn load_existing_has_no_side_effects() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteRecordStore::new(&conn);

        let invoices: Vec<Invoice> = store.load_existing().unwrap();
        assert!(invoices.is_empty());
        assert!(kv_get(&conn, Invoice::STORAGE_KEY).unwrap().is_none());

        kv_set(&conn, Invoice::STORAGE_KEY, "garbage").unwrap();
        let invoices: Vec<Invoice> = store.load_existing().unwrap();
        assert!(invoices.is_empty());
        assert_eq!(
            kv_get(&conn, Invoice::STORAGE_KEY).unwrap().unwrap(),
            "garbage"
        );
    }

    #[test]
    fn load_existing_skips_only_malformed_rows() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteRecordStore::new(&conn);
        kv_set(
            &conn,
            Transaction::STORAGE_KEY,
            r#"[{"id":"tx-bad","type":"income","amount":"oops"},
                {"id":"tx-ok","type":"expense","date":"2025-01-12","amount":"80","accountId":"acc-001"}]"#,
        )
        .unwrap();

        let ledger: Vec<Transaction> = store.load_existing().unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].id, "tx-ok");
    }
}
