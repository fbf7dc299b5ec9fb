//! Persistence of record lists over the key-value table.
//!
//! # Responsibility
//! - Load and save whole JSON lists under each record's fixed key.
//! - Seed demo rows on first read and recover from corrupt values.
//! - Simulate backend latency for callers that want it.
//!
//! # Invariants
//! - A list is always written whole; there are no partial row updates.
//! - A corrupt stored value is replaced, never surfaced as a read error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod latency;
pub mod record_store;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage failure while reading or writing a list.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, source } => write!(f, "failed to encode list `{key}`: {source}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
