//! Use-case services, one per persisted list plus cross-list analytics.
//!
//! # Responsibility
//! - Validate inputs and ad hoc invariants before a list is written.
//! - Resolve informal id references by linear scan.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass `RecordStore`; every write replaces a whole list.
//! - Newly created records are inserted at the front of their list.

use crate::model::normalize::normalize_name;
use crate::model::{generate_id, now_epoch_ms, Record, ValidationError};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_service;
pub mod client_service;
pub mod decision_service;
pub mod invoice_service;
pub mod payment_service;
pub mod product_service;
pub mod quote_service;
pub mod sales_analytics;
pub mod transaction_service;
pub mod treasury_analytics;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by every service operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Input failed a field-level rule.
    Validation(ValidationError),
    /// Target record does not exist.
    NotFound { entity: &'static str, id: String },
    /// Another record already uses the normalised name.
    DuplicateName { entity: &'static str, name: String },
    /// Record is still referenced by other lists and cannot be removed.
    InUse {
        entity: &'static str,
        id: String,
        referenced_by: &'static str,
    },
    /// Payments cannot be registered against a draft invoice.
    DraftInvoice(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DuplicateName { entity, name } => {
                write!(f, "{entity} named `{name}` already exists")
            }
            Self::InUse {
                entity,
                id,
                referenced_by,
            } => write!(f, "{entity} {id} is referenced by {referenced_by}"),
            Self::DraftInvoice(id) => {
                write!(f, "cannot register payments on draft invoice {id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Inclusive date window shared by ledger and payment queries.
///
/// Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<chrono::NaiveDate>,
    pub end: Option<chrono::NaiveDate>,
}

impl DateRange {
    pub fn between(start: chrono::NaiveDate, end: chrono::NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Position of the record with `id`, or `NotFound`.
pub(crate) fn position_of<T: Record>(items: &[T], id: &str) -> ServiceResult<usize> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| ServiceError::NotFound {
            entity: T::ENTITY,
            id: id.to_string(),
        })
}

/// Rejects `name` when another record (other than `ignore_id`) has the same
/// normalised name.
pub(crate) fn ensure_unique_name<'a>(
    entity: &'static str,
    existing: impl IntoIterator<Item = (&'a str, &'a str)>,
    name: &str,
    ignore_id: Option<&str>,
) -> ServiceResult<()> {
    let normalized = normalize_name(name);
    let duplicate = existing
        .into_iter()
        .any(|(id, other)| Some(id) != ignore_id && normalize_name(other) == normalized);
    if duplicate {
        return Err(ServiceError::DuplicateName {
            entity,
            name: name.trim().to_string(),
        });
    }
    Ok(())
}

/// Caller-supplied id, else a freshly generated one.
pub(crate) fn assign_id<T: Record>(id: Option<String>) -> String {
    id.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| generate_id(T::ID_PREFIX))
}

/// `(created_at, updated_at)` for a new record; caller values win.
pub(crate) fn creation_stamps(created_at: Option<i64>, updated_at: Option<i64>) -> (i64, i64) {
    let created_at = created_at.unwrap_or_else(now_epoch_ms);
    (created_at, updated_at.unwrap_or(created_at))
}

#[cfg(test)]
mod tests {
    use super::{ensure_unique_name, DateRange, ServiceError};
    use chrono::NaiveDate;

    #[test]
    fn date_range_is_inclusive_and_open_ended() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        let range = DateRange::between(day(10), day(12));
        assert!(range.contains(day(10)));
        assert!(range.contains(day(12)));
        assert!(!range.contains(day(13)));
        assert!(DateRange::default().contains(day(1)));
        assert!(DateRange {
            start: Some(day(5)),
            end: None
        }
        .contains(day(31)));
    }

    #[test]
    fn unique_name_ignores_self_and_spacing() {
        let existing = [("cli-001", "Acme Corp"), ("cli-002", "Northwind")];

        let err = ensure_unique_name("Client", existing, "  acme   CORP", None).unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName { name, .. } if name == "acme   CORP"));

        ensure_unique_name("Client", existing, "Acme Corp", Some("cli-001")).unwrap();
    }
}
