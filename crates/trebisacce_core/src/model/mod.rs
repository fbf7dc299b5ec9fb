//! Business records persisted as flat JSON lists.
//!
//! # Responsibility
//! - Define one record type per persisted list plus its create/patch inputs.
//! - Own per-record validation rules and demo seed rows.
//!
//! # Invariants
//! - Every record is identified by a caller-visible string id.
//! - References between records are plain ids resolved by linear scan.
//! - Validation runs at the call site that mutates a list.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod account;
pub mod client;
pub mod decision;
pub mod invoice;
pub mod normalize;
pub mod payment;
pub mod product;
pub mod quote;
pub mod transaction;

/// A record type stored as one JSON array under a fixed key.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Storage key of the list holding this record type.
    const STORAGE_KEY: &'static str;
    /// Prefix of generated ids, e.g. `cli` in `cli-1737200000000-9f2a`.
    const ID_PREFIX: &'static str;
    /// Human-readable entity name used in errors.
    const ENTITY: &'static str;

    fn id(&self) -> &str;

    /// Demo rows written the first time the list is read.
    fn seed() -> Vec<Self>;
}

/// Validation failures raised before a list is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An operation was called with a blank id.
    IdRequired(&'static str),
    NameRequired,
    TitleRequired,
    InvalidEmail(String),
    AmountNotPositive(Decimal),
    TotalNotPositive(Decimal),
    NegativeValue { field: &'static str, value: Decimal },
    AmountTooLarge { field: &'static str, value: Decimal },
    AccountRequired,
    TransferAccountsRequired,
    TransferSameAccount(String),
    InvoiceIdRequired,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdRequired(entity) => write!(f, "{entity} id is required"),
            Self::NameRequired => write!(f, "name is required"),
            Self::TitleRequired => write!(f, "title is required"),
            Self::InvalidEmail(value) => write!(f, "invalid email `{value}`"),
            Self::AmountNotPositive(value) => {
                write!(f, "amount must be greater than 0, got {value}")
            }
            Self::TotalNotPositive(value) => {
                write!(f, "total must be greater than 0, got {value}")
            }
            Self::NegativeValue { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::AmountTooLarge { field, value } => {
                write!(f, "{field} must not exceed {}, got {value}", max_amount())
            }
            Self::AccountRequired => write!(f, "account is required"),
            Self::TransferAccountsRequired => {
                write!(f, "transfer requires source and destination accounts")
            }
            Self::TransferSameAccount(id) => {
                write!(f, "transfer accounts must differ, both are `{id}`")
            }
            Self::InvoiceIdRequired => write!(f, "invoice id is required"),
        }
    }
}

impl Error for ValidationError {}

const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

/// Largest money value a record may carry. Sums over stored lists stay
/// inside the `Decimal` range.
pub fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT_UNITS)
}

pub(crate) fn ensure_within_limit(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value > max_amount() {
        return Err(ValidationError::AmountTooLarge { field, value });
    }
    Ok(())
}

/// Builds an id of the shape `<prefix>-<epoch_ms>-<4 hex chars>`.
pub fn generate_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}-{}", now_epoch_ms(), &suffix[..4])
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Returns the trimmed id or `IdRequired` when it is blank.
pub(crate) fn require_id<'a>(entity: &'static str, id: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::IdRequired(entity));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::{ensure_within_limit, generate_id, max_amount, require_id, ValidationError};
    use rust_decimal::Decimal;

    #[test]
    fn generated_ids_carry_prefix_and_are_distinct() {
        let first = generate_id("cli");
        let second = generate_id("cli");
        assert!(first.starts_with("cli-"));
        assert_eq!(first.rsplit('-').next().unwrap().len(), 4);
        assert_ne!(first, second);
    }

    #[test]
    fn require_id_rejects_blank_ids() {
        assert_eq!(require_id("Client", " cli-001 ").unwrap(), "cli-001");
        assert_eq!(
            require_id("Client", "  ").unwrap_err(),
            ValidationError::IdRequired("Client")
        );
    }

    #[test]
    fn amounts_above_the_limit_are_rejected() {
        assert!(ensure_within_limit("amount", max_amount()).is_ok());
        let over = max_amount() + Decimal::ONE;
        assert_eq!(
            ensure_within_limit("amount", over).unwrap_err(),
            ValidationError::AmountTooLarge {
                field: "amount",
                value: over
            }
        );
    }
}
