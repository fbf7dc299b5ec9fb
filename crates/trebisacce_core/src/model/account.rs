//! Treasury account record (cash box, bank, wallet).

use super::{Record, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Cash,
    Bank,
    /// Mercado Pago wallet.
    #[serde(rename = "mp")]
    MercadoPago,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

fn default_currency() -> String {
    "ARS".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAccount {
    pub id: Option<String>,
    pub name: String,
    pub kind: AccountKind,
    /// Falls back to the configured default currency.
    pub currency: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub currency: Option<String>,
    pub updated_at: Option<i64>,
}

impl Account {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        Ok(())
    }

    pub(crate) fn apply(&mut self, patch: AccountPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
    }
}

impl Record for Account {
    const STORAGE_KEY: &'static str = "trebisacce_accounts_v1";
    const ID_PREFIX: &'static str = "acc";
    const ENTITY: &'static str = "Account";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        [
            ("acc-001", "Caja", AccountKind::Cash),
            ("acc-002", "Banco", AccountKind::Bank),
            ("acc-003", "Mercado Pago", AccountKind::MercadoPago),
        ]
        .into_iter()
        .map(|(id, name, kind)| Account {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            currency: default_currency(),
            created_at: None,
            updated_at: None,
        })
        .collect()
    }
}
