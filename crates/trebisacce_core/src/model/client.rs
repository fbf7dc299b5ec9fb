//! Contact (client/supplier) record.

use super::normalize::is_email_valid;
use super::{Record, ValidationError};
use serde::{Deserialize, Serialize};

/// Commercial category of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClientKind {
    #[default]
    #[serde(rename = "empresa")]
    Company,
    #[serde(rename = "pyme")]
    SmallBusiness,
    #[serde(rename = "proveedor")]
    Supplier,
    #[serde(rename = "minorista")]
    Retailer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ClientKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// Input for `ClientService::create_client`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClient {
    /// Caller-supplied id; generated when `None`.
    pub id: Option<String>,
    pub name: String,
    pub kind: ClientKind,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub kind: Option<ClientKind>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub updated_at: Option<i64>,
}

impl Client {
    /// Checks field-level rules. Name uniqueness needs the whole list and is
    /// enforced by the service.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if let Some(email) = self.email.as_deref().filter(|value| !value.is_empty()) {
            if !is_email_valid(email) {
                return Err(ValidationError::InvalidEmail(email.to_string()));
            }
        }
        Ok(())
    }

    pub(crate) fn apply(&mut self, patch: ClientPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
    }
}

impl Record for Client {
    const STORAGE_KEY: &'static str = "trebisacce_clients_v1";
    const ID_PREFIX: &'static str = "cli";
    const ENTITY: &'static str = "Client";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        [
            ("cli-001", "Acme Corp", ClientKind::Company, "contact@acme.com", "+54 11 4321 0001"),
            ("cli-002", "Tech Solutions", ClientKind::SmallBusiness, "info@techsol.com", "+54 11 4321 0002"),
            ("cli-003", "Global Services", ClientKind::Company, "hello@global.com", "+54 11 4321 0003"),
            ("cli-004", "Northwind", ClientKind::SmallBusiness, "ventas@northwind.com", "+54 11 4321 0004"),
            ("cli-005", "Office Supplies Inc", ClientKind::Supplier, "sales@officesupplies.com", "+54 11 4321 0005"),
            ("cli-006", "Distribuidora La Plata", ClientKind::Retailer, "compras@dlp.com", "+54 11 4321 0006"),
        ]
        .into_iter()
        .map(|(id, name, kind, email, phone)| Client {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            created_at: None,
            updated_at: None,
        })
        .collect()
    }
}
