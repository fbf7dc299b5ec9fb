//! Contact use-case service.
//!
//! # Responsibility
//! - Create, update, list and remove contacts.
//! - Resolve contacts by normalised name for sales documents.
//!
//! # Invariants
//! - Contact names are unique after `normalize_name`.
//! - A contact referenced by an invoice or quote cannot be removed.

use super::{
    assign_id, creation_stamps, ensure_unique_name, position_of, ServiceError, ServiceResult,
};
use crate::model::client::{Client, ClientKind, ClientPatch, NewClient};
use crate::model::invoice::Invoice;
use crate::model::normalize::{matches_search, normalize_name};
use crate::model::quote::Quote;
use crate::model::{now_epoch_ms, require_id, Record, ValidationError};
use crate::repo::record_store::RecordStore;
use log::info;

/// Filter for `list_clients`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientListQuery {
    /// Case-insensitive match over name, email and phone.
    pub search: Option<String>,
    pub kind: Option<ClientKind>,
}

pub struct ClientService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> ClientService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists contacts in stored order (newest first).
    pub fn list_clients(&self, query: &ClientListQuery) -> ServiceResult<Vec<Client>> {
        self.store.pause();
        let clients = self.store.load::<Client>()?;
        Ok(clients
            .into_iter()
            .filter(|client| query.kind.map_or(true, |kind| client.kind == kind))
            .filter(|client| match query.search.as_deref() {
                Some(needle) => matches_search(
                    needle,
                    &[
                        Some(client.name.as_str()),
                        client.email.as_deref(),
                        client.phone.as_deref(),
                    ],
                ),
                None => true,
            })
            .collect())
    }

    pub fn get_client_by_id(&self, id: &str) -> ServiceResult<Option<Client>> {
        let id = require_id(Client::ENTITY, id)?;
        let clients = self.store.load::<Client>()?;
        Ok(clients.into_iter().find(|client| client.id == id))
    }

    /// Returns the only contact whose normalised name matches; `None` when
    /// there is no match or the match is ambiguous.
    pub fn find_client_by_name(&self, name: &str) -> ServiceResult<Option<Client>> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return Ok(None);
        }
        let clients = self.store.load::<Client>()?;
        let mut matches = clients
            .into_iter()
            .filter(|client| normalize_name(&client.name) == normalized);
        match (matches.next(), matches.next()) {
            (Some(client), None) => Ok(Some(client)),
            _ => Ok(None),
        }
    }

    /// Returns the first contact matching `name`, creating a company contact
    /// when none exists.
    pub fn get_or_create_client_by_name(&self, name: &str) -> ServiceResult<Client> {
        self.store.pause();
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return Err(ValidationError::NameRequired.into());
        }

        let mut clients = self.store.load::<Client>()?;
        if let Some(existing) = clients
            .iter()
            .find(|client| normalize_name(&client.name) == normalized)
        {
            return Ok(existing.clone());
        }

        let now = now_epoch_ms();
        let client = Client {
            id: assign_id::<Client>(None),
            name: name.trim().to_string(),
            kind: ClientKind::Company,
            email: None,
            phone: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        clients.insert(0, client.clone());
        self.store.save(&clients)?;
        info!(
            "event=client_create module=service status=ok source=name_lookup id={} rows={}",
            client.id,
            clients.len()
        );
        Ok(client)
    }

    pub fn create_client(&self, new: NewClient) -> ServiceResult<Client> {
        self.store.pause();
        let mut clients = self.store.load::<Client>()?;
        let (created_at, updated_at) = creation_stamps(new.created_at, new.updated_at);
        let client = Client {
            id: assign_id::<Client>(new.id),
            name: new.name,
            kind: new.kind,
            email: new.email,
            phone: new.phone,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        };
        client.validate()?;
        ensure_unique_name(
            Client::ENTITY,
            clients.iter().map(|c| (c.id.as_str(), c.name.as_str())),
            &client.name,
            None,
        )?;

        clients.insert(0, client.clone());
        self.store.save(&clients)?;
        info!(
            "event=client_create module=service status=ok id={} rows={}",
            client.id,
            clients.len()
        );
        Ok(client)
    }

    pub fn update_client(&self, id: &str, patch: ClientPatch) -> ServiceResult<Client> {
        self.store.pause();
        let id = require_id(Client::ENTITY, id)?;
        let mut clients = self.store.load::<Client>()?;
        let index = position_of(&clients, id)?;

        let mut updated = clients[index].clone();
        let updated_at = patch.updated_at.unwrap_or_else(now_epoch_ms);
        updated.apply(patch);
        updated.updated_at = Some(updated_at);
        updated.validate()?;
        ensure_unique_name(
            Client::ENTITY,
            clients.iter().map(|c| (c.id.as_str(), c.name.as_str())),
            &updated.name,
            Some(id),
        )?;

        clients[index] = updated.clone();
        self.store.save(&clients)?;
        info!("event=client_update module=service status=ok id={}", id);
        Ok(updated)
    }

    /// Removes a contact that no invoice or quote points to.
    ///
    /// Returns the removed id.
    pub fn remove_client(&self, id: &str) -> ServiceResult<String> {
        self.store.pause();
        let id = require_id(Client::ENTITY, id)?;
        let mut clients = self.store.load::<Client>()?;
        let index = position_of(&clients, id)?;

        if self.has_references(&clients[index])? {
            return Err(ServiceError::InUse {
                entity: Client::ENTITY,
                id: id.to_string(),
                referenced_by: "invoices or quotes",
            });
        }

        clients.remove(index);
        self.store.save(&clients)?;
        info!(
            "event=client_remove module=service status=ok id={} rows={}",
            id,
            clients.len()
        );
        Ok(id.to_string())
    }

    fn has_references(&self, client: &Client) -> ServiceResult<bool> {
        let normalized = normalize_name(&client.name);
        let invoices = self.store.load_existing::<Invoice>()?;
        if invoices
            .iter()
            .any(|invoice| invoice.references_client(&client.id, &normalized))
        {
            return Ok(true);
        }
        let quotes = self.store.load_existing::<Quote>()?;
        Ok(quotes
            .iter()
            .any(|quote| quote.references_client(&client.id, &normalized)))
    }
}
