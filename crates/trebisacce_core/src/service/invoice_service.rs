//! Invoice use-case service.
//!
//! # Invariants
//! - Invoice totals are strictly positive on create and update.
//! - `invoice_snapshot` and `update_invoice_status` skip simulated latency;
//!   they are building blocks for payment reconciliation.

use super::{assign_id, creation_stamps, position_of, ServiceResult};
use crate::model::invoice::{Invoice, InvoicePatch, InvoiceStatus, NewInvoice};
use crate::model::{now_epoch_ms, require_id, Record};
use crate::repo::record_store::RecordStore;
use log::info;
use std::cmp::Ordering;

pub struct InvoiceService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> InvoiceService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists invoices by date descending, newest creation first on ties.
    pub fn list_invoices(&self) -> ServiceResult<Vec<Invoice>> {
        self.store.pause();
        let mut invoices = self.store.load::<Invoice>()?;
        invoices.sort_by(newest_first);
        Ok(invoices)
    }

    pub fn create_invoice(&self, new: NewInvoice) -> ServiceResult<Invoice> {
        self.store.pause();
        let mut invoices = self.store.load::<Invoice>()?;
        let (created_at, updated_at) = creation_stamps(new.created_at, new.updated_at);
        let invoice = Invoice {
            id: assign_id::<Invoice>(new.id),
            number: new.number,
            client_id: new.client_id,
            client_name: new.client_name,
            date: new.date,
            status: new.status,
            total: new.total,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        };
        invoice.validate()?;

        invoices.insert(0, invoice.clone());
        self.store.save(&invoices)?;
        info!(
            "event=invoice_create module=service status=ok id={} rows={}",
            invoice.id,
            invoices.len()
        );
        Ok(invoice)
    }

    /// Merges `patch` into the stored invoice.
    ///
    /// A status set here is overwritten by the next payment reconciliation.
    pub fn update_invoice(&self, id: &str, patch: InvoicePatch) -> ServiceResult<Invoice> {
        self.store.pause();
        let id = require_id(Invoice::ENTITY, id)?;
        let mut invoices = self.store.load::<Invoice>()?;
        let index = position_of(&invoices, id)?;

        let mut updated = invoices[index].clone();
        updated.apply(patch);
        updated.validate()?;

        invoices[index] = updated.clone();
        self.store.save(&invoices)?;
        info!("event=invoice_update module=service status=ok id={}", id);
        Ok(updated)
    }

    /// Current stored state of one invoice.
    pub fn invoice_snapshot(&self, id: &str) -> ServiceResult<Invoice> {
        let id = require_id(Invoice::ENTITY, id)?;
        let invoices = self.store.load::<Invoice>()?;
        let index = position_of(&invoices, id)?;
        Ok(invoices[index].clone())
    }

    pub fn update_invoice_status(&self, id: &str, status: InvoiceStatus) -> ServiceResult<Invoice> {
        let id = require_id(Invoice::ENTITY, id)?;
        let mut invoices = self.store.load::<Invoice>()?;
        let index = position_of(&invoices, id)?;

        let previous = invoices[index].status;
        let invoice = &mut invoices[index];
        invoice.status = status;
        invoice.updated_at = Some(now_epoch_ms());
        let updated = invoice.clone();

        self.store.save(&invoices)?;
        info!(
            "event=invoice_status module=service status=ok id={} from={:?} to={:?}",
            id, previous, status
        );
        Ok(updated)
    }

    /// Deletes one invoice. Payments pointing at it are left untouched.
    pub fn delete_invoice(&self, id: &str) -> ServiceResult<String> {
        self.store.pause();
        let id = require_id(Invoice::ENTITY, id)?;
        let mut invoices = self.store.load::<Invoice>()?;
        let index = position_of(&invoices, id)?;

        invoices.remove(index);
        self.store.save(&invoices)?;
        info!(
            "event=invoice_delete module=service status=ok id={} rows={}",
            id,
            invoices.len()
        );
        Ok(id.to_string())
    }
}

/// Date descending, then `created_at` descending (missing sorts last).
pub(crate) fn newest_first(a: &Invoice, b: &Invoice) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.unwrap_or(0).cmp(&a.created_at.unwrap_or(0)))
}
