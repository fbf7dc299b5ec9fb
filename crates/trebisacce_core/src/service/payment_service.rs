//! Payment use-case service and invoice reconciliation.
//!
//! # Responsibility
//! - CRUD over payments registered against invoices.
//! - Re-derive invoice status from accumulated payments after every change.
//! - Report paid amounts, outstanding balances and per-method totals.
//!
//! # Invariants
//! - Payments are only accepted for existing, non-draft invoices.
//! - After any payment mutation every affected invoice is reconciled:
//!   draft stays draft, `paid >= total > 0` is paid, anything else issued.
//! - Reconciliation silently skips invoices that no longer exist.

use super::invoice_service::InvoiceService;
use super::{assign_id, creation_stamps, position_of, DateRange, ServiceError, ServiceResult};
use crate::model::invoice::{Invoice, InvoiceStatus};
use crate::model::payment::{NewPayment, Payment, PaymentMethod, PaymentPatch};
use crate::model::{now_epoch_ms, require_id, Record, ValidationError};
use crate::repo::record_store::RecordStore;
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Payment query options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub invoice_id: Option<String>,
    pub range: DateRange,
}

/// Collected and outstanding amounts of one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePaymentSummary {
    pub paid_amount: Decimal,
    /// `max(total - paid, 0)`; overpayments do not go negative.
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodTotal {
    pub method: PaymentMethod,
    pub value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsSummary {
    pub total: Decimal,
    pub by_method: Vec<MethodTotal>,
}

pub struct PaymentService<S: RecordStore + Clone> {
    store: S,
    invoices: InvoiceService<S>,
}

impl<S: RecordStore + Clone> PaymentService<S> {
    pub fn new(store: S) -> Self {
        Self {
            invoices: InvoiceService::new(store.clone()),
            store,
        }
    }

    /// Lists payments by date descending.
    pub fn list_payments(&self, filter: &PaymentFilter) -> ServiceResult<Vec<Payment>> {
        self.store.pause();
        let mut payments: Vec<Payment> = self
            .store
            .load::<Payment>()?
            .into_iter()
            .filter(|payment| {
                filter
                    .invoice_id
                    .as_deref()
                    .map_or(true, |invoice_id| payment.invoice_id == invoice_id)
            })
            .filter(|payment| filter.range.contains(payment.date))
            .collect();
        payments.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(payments)
    }

    pub fn payments_by_invoice(&self, invoice_id: &str) -> ServiceResult<Vec<Payment>> {
        self.list_payments(&PaymentFilter {
            invoice_id: Some(invoice_id.to_string()),
            ..PaymentFilter::default()
        })
    }

    pub fn paid_amount(&self, invoice_id: &str) -> ServiceResult<Decimal> {
        self.store.pause();
        let invoice_id = invoice_id.trim();
        if invoice_id.is_empty() {
            return Err(ValidationError::InvoiceIdRequired.into());
        }
        let payments = self.store.load::<Payment>()?;
        Ok(paid_amount_in(&payments, invoice_id))
    }

    /// Paid amount and outstanding balance per existing invoice.
    ///
    /// Blank or unknown ids are skipped.
    pub fn invoice_payment_summaries(
        &self,
        invoice_ids: &[String],
    ) -> ServiceResult<BTreeMap<String, InvoicePaymentSummary>> {
        self.store.pause();
        let payments = self.store.load::<Payment>()?;
        let invoices = self.store.load::<Invoice>()?;

        let mut summaries = BTreeMap::new();
        for invoice_id in invoice_ids.iter().filter(|id| !id.trim().is_empty()) {
            let Some(invoice) = invoices.iter().find(|invoice| &invoice.id == invoice_id) else {
                continue;
            };
            let paid_amount = paid_amount_in(&payments, invoice_id);
            summaries.insert(
                invoice_id.clone(),
                InvoicePaymentSummary {
                    paid_amount,
                    balance: (invoice.total - paid_amount).max(Decimal::ZERO),
                },
            );
        }
        Ok(summaries)
    }

    /// Total collected and per-method breakdown within `range`.
    pub fn payments_summary(&self, range: DateRange) -> ServiceResult<PaymentsSummary> {
        self.store.pause();
        let payments = self.store.load::<Payment>()?;
        Ok(summarize_payments(
            payments.iter().filter(|payment| range.contains(payment.date)),
        ))
    }

    pub fn create_payment(&self, new: NewPayment) -> ServiceResult<Payment> {
        self.store.pause();
        let mut payments = self.store.load::<Payment>()?;
        let (created_at, updated_at) = creation_stamps(new.created_at, new.updated_at);
        let payment = Payment {
            id: assign_id::<Payment>(new.id),
            invoice_id: new.invoice_id.trim().to_string(),
            date: new.date,
            amount: new.amount,
            method: new.method,
            reference: new.reference,
            notes: new.notes,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        };
        self.ensure_payable(&payment.invoice_id)?;
        payment.validate()?;

        payments.insert(0, payment.clone());
        self.store.save(&payments)?;
        info!(
            "event=payment_create module=service status=ok id={} invoice_id={} rows={}",
            payment.id,
            payment.invoice_id,
            payments.len()
        );
        self.reconcile(&payment.invoice_id, &payments)?;
        Ok(payment)
    }

    /// Merges `patch`; when the payment moves to another invoice both the old
    /// and the new invoice are reconciled.
    pub fn update_payment(&self, id: &str, patch: PaymentPatch) -> ServiceResult<Payment> {
        self.store.pause();
        let id = require_id(Payment::ENTITY, id)?;
        let mut payments = self.store.load::<Payment>()?;
        let index = position_of(&payments, id)?;

        let previous_invoice_id = payments[index].invoice_id.clone();
        let mut next = payments[index].clone();
        let updated_at = patch.updated_at.unwrap_or_else(now_epoch_ms);
        next.apply(patch);
        next.updated_at = Some(updated_at);
        self.ensure_payable(&next.invoice_id)?;
        next.validate()?;

        payments[index] = next.clone();
        self.store.save(&payments)?;
        info!(
            "event=payment_update module=service status=ok id={} invoice_id={}",
            id, next.invoice_id
        );

        self.reconcile(&previous_invoice_id, &payments)?;
        if next.invoice_id != previous_invoice_id {
            self.reconcile(&next.invoice_id, &payments)?;
        }
        Ok(next)
    }

    /// Removes one payment and reconciles its invoice. Returns the removed id.
    pub fn remove_payment(&self, id: &str) -> ServiceResult<String> {
        self.store.pause();
        let id = require_id(Payment::ENTITY, id)?;
        let mut payments = self.store.load::<Payment>()?;
        let index = position_of(&payments, id)?;

        let removed = payments.remove(index);
        self.store.save(&payments)?;
        info!(
            "event=payment_remove module=service status=ok id={} invoice_id={} rows={}",
            id,
            removed.invoice_id,
            payments.len()
        );
        self.reconcile(&removed.invoice_id, &payments)?;
        Ok(id.to_string())
    }

    fn ensure_payable(&self, invoice_id: &str) -> ServiceResult<Invoice> {
        if invoice_id.trim().is_empty() {
            return Err(ValidationError::InvoiceIdRequired.into());
        }
        let invoice = self.invoices.invoice_snapshot(invoice_id)?;
        if invoice.status == InvoiceStatus::Draft {
            return Err(ServiceError::DraftInvoice(invoice.id));
        }
        Ok(invoice)
    }

    /// Recomputes and stores the status of `invoice_id` from `payments`.
    ///
    /// Returns `None` when the invoice no longer exists.
    fn reconcile(
        &self,
        invoice_id: &str,
        payments: &[Payment],
    ) -> ServiceResult<Option<InvoiceStatus>> {
        let invoice = match self.invoices.invoice_snapshot(invoice_id) {
            Ok(invoice) => invoice,
            Err(ServiceError::NotFound { .. } | ServiceError::Validation(_)) => {
                debug!(
                    "event=invoice_reconcile module=service status=skipped invoice_id={}",
                    invoice_id
                );
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let paid = paid_amount_in(payments, invoice_id);
        let status = next_invoice_status(&invoice, paid);
        self.invoices.update_invoice_status(invoice_id, status)?;
        Ok(Some(status))
    }
}

/// Sum of payment amounts registered against `invoice_id`.
pub fn paid_amount_in(payments: &[Payment], invoice_id: &str) -> Decimal {
    payments
        .iter()
        .filter(|payment| payment.invoice_id == invoice_id)
        .map(|payment| payment.amount)
        .sum()
}

/// Status an invoice should have once `paid` has been collected.
pub fn next_invoice_status(invoice: &Invoice, paid: Decimal) -> InvoiceStatus {
    if invoice.status == InvoiceStatus::Draft {
        return InvoiceStatus::Draft;
    }
    if invoice.total > Decimal::ZERO && paid >= invoice.total {
        InvoiceStatus::Paid
    } else {
        InvoiceStatus::Issued
    }
}

pub fn summarize_payments<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> PaymentsSummary {
    let mut total = Decimal::ZERO;
    let mut by_method: BTreeMap<PaymentMethod, Decimal> = BTreeMap::new();
    for payment in payments {
        total += payment.amount;
        *by_method.entry(payment.method).or_default() += payment.amount;
    }
    PaymentsSummary {
        total,
        by_method: by_method
            .into_iter()
            .map(|(method, value)| MethodTotal { method, value })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{next_invoice_status, paid_amount_in, summarize_payments};
    use crate::model::invoice::{Invoice, InvoiceStatus};
    use crate::model::payment::{Payment, PaymentMethod};
    use crate::model::Record;
    use rust_decimal::Decimal;

    fn invoice(status: InvoiceStatus, total: i64) -> Invoice {
        let mut invoice = Invoice::seed().remove(0);
        invoice.status = status;
        invoice.total = Decimal::from(total);
        invoice
    }

    #[test]
    fn status_rules() {
        let issued = invoice(InvoiceStatus::Issued, 100);
        assert_eq!(next_invoice_status(&issued, Decimal::from(100)), InvoiceStatus::Paid);
        assert_eq!(next_invoice_status(&issued, Decimal::from(150)), InvoiceStatus::Paid);
        assert_eq!(next_invoice_status(&issued, Decimal::from(99)), InvoiceStatus::Issued);
        assert_eq!(next_invoice_status(&issued, Decimal::ZERO), InvoiceStatus::Issued);

        let paid = invoice(InvoiceStatus::Paid, 100);
        assert_eq!(next_invoice_status(&paid, Decimal::from(20)), InvoiceStatus::Issued);

        let draft = invoice(InvoiceStatus::Draft, 100);
        assert_eq!(next_invoice_status(&draft, Decimal::from(500)), InvoiceStatus::Draft);

        let zero_total = invoice(InvoiceStatus::Issued, 0);
        assert_eq!(next_invoice_status(&zero_total, Decimal::from(5)), InvoiceStatus::Issued);
    }

    #[test]
    fn seed_payments_aggregate_per_invoice_and_method() {
        let payments = Payment::seed();
        assert_eq!(paid_amount_in(&payments, "inv-001"), Decimal::from(2100));
        assert_eq!(paid_amount_in(&payments, "inv-002"), Decimal::from(1300));
        assert_eq!(paid_amount_in(&payments, "inv-003"), Decimal::ZERO);

        let summary = summarize_payments(&payments);
        assert_eq!(summary.total, Decimal::from(4380));
        let transfer = summary
            .by_method
            .iter()
            .find(|entry| entry.method == PaymentMethod::Transfer)
            .unwrap();
        assert_eq!(transfer.value, Decimal::from(2180));
        assert_eq!(summary.by_method.len(), 4);
    }
}
