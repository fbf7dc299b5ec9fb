//! Sales overview built from the invoice and quote lists.

use super::invoice_service::newest_first;
use super::ServiceResult;
use crate::model::invoice::{Invoice, InvoiceStatus};
use crate::model::quote::Quote;
use crate::repo::record_store::RecordStore;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

const LATEST_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOverview {
    pub total_invoiced: Decimal,
    /// Invoices not yet paid, drafts included.
    pub pending_invoices: usize,
    /// Quotes still awaiting an answer (draft or sent).
    pub open_quotes: usize,
    pub invoice_count: usize,
    pub quote_count: usize,
    pub latest_invoices: Vec<Invoice>,
    pub latest_quotes: Vec<Quote>,
}

pub struct SalesAnalytics<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> SalesAnalytics<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn sales_overview(&self) -> ServiceResult<SalesOverview> {
        self.store.pause();
        let invoices = self.store.load::<Invoice>()?;
        let quotes = self.store.load::<Quote>()?;
        let overview = build_overview(invoices, quotes);
        debug!(
            "event=sales_overview module=service status=ok invoices={} quotes={}",
            overview.invoice_count, overview.quote_count
        );
        Ok(overview)
    }
}

pub fn build_overview(mut invoices: Vec<Invoice>, mut quotes: Vec<Quote>) -> SalesOverview {
    let total_invoiced: Decimal = invoices.iter().map(|invoice| invoice.total).sum();
    let pending_invoices = invoices
        .iter()
        .filter(|invoice| invoice.status != InvoiceStatus::Paid)
        .count();
    let open_quotes = quotes.iter().filter(|quote| quote.status.is_open()).count();
    let invoice_count = invoices.len();
    let quote_count = quotes.len();

    invoices.sort_by(newest_first);
    invoices.truncate(LATEST_LIMIT);
    quotes.sort_by(|a, b| b.date.cmp(&a.date));
    quotes.truncate(LATEST_LIMIT);

    SalesOverview {
        total_invoiced,
        pending_invoices,
        open_quotes,
        invoice_count,
        quote_count,
        latest_invoices: invoices,
        latest_quotes: quotes,
    }
}
