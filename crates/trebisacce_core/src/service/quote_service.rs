//! Quote use-case service.

use super::{assign_id, position_of, ServiceResult};
use crate::model::quote::{NewQuote, Quote, QuotePatch};
use crate::model::{require_id, Record};
use crate::repo::record_store::RecordStore;
use log::info;

pub struct QuoteService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> QuoteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists quotes in stored order (newest first).
    pub fn list_quotes(&self) -> ServiceResult<Vec<Quote>> {
        self.store.pause();
        Ok(self.store.load::<Quote>()?)
    }

    pub fn create_quote(&self, new: NewQuote) -> ServiceResult<Quote> {
        self.store.pause();
        let mut quotes = self.store.load::<Quote>()?;
        let mut quote = Quote::from(new);
        quote.id = assign_id::<Quote>(Some(quote.id));

        quotes.insert(0, quote.clone());
        self.store.save(&quotes)?;
        info!(
            "event=quote_create module=service status=ok id={} rows={}",
            quote.id,
            quotes.len()
        );
        Ok(quote)
    }

    pub fn update_quote(&self, id: &str, patch: QuotePatch) -> ServiceResult<Quote> {
        self.store.pause();
        let id = require_id(Quote::ENTITY, id)?;
        let mut quotes = self.store.load::<Quote>()?;
        let index = position_of(&quotes, id)?;

        quotes[index].apply(patch);
        let updated = quotes[index].clone();
        self.store.save(&quotes)?;
        info!("event=quote_update module=service status=ok id={}", id);
        Ok(updated)
    }
}
