//! Catalog use-case service.
//!
//! # Invariants
//! - Product names are unique after `normalize_name`.
//! - Price and cost are never negative.

use super::{assign_id, ensure_unique_name, position_of, ServiceResult};
use crate::model::normalize::matches_search;
use crate::model::product::{NewProduct, Product, ProductKind, ProductPatch};
use crate::model::{now_epoch_ms, require_id, Record};
use crate::repo::record_store::RecordStore;
use log::info;

/// Filter for `list_products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListQuery {
    pub kind: Option<ProductKind>,
    /// Case-insensitive match over the product name.
    pub search: Option<String>,
    /// `Some(true)` keeps only active entries.
    pub active: Option<bool>,
}

pub struct ProductService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> ProductService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list_products(&self, query: &ProductListQuery) -> ServiceResult<Vec<Product>> {
        self.store.pause();
        Ok(self
            .store
            .load::<Product>()?
            .into_iter()
            .filter(|product| query.kind.map_or(true, |kind| product.kind == kind))
            .filter(|product| query.active.map_or(true, |active| product.active == active))
            .filter(|product| {
                query
                    .search
                    .as_deref()
                    .map_or(true, |needle| matches_search(needle, &[Some(product.name.as_str())]))
            })
            .collect())
    }

    pub fn create_product(&self, new: NewProduct) -> ServiceResult<Product> {
        self.store.pause();
        let mut products = self.store.load::<Product>()?;
        let now = now_epoch_ms();
        let product = Product {
            id: assign_id::<Product>(new.id),
            name: new.name.trim().to_string(),
            kind: new.kind,
            price: new.price,
            cost: new.cost,
            stock: new.stock,
            active: new.active,
            created_at: Some(now),
            updated_at: Some(now),
        };
        product.validate()?;
        ensure_unique_name(
            Product::ENTITY,
            products.iter().map(|p| (p.id.as_str(), p.name.as_str())),
            &product.name,
            None,
        )?;

        products.insert(0, product.clone());
        self.store.save(&products)?;
        info!(
            "event=product_create module=service status=ok id={} rows={}",
            product.id,
            products.len()
        );
        Ok(product)
    }

    pub fn update_product(&self, id: &str, patch: ProductPatch) -> ServiceResult<Product> {
        self.store.pause();
        let id = require_id(Product::ENTITY, id)?;
        let mut products = self.store.load::<Product>()?;
        let index = position_of(&products, id)?;

        let mut updated = products[index].clone();
        updated.apply(patch);
        updated.name = updated.name.trim().to_string();
        updated.updated_at = Some(now_epoch_ms());
        updated.validate()?;
        ensure_unique_name(
            Product::ENTITY,
            products.iter().map(|p| (p.id.as_str(), p.name.as_str())),
            &updated.name,
            Some(id),
        )?;

        products[index] = updated.clone();
        self.store.save(&products)?;
        info!("event=product_update module=service status=ok id={}", id);
        Ok(updated)
    }

    pub fn set_product_active(&self, id: &str, active: bool) -> ServiceResult<Product> {
        self.update_product(
            id,
            ProductPatch {
                active: Some(active),
                ..ProductPatch::default()
            },
        )
    }

    pub fn remove_product(&self, id: &str) -> ServiceResult<String> {
        self.store.pause();
        let id = require_id(Product::ENTITY, id)?;
        let mut products = self.store.load::<Product>()?;
        let index = position_of(&products, id)?;

        products.remove(index);
        self.store.save(&products)?;
        info!(
            "event=product_remove module=service status=ok id={} rows={}",
            id,
            products.len()
        );
        Ok(id.to_string())
    }
}
