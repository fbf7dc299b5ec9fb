//! Catalog entry: a sellable service or stocked product.

use super::{ensure_within_limit, Record, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[default]
    Service,
    Product,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ProductKind,
    pub price: Decimal,
    #[serde(default)]
    pub cost: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub id: Option<String>,
    pub name: String,
    pub kind: ProductKind,
    pub price: Decimal,
    pub cost: Decimal,
    pub stock: u32,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub kind: Option<ProductKind>,
    pub price: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub stock: Option<u32>,
    pub active: Option<bool>,
}

impl Product {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        for (field, value) in [("price", self.price), ("cost", self.cost)] {
            if value < Decimal::ZERO {
                return Err(ValidationError::NegativeValue { field, value });
            }
            ensure_within_limit(field, value)?;
        }
        Ok(())
    }

    /// Gross margin per unit.
    pub fn margin(&self) -> Decimal {
        self.price - self.cost
    }

    pub(crate) fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
    }
}

impl Record for Product {
    const STORAGE_KEY: &'static str = "trebisacce_products_v1";
    const ID_PREFIX: &'static str = "prd";
    const ENTITY: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        [
            ("prd-001", "Servicio Consultoría Básica", ProductKind::Service, 450, 200, 0),
            ("prd-002", "Desarrollo Web Standard", ProductKind::Service, 2500, 1200, 0),
            ("prd-003", "Mantenimiento Mensual", ProductKind::Service, 180, 80, 0),
            ("prd-004", "Licencia Software Pro", ProductKind::Product, 89, 30, 50),
        ]
        .into_iter()
        .map(|(id, name, kind, price, cost, stock)| Product {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            price: Decimal::from(price),
            cost: Decimal::from(cost),
            stock,
            active: true,
            created_at: None,
            updated_at: None,
        })
        .collect()
    }
}
