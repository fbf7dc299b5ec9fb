//! Core domain logic for the Trebisacce business console.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, LatencyConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{Record, ValidationError};
pub use repo::latency::Latency;
pub use repo::record_store::{RecordStore, SqliteRecordStore};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::AccountService;
pub use service::client_service::{ClientListQuery, ClientService};
pub use service::decision_service::{DecisionListQuery, DecisionService};
pub use service::invoice_service::InvoiceService;
pub use service::payment_service::{PaymentFilter, PaymentService};
pub use service::product_service::{ProductListQuery, ProductService};
pub use service::quote_service::QuoteService;
pub use service::sales_analytics::{SalesAnalytics, SalesOverview};
pub use service::transaction_service::{TransactionFilter, TransactionService};
pub use service::treasury_analytics::{TreasuryAnalytics, TreasuryOverview};
pub use service::{DateRange, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
