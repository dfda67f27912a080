//! Core data layer for the invoicebook freelancer invoicing tool.
//! Owns clients, invoices, their identifiers, and their persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod validation;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::client::{Client, ClientId, ClientPatch, NewClient};
pub use model::invoice::{Invoice, InvoiceId, InvoicePatch, InvoiceStatus, NewInvoice};
pub use model::{Record, RecordId};
pub use repo::record_store::{RecordStore, StoreOptions, UNKNOWN_CLIENT_NAME};
pub use repo::{StoreError, StoreResult};
pub use service::dashboard::{outstanding_amount, summarize, DashboardService, DashboardSummary};
pub use storage::{
    KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage, StorageError, StorageResult,
};
pub use validation::{validate_amount, validate_email, validate_required, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
