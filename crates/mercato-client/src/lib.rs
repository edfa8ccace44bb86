//! # Mercato Client
//!
//! HTTP clients for the two external collaborators the till depends on,
//! plus the trait seams the till orchestrates against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  CommerceClient  ──►  commerce backend (catalog, orders)            │
//! │  StoreClient     ──►  hosted data store (customers, settings,       │
//! │                       drawer sessions, account ledgers)             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The till never holds a concrete client type; it holds `Arc<dyn …Api>`
//! so tests can substitute in-memory fakes.

pub mod api;
pub mod commerce;
pub mod config;
pub mod error;
pub mod store;

pub use api::{
    CatalogApi, OrderApi, OrderConfirmation, OrderDraft, PastOrder, PastOrderLine, PrintBridge,
    StoreApi,
};
pub use commerce::CommerceClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ConfigError};
pub use store::StoreClient;
