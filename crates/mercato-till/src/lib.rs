//! # Mercato Till
//!
//! Orchestration layer for one point-of-sale till: shared in-memory state,
//! the operations the frontend calls, and the wiring between the pure core
//! and the external collaborators.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  frontend (host application)                                        │
//! │       │  calls operations, receives serialized results              │
//! │       ▼                                                             │
//! │  mercato-till   Till + ops (this crate)                             │
//! │       │                         │                                   │
//! │       ▼                         ▼                                   │
//! │  mercato-core            mercato-client                             │
//! │  cart / checkout /       commerce backend + hosted data store       │
//! │  drawer / reports        behind trait seams                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mercato_client::{ClientConfig, CommerceClient, StoreClient};
//! use mercato_core::checkout::CheckoutPolicy;
//! use mercato_till::Till;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! mercato_till::init_tracing();
//!
//! let config = ClientConfig::from_env()?;
//! let commerce = Arc::new(CommerceClient::new(&config)?);
//! let store = Arc::new(StoreClient::new(&config)?);
//!
//! let till = Till::new(commerce.clone(), commerce, store, CheckoutPolicy::default());
//! till.load_catalog().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ops;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ErrorCode, TillError, TillResult};
pub use ops::{CatalogSummary, SaleOutcome};
pub use state::Till;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// Filtering follows `RUST_LOG`; the default keeps the till chatty and the
/// HTTP stack quiet. Safe to call once at startup.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mercato_till=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
