//! # Collaborator Interfaces
//!
//! Trait seams for the external collaborators. The till orchestrates
//! against these traits; the HTTP clients in this crate implement them,
//! and tests substitute in-memory fakes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  mercato-till                                                       │
//! │      │                                                              │
//! │      ├── CatalogApi ──┐                                             │
//! │      ├── OrderApi  ───┤──► CommerceClient ──► commerce backend      │
//! │      │                                                              │
//! │      ├── StoreApi ────────► StoreClient ────► hosted data store     │
//! │      │                                                              │
//! │      └── PrintBridge ─────► (host-provided) ► receipt printer       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercato_core::account::AccountTransaction;
use mercato_core::cart::LineItem;
use mercato_core::checkout::FinalizedSale;
use mercato_core::drawer::{DrawerSession, DrawerTransaction};
use mercato_core::money::Money;
use mercato_core::receipt::ReceiptData;
use mercato_core::types::{Category, Customer, PaymentEntry, Product, Settings};

use crate::error::ClientResult;

/// A sale ready for submission to the commerce backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub receipt_number: String,
    pub cashier_id: String,
    pub customer_id: Option<String>,
    pub lines: Vec<LineItem>,
    pub figures: FinalizedSale,
}

/// The backend's acknowledgment of a submitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A previously submitted order, as read back from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastOrder {
    pub order_id: String,
    pub status: String,
    pub total: Money,
    pub lines: Vec<PastOrderLine>,
    pub payments: Vec<PaymentEntry>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastOrderLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub line_total: Money,
}

/// Product catalog reads and stock writes on the commerce backend.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn products(&self) -> ClientResult<Vec<Product>>;
    async fn categories(&self) -> ClientResult<Vec<Category>>;
    async fn update_stock(&self, product_id: &str, stock_quantity: i64) -> ClientResult<()>;
}

/// Order submission and history on the commerce backend.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, draft: &OrderDraft) -> ClientResult<OrderConfirmation>;
    async fn order(&self, order_id: &str) -> ClientResult<PastOrder>;
    async fn recent_orders(&self, limit: usize) -> ClientResult<Vec<PastOrder>>;
}

/// Customer, settings, and drawer persistence on the hosted data store.
#[async_trait]
pub trait StoreApi: Send + Sync {
    async fn customers(&self) -> ClientResult<Vec<Customer>>;
    async fn settings(&self) -> ClientResult<Settings>;

    /// Persists a drawer session snapshot (insert on open, update on close).
    async fn save_drawer_session(&self, session: &DrawerSession) -> ClientResult<()>;

    /// Persists one cash movement against a session.
    async fn record_drawer_transaction(
        &self,
        session_id: &str,
        transaction: &DrawerTransaction,
    ) -> ClientResult<()>;

    /// Account ledger entries for a customer, oldest first.
    async fn account_transactions(
        &self,
        customer_id: &str,
    ) -> ClientResult<Vec<AccountTransaction>>;
}

/// Host-provided bridge to the physical receipt printer.
#[async_trait]
pub trait PrintBridge: Send + Sync {
    async fn print(&self, receipt: &ReceiptData) -> ClientResult<()>;
}
