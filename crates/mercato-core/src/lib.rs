//! # Mercato Core
//!
//! Pure business logic for the Mercato point-of-sale till. No I/O, no
//! network, no clocks beyond timestamping: everything here is deterministic
//! given its inputs, which is what makes the checkout and drawer arithmetic
//! testable without the external collaborators.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  mercato-till   (orchestration, shared state, operations)           │
//! │       │                                                             │
//! │       ├──► mercato-core   (this crate: cart, checkout, drawer)      │
//! │       │                                                             │
//! │       └──► mercato-client (commerce backend + hosted data store)    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//! - [`money`] - integer-cent amounts and lenient input coercion
//! - [`types`] - catalog, customer, payment, and settings types
//! - [`cart`] - line items and subtotal arithmetic
//! - [`checkout`] - discount, split payments, phase machine
//! - [`drawer`] - cash drawer sessions and reconciliation
//! - [`auth`] - role and permission checks
//! - [`account`] - customer charge accounts and statements
//! - [`report`] - daily sales rollups
//! - [`receipt`] - receipt data assembly
//! - [`validation`] - boundary input validation
//! - [`error`] - typed error hierarchy

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod drawer;
pub mod error;
pub mod money;
pub mod receipt;
pub mod report;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartTotals, LineItem};
pub use checkout::{CheckoutPhase, CheckoutPolicy, CheckoutSession, FinalizedSale, PaymentSummary};
pub use drawer::{CashDrawer, DrawerSession, DrawerStatus, DrawerTransaction, DrawerTransactionKind};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::{
    Category, Customer, CustomerType, Discount, PaymentEntry, PaymentMethod, Product, Settings,
    User, UserRole,
};
