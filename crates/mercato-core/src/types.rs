//! # Domain Types
//!
//! Core domain types used throughout Mercato POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │   Product     │   │   Customer    │   │ PaymentEntry  │         │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │         │
//! │  │  id           │   │  id           │   │  method       │         │
//! │  │  price        │   │  type         │   │  amount       │         │
//! │  │  stock        │   │  discount?    │   │               │         │
//! │  └───────────────┘   └───────────────┘   └───────────────┘         │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │   Discount    │   │ PaymentMethod │   │   UserRole    │         │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │         │
//! │  │  Percentage   │   │  Cash         │   │  Admin        │         │
//! │  │  (bps)        │   │  Card         │   │  Cashier      │         │
//! │  │  Fixed(Money) │   │  Mobile       │   │  Inventory    │         │
//! │  └───────────────┘   └───────────────┘   └───────────────┘         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products, categories, customers and settings are owned by the external
//! collaborators (commerce backend, hosted data store); the structs here are
//! the in-memory shape the till works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Catalog
// =============================================================================

/// A product available for sale, as read from the commerce catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier assigned by the catalog backend.
    pub id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Barcode (EAN-13, UPC-A, etc.), if labeled.
    pub barcode: Option<String>,

    /// Unit price.
    pub price: Money,

    /// Stock level reported by the backend.
    pub stock_quantity: i64,

    /// Category this product belongs to.
    pub category_id: String,

    /// Hosted image reference.
    pub image_url: Option<String>,

    pub description: Option<String>,

    /// Cost price for margin reporting.
    pub cost_price: Option<Money>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// Mobile wallet payment.
    Mobile,
}

impl PaymentMethod {
    /// All methods, in display order.
    pub const ALL: [PaymentMethod; 3] =
        [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Mobile];
}

// =============================================================================
// Discount
// =============================================================================

/// A single reduction applied to the cart subtotal.
///
/// Percentage discounts are carried in basis points (1 bps = 0.01%), so a
/// "10%" discount is 1000 and fractional percentages stay integral.
/// Values are conventionally 0..=10000 bps but not enforced; see
/// [`crate::checkout::CheckoutPolicy`] for the clamping flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    Percentage(u32),
    Fixed(Money),
}

impl Discount {
    /// Parses a discount from the till's free-form input field.
    ///
    /// Percentage input is a percent figure ("10", "2.5"); it is converted
    /// to basis points by parsing as a money amount (cents ≡ bps).
    /// Unparsable input coerces to a zero discount of the same kind.
    pub fn percentage_from_input(input: &str) -> Discount {
        let bps = Money::parse_lenient(input).cents().max(0) as u32;
        Discount::Percentage(bps)
    }

    /// Parses a fixed discount amount, coercing junk to zero.
    pub fn fixed_from_input(input: &str) -> Discount {
        Discount::Fixed(Money::parse_lenient(input))
    }
}

// =============================================================================
// Payment Entry
// =============================================================================

/// One recorded amount tendered by a given method toward the final amount.
///
/// Zero amounts are permitted and several entries may share a method; split
/// tenders are the normal case, not the exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    pub method: PaymentMethod,
    pub amount: Money,
}

impl PaymentEntry {
    pub fn new(method: PaymentMethod, amount: Money) -> Self {
        PaymentEntry { method, amount }
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Retail,
    Wholesale,
}

/// A customer record from the hosted data store.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,

    #[serde(rename = "type")]
    pub customer_type: CustomerType,

    /// Standing discount policy applied when this customer is selected.
    pub discount: Option<Discount>,

    /// Lifetime purchase total.
    pub total_purchases: Money,

    #[ts(as = "Option<String>")]
    pub last_visit: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Cashier,
    Inventory,
}

/// The signed-in operator, injected by the (external) authentication flow.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

// =============================================================================
// Settings
// =============================================================================
// Read-only display configuration from the hosted data store. The core
// treats these as opaque; they only feed receipt data and formatting.

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub vat: String,
    pub website: String,
    pub logo: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "Mercato POS".to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            vat: String::new(),
            website: String::new(),
            logo: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptSettings {
    pub show_logo: bool,
    pub show_vat: bool,
    pub show_address: bool,
    pub show_phone: bool,
    pub footer_text: String,
    pub receipt_copies: u8,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            show_logo: true,
            show_vat: true,
            show_address: true,
            show_phone: true,
            footer_text: "Thank you for shopping with us".to_string(),
            receipt_copies: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizationSettings {
    pub language: String,
    /// ISO 4217 currency code.
    pub currency: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub date_format: String,
    pub timezone: String,
}

impl Default for LocalizationSettings {
    fn default() -> Self {
        LocalizationSettings {
            language: "en".to_string(),
            currency: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            date_format: "YYYY-MM-DD".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

/// Aggregated store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub store: StoreSettings,
    pub receipt: ReceiptSettings,
    pub localization: LocalizationSettings,
}
