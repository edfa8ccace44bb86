//! # Cart
//!
//! The active cart: line items with frozen prices and quantity arithmetic.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  User Action              Operation              Cart Change        │
//! │  ───────────              ─────────              ───────────        │
//! │                                                                     │
//! │  Tap product ───────────► add_product() ───────► qty += 1 / append  │
//! │                                                                     │
//! │  Edit quantity ─────────► set_quantity() ──────► replace / remove   │
//! │                                                                     │
//! │  Tap remove ────────────► remove_item() ───────► delete line        │
//! │                                                                     │
//! │  Cancel / complete ─────► clear() ─────────────► empty cart         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding an existing product increments)
//! - Quantity is always > 0 (setting a line to 0 or below removes it)
//! - Subtotal is the sum of price × quantity, independent of line order

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// A product and quantity placed into the active cart.
///
/// The unit price is frozen when the line is created: a catalog price change
/// after that point does not move totals under the cashier.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product id in the catalog backend.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    /// Quantity in cart, always positive.
    pub quantity: i64,

    /// When this line was first added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a line item from a catalog product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds a product to the cart, or increments its quantity by one if a
    /// line with the same product id already exists. Infallible.
    pub fn add_product(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity += 1;
            return;
        }

        self.items.push(LineItem::from_product(product, 1));
    }

    /// Replaces the quantity of a line.
    ///
    /// A quantity of zero or below removes the line; no negative-quantity
    /// state is ever retained. Unknown product ids are a no-op.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Removes a line by product id; no-op if absent.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Pre-discount subtotal: Σ price × quantity. Zero for an empty cart.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|i| i.line_total()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart totals summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::product;

    #[test]
    fn test_add_product_appends_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add_product(&product("p1", 999));

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items[0].quantity, 1);
        assert_eq!(cart.subtotal().cents(), 999);
    }

    #[test]
    fn test_add_same_product_increments() {
        let mut cart = Cart::new();
        let p = product("p1", 999);

        cart.add_product(&p);
        cart.add_product(&p);
        cart.add_product(&p);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal().cents(), 2997);
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = Cart::new();
        cart.add_product(&product("p1", 500));
        cart.set_quantity("p1", 4);

        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.subtotal().cents(), 2000);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_product(&product("p1", 500));

        cart.set_quantity("p1", 0);
        assert!(cart.is_empty());

        // negative input also removes rather than retaining a bad state
        cart.add_product(&product("p2", 100));
        cart.set_quantity("p2", -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut cart = Cart::new();
        cart.add_product(&product("p1", 500));
        cart.remove_item("nope");

        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_subtotal_empty_cart_is_zero() {
        assert_eq!(Cart::new().subtotal(), Money::zero());
    }

    #[test]
    fn test_subtotal_is_order_independent() {
        let mut forward = Cart::new();
        forward.add_product(&product("a", 1000));
        forward.set_quantity("a", 2);
        forward.add_product(&product("b", 500));

        let mut reverse = Cart::new();
        reverse.add_product(&product("b", 500));
        reverse.add_product(&product("a", 1000));
        reverse.set_quantity("a", 2);

        assert_eq!(forward.subtotal().cents(), 2500);
        assert_eq!(forward.subtotal(), reverse.subtotal());
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut p = product("p1", 1000);
        cart.add_product(&p);

        // catalog price changes after the line exists
        p.price = Money::from_cents(9999);
        cart.add_product(&p);

        // the existing line keeps its frozen price
        assert_eq!(cart.subtotal().cents(), 2000);
    }
}
