//! Cart operations. All of these require the checkout to still be in the
//! `Building` phase; once payment capture starts the cart is frozen.

use mercato_core::cart::{Cart, CartTotals};
use mercato_core::checkout::CheckoutPhase;
use mercato_core::error::CoreError;
use mercato_core::validation;

use crate::error::TillResult;
use crate::state::Till;

impl Till {
    fn with_building_cart<T>(
        &self,
        f: impl FnOnce(&mut Cart) -> Result<T, CoreError>,
    ) -> TillResult<T> {
        self.with_state_mut(|state| {
            if state.checkout.phase() != CheckoutPhase::Building {
                return Err(CoreError::InvalidCheckoutPhase {
                    current: state.checkout.phase(),
                });
            }
            f(&mut state.cart)
        })
        .map_err(Into::into)
    }

    /// Adds one unit of a product to the cart.
    ///
    /// Catalog data comes from the commerce backend; a product carrying a
    /// negative price is rejected here.
    pub fn add_to_cart(&self, product_id: &str) -> TillResult<CartTotals> {
        let product = self
            .with_state(|state| state.products.iter().find(|p| p.id == product_id).cloned())
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        self.with_building_cart(|cart| {
            validation::validate_price_cents(product.price.cents())?;

            if cart.line_count() >= validation::MAX_CART_LINES
                && !cart.items.iter().any(|i| i.product_id == product.id)
            {
                return Err(CoreError::Validation(
                    mercato_core::error::ValidationError::OutOfRange {
                        field: "cart lines".to_string(),
                        min: 0,
                        max: validation::MAX_CART_LINES as i64,
                    },
                ));
            }

            cart.add_product(&product);
            Ok(CartTotals::from(&*cart))
        })
    }

    /// Sets a line's quantity. Zero or below removes the line.
    pub fn set_cart_quantity(&self, product_id: &str, quantity: i64) -> TillResult<CartTotals> {
        self.with_building_cart(|cart| {
            if quantity > 0 {
                validation::validate_quantity(quantity)?;
            }
            cart.set_quantity(product_id, quantity);
            Ok(CartTotals::from(&*cart))
        })
    }

    /// Removes a line entirely.
    pub fn remove_from_cart(&self, product_id: &str) -> TillResult<CartTotals> {
        self.with_building_cart(|cart| {
            cart.remove_item(product_id);
            Ok(CartTotals::from(&*cart))
        })
    }

    /// Empties the cart.
    pub fn clear_cart(&self) -> TillResult<CartTotals> {
        self.with_building_cart(|cart| {
            cart.clear();
            Ok(CartTotals::from(&*cart))
        })
    }

    pub fn cart(&self) -> Cart {
        self.with_state(|state| state.cart.clone())
    }

    pub fn cart_totals(&self) -> CartTotals {
        self.with_state(|state| CartTotals::from(&state.cart))
    }
}
