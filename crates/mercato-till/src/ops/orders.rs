//! Past-order operations: history and reload-into-cart.

use tracing::info;

use mercato_client::api::PastOrder;
use mercato_core::cart::{Cart, CartTotals};
use mercato_core::checkout::CheckoutPhase;
use mercato_core::error::CoreError;

use crate::error::TillResult;
use crate::state::Till;

impl Till {
    /// Recently submitted orders from the commerce backend.
    pub async fn recent_orders(&self, limit: usize) -> TillResult<Vec<PastOrder>> {
        self.require_operator()?;
        Ok(self.orders.recent_orders(limit).await?)
    }

    /// Rebuilds the active cart from a past order, for repeat purchases.
    ///
    /// Every line must resolve against the currently loaded catalog; a
    /// product that has since disappeared fails the whole reload. Prices
    /// are re-frozen at today's catalog price, not the historical one.
    pub async fn reload_order(&self, order_id: &str) -> TillResult<CartTotals> {
        self.require_operator()?;
        let past = self.orders.order(order_id).await?;

        let totals = self.with_state_mut(|state| -> Result<CartTotals, CoreError> {
            if state.checkout.phase() != CheckoutPhase::Building {
                return Err(CoreError::InvalidCheckoutPhase {
                    current: state.checkout.phase(),
                });
            }

            let mut cart = Cart::new();
            for line in &past.lines {
                let product = state
                    .products
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;
                cart.add_product(product);
                cart.set_quantity(&product.id, line.quantity);
            }

            state.cart = cart;
            Ok(CartTotals::from(&state.cart))
        })?;

        info!(order_id, lines = totals.line_count, "order reloaded into cart");
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorCode;
    use crate::testing::{fixture, user};
    use mercato_core::types::{PaymentMethod, UserRole};

    async fn completed_order(f: &crate::testing::Fixture) -> String {
        f.till.add_to_cart("a").unwrap();
        f.till.set_cart_quantity("a", 3).unwrap();
        f.till.add_to_cart("b").unwrap();
        f.till.begin_checkout().unwrap();
        f.till.add_payment(PaymentMethod::Cash, "35").unwrap();
        f.till.complete_sale().await.unwrap().sale.order_id
    }

    #[tokio::test]
    async fn test_reload_order_rebuilds_cart() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));
        f.till.load_catalog().await.unwrap();
        let order_id = completed_order(&f).await;
        assert!(f.till.cart().is_empty());

        let totals = f.till.reload_order(&order_id).await.unwrap();
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_quantity, 4);
        assert_eq!(totals.subtotal.cents(), 3500);
    }

    #[tokio::test]
    async fn test_reload_unknown_order() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));

        let err = f.till.reload_order("9999").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_reload_fails_on_vanished_product() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));
        f.till.load_catalog().await.unwrap();
        let order_id = completed_order(&f).await;

        // product "b" disappears from the loaded catalog
        f.till
            .with_state_mut(|state| state.products.retain(|p| p.id != "b"));

        let err = f.till.reload_order(&order_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains('b'));
        // the active cart was not half-replaced
        assert!(f.till.cart().is_empty());
    }

    #[tokio::test]
    async fn test_recent_orders() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));
        f.till.load_catalog().await.unwrap();
        completed_order(&f).await;

        let orders = f.till.recent_orders(10).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total.cents(), 3500);
    }
}
