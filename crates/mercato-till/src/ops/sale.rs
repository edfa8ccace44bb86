//! Sale operations: the checkout flow from "charge" to printed receipt.
//!
//! ## Completion Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  complete_sale()                                                    │
//! │                                                                     │
//! │  1. authorize + validate on a checkout clone, build the order draft │
//! │  2. submit the order to the commerce backend                        │
//! │     └── failure: till state is untouched, cashier retries           │
//! │  3. commit: finalize checkout, record cash in the drawer, store     │
//! │     the sale, reset cart/customer/checkout for the next sale        │
//! │  4. best effort: persist drawer movements, update stock, print      │
//! │     └── failure here only logs; the sale is already done            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use mercato_client::api::OrderDraft;
use mercato_core::auth::Permission;
use mercato_core::checkout::{CheckoutSession, PaymentSummary};
use mercato_core::drawer::{DrawerTransaction, DrawerTransactionKind};
use mercato_core::money::Money;
use mercato_core::receipt::ReceiptData;
use mercato_core::report::CompletedSale;
use mercato_core::types::{Discount, PaymentEntry, PaymentMethod};

use crate::error::TillResult;
use crate::state::Till;

/// What completing a sale hands back to the frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOutcome {
    pub sale: CompletedSale,
    pub receipt: ReceiptData,
}

impl Till {
    /// Moves the checkout into payment capture.
    pub fn begin_checkout(&self) -> TillResult<()> {
        self.with_state_mut(|state| {
            let cart = state.cart.clone();
            state.checkout.begin(&cart)
        })
        .map_err(Into::into)
    }

    /// Abandons payment capture. The cart survives; payments and discount
    /// do not.
    pub fn cancel_checkout(&self) -> TillResult<()> {
        self.with_state_mut(|state| state.checkout.cancel())
            .map_err(Into::into)
    }

    /// Applies a percentage discount from the free-form input field.
    pub fn set_discount_percentage(&self, input: &str) -> TillResult<PaymentSummary> {
        self.set_discount(Some(Discount::percentage_from_input(input)))
    }

    /// Applies a fixed discount from the free-form input field.
    pub fn set_discount_fixed(&self, input: &str) -> TillResult<PaymentSummary> {
        self.set_discount(Some(Discount::fixed_from_input(input)))
    }

    pub fn clear_discount(&self) -> TillResult<PaymentSummary> {
        self.set_discount(None)
    }

    fn set_discount(&self, discount: Option<Discount>) -> TillResult<PaymentSummary> {
        self.with_state_mut(|state| -> TillResult<PaymentSummary> {
            state.checkout.set_discount(discount)?;
            Ok(state.checkout.summary(state.cart.subtotal()))
        })
    }

    /// Records a tendered amount. The amount is free-form input; junk
    /// coerces to a zero entry rather than an error.
    pub fn add_payment(&self, method: PaymentMethod, amount_input: &str) -> TillResult<PaymentSummary> {
        let amount = Money::parse_lenient(amount_input);

        self.with_state_mut(|state| -> TillResult<PaymentSummary> {
            state.checkout.add_payment(PaymentEntry::new(method, amount))?;
            Ok(state.checkout.summary(state.cart.subtotal()))
        })
    }

    /// Drops the payment entry at `index`; out-of-range is a no-op.
    pub fn remove_payment(&self, index: usize) -> TillResult<PaymentSummary> {
        self.with_state_mut(|state| -> TillResult<PaymentSummary> {
            state.checkout.remove_payment(index)?;
            Ok(state.checkout.summary(state.cart.subtotal()))
        })
    }

    /// Current amounts for the payment screen.
    pub fn payment_summary(&self) -> TillResult<PaymentSummary> {
        Ok(self.with_state(|state| state.checkout.summary(state.cart.subtotal())))
    }

    /// Finalizes the sale. See the module docs for the flow; the key
    /// property is that a rejected or failed order submission leaves the
    /// till exactly as it was.
    pub async fn complete_sale(&self) -> TillResult<SaleOutcome> {
        let operator = self.require_permission(Permission::CompleteSale)?;

        // step 1: validate and draft against a clone, commit nothing
        let draft = self.with_state_mut(|state| -> TillResult<OrderDraft> {
            let mut trial = state.checkout.clone();
            let figures = trial.complete(state.cart.subtotal())?;

            Ok(OrderDraft {
                receipt_number: state.next_receipt_number(),
                cashier_id: operator.id.clone(),
                customer_id: state.customer.as_ref().map(|c| c.id.clone()),
                lines: state.cart.items.clone(),
                figures,
            })
        })?;

        // step 2: the backend accepts the order or the whole operation stops
        let confirmation = self.orders.create_order(&draft).await?;

        // step 3: commit
        type Commit = (SaleOutcome, Vec<(String, DrawerTransaction)>, Vec<(String, i64)>);
        let (outcome, drawer_movements, stock_updates) =
            self.with_state_mut(|state| -> TillResult<Commit> {
                let figures = state.checkout.complete(state.cart.subtotal())?;
                let lines = state.cart.items.clone();

                let mut drawer_movements = Vec::new();
                if state.drawer.is_open() {
                    let session_id = state
                        .drawer
                        .session()
                        .map(|s| s.id.clone())
                        .unwrap_or_default();
                    for payment in &figures.payments {
                        if payment.method != PaymentMethod::Cash || payment.amount.is_zero() {
                            continue;
                        }
                        let recorded = state.drawer.record_transaction(
                            DrawerTransactionKind::Sale,
                            payment.amount,
                            None,
                            Some(confirmation.order_id.clone()),
                        )?;
                        drawer_movements.push((session_id.clone(), recorded));
                    }
                }

                let mut stock_updates = Vec::new();
                for line in &lines {
                    if let Some(product) =
                        state.products.iter_mut().find(|p| p.id == line.product_id)
                    {
                        product.stock_quantity -= line.quantity;
                        stock_updates.push((product.id.clone(), product.stock_quantity));
                    }
                }

                let sale = CompletedSale {
                    order_id: confirmation.order_id.clone(),
                    receipt_number: draft.receipt_number.clone(),
                    cashier_id: operator.id.clone(),
                    customer_id: draft.customer_id.clone(),
                    lines: lines.clone(),
                    figures: figures.clone(),
                    completed_at: Utc::now(),
                };
                state.completed_sales.push(sale.clone());

                let receipt = ReceiptData::assemble(
                    draft.receipt_number.clone(),
                    &state.settings,
                    operator.name.clone(),
                    state.customer.as_ref().map(|c| c.name.clone()),
                    lines,
                    &figures,
                );

                // ready for the next customer
                state.cart.clear();
                state.customer = None;
                state.checkout = CheckoutSession::new(self.policy);

                Ok(((SaleOutcome { sale, receipt }), drawer_movements, stock_updates))
            })?;

        info!(
            order_id = %outcome.sale.order_id,
            receipt = %outcome.sale.receipt_number,
            total = %outcome.sale.figures.final_amount,
            "sale completed"
        );

        // step 4: best-effort side work; the sale is already committed
        for (session_id, movement) in &drawer_movements {
            if let Err(err) = self.store.record_drawer_transaction(session_id, movement).await {
                warn!(error = %err, "failed to persist drawer movement");
            }
        }
        for (product_id, stock) in &stock_updates {
            if let Err(err) = self.catalog.update_stock(product_id, *stock).await {
                warn!(%product_id, error = %err, "failed to push stock level");
            }
        }
        if let Some(printer) = &self.printer {
            if let Err(err) = printer.print(&outcome.receipt).await {
                warn!(error = %err, "receipt print failed");
            }
        }

        Ok(outcome)
    }
}
