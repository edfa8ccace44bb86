//! # Checkout
//!
//! The checkout calculator for one sale: a single discount against the cart
//! subtotal, a list of partial payments toward the final amount, and the
//! remaining/change arithmetic between them.
//!
//! ## Phase Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │   ┌──────────┐  begin()   ┌─────────────────┐  complete()           │
//! │   │ Building │ ─────────► │ AwaitingPayment │ ─────────► Completed  │
//! │   └──────────┘            └─────────────────┘                       │
//! │        ▲                         │                                  │
//! │        └───────── cancel() ──────┘                                  │
//! │            (payments discarded, no side effects)                    │
//! │                                                                     │
//! │   No transition leaves Completed.                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Permissive Behaviors
//! Two behaviors are reproduced from the till this replaces and are gated
//! behind [`CheckoutPolicy`] rather than silently corrected:
//!
//! - a fixed discount larger than the subtotal produces a negative final
//!   amount (`clamp_discount` turns this off)
//! - a sale may complete while underpaid (`require_settled` turns this off)

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Discount, PaymentEntry};

/// Where a checkout currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// Items are being added; no payment capture yet.
    #[default]
    Building,
    /// Payment capture is in progress.
    AwaitingPayment,
    /// The sale has been finalized. Terminal.
    Completed,
}

/// Flags for the two documented ambiguities. Both default to the observed
/// permissive behavior; enable them only with product-level sign-off.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutPolicy {
    /// Clamp the discount amount into `[0, subtotal]` so the final amount
    /// can never go negative.
    pub clamp_discount: bool,

    /// Refuse completion while the remaining amount is positive (underpaid).
    pub require_settled: bool,
}

/// Everything the order-submission collaborator needs once a checkout
/// completes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedSale {
    pub subtotal: Money,
    pub discount: Option<Discount>,
    pub discount_amount: Money,
    pub final_amount: Money,
    pub payments: Vec<PaymentEntry>,
    pub total_paid: Money,
    pub change_due: Money,
}

/// Amounts displayed while capturing payments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub final_amount: Money,
    pub total_paid: Money,
    /// Negative when overpaid (change due), positive when underpaid.
    pub remaining: Money,
    pub change_due: Money,
}

/// The checkout state for one sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    phase: CheckoutPhase,
    policy: CheckoutPolicy,
    discount: Option<Discount>,
    payments: Vec<PaymentEntry>,
}

impl CheckoutSession {
    pub fn new(policy: CheckoutPolicy) -> Self {
        CheckoutSession {
            phase: CheckoutPhase::Building,
            policy,
            discount: None,
            payments: Vec::new(),
        }
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    pub fn discount(&self) -> Option<Discount> {
        self.discount
    }

    pub fn payments(&self) -> &[PaymentEntry] {
        &self.payments
    }

    /// Initiates payment capture. Refused on an empty cart or when capture
    /// has already begun or finished.
    pub fn begin(&mut self, cart: &Cart) -> CoreResult<()> {
        if self.phase != CheckoutPhase::Building {
            return Err(CoreError::InvalidCheckoutPhase { current: self.phase });
        }
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        self.phase = CheckoutPhase::AwaitingPayment;
        Ok(())
    }

    /// Abandons payment capture, returning to `Building` with no side
    /// effects: captured payment entries and the discount are discarded,
    /// the cart is untouched.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if self.phase != CheckoutPhase::AwaitingPayment {
            return Err(CoreError::InvalidCheckoutPhase { current: self.phase });
        }

        self.phase = CheckoutPhase::Building;
        self.payments.clear();
        self.discount = None;
        Ok(())
    }

    /// Sets or clears the discount. Allowed any time before completion
    /// (customer selection seeds it while still building).
    pub fn set_discount(&mut self, discount: Option<Discount>) -> CoreResult<()> {
        if self.phase == CheckoutPhase::Completed {
            return Err(CoreError::InvalidCheckoutPhase { current: self.phase });
        }

        self.discount = discount;
        Ok(())
    }

    /// The discount amount against a given subtotal.
    ///
    /// Percentage: `subtotal × value / 10000` (basis points). Fixed: the
    /// value itself. Without `clamp_discount` there is no clamping to
    /// `[0, subtotal]`, so an oversized fixed discount drives the final
    /// amount negative.
    pub fn discount_amount(&self, subtotal: Money) -> Money {
        let raw = match self.discount {
            None => Money::zero(),
            Some(Discount::Percentage(bps)) => subtotal.percent_of(bps),
            Some(Discount::Fixed(amount)) => amount,
        };

        if self.policy.clamp_discount {
            raw.max(Money::zero()).min(subtotal.max(Money::zero()))
        } else {
            raw
        }
    }

    /// `subtotal − discount_amount`.
    pub fn final_amount(&self, subtotal: Money) -> Money {
        subtotal - self.discount_amount(subtotal)
    }

    /// Appends a payment entry unconditionally. Zero amounts are recorded
    /// as entered; repeated methods are fine.
    pub fn add_payment(&mut self, entry: PaymentEntry) -> CoreResult<()> {
        if self.phase != CheckoutPhase::AwaitingPayment {
            return Err(CoreError::InvalidCheckoutPhase { current: self.phase });
        }

        self.payments.push(entry);
        Ok(())
    }

    /// Removes the payment entry at `index`; out-of-range is a no-op.
    pub fn remove_payment(&mut self, index: usize) -> CoreResult<()> {
        if self.phase != CheckoutPhase::AwaitingPayment {
            return Err(CoreError::InvalidCheckoutPhase { current: self.phase });
        }

        if index < self.payments.len() {
            self.payments.remove(index);
        }
        Ok(())
    }

    /// Sum of all recorded payment amounts.
    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// `final_amount − total_paid`. Positive means underpaid, negative
    /// means overpaid (change due).
    pub fn remaining(&self, subtotal: Money) -> Money {
        self.final_amount(subtotal) - self.total_paid()
    }

    /// Change owed to the customer, never negative.
    pub fn change_due(&self, subtotal: Money) -> Money {
        (self.total_paid() - self.final_amount(subtotal)).max(Money::zero())
    }

    /// All display amounts in one shot.
    pub fn summary(&self, subtotal: Money) -> PaymentSummary {
        PaymentSummary {
            subtotal,
            discount_amount: self.discount_amount(subtotal),
            final_amount: self.final_amount(subtotal),
            total_paid: self.total_paid(),
            remaining: self.remaining(subtotal),
            change_due: self.change_due(subtotal),
        }
    }

    /// Finalizes the checkout and returns the sale figures for order
    /// submission.
    ///
    /// Does not require `remaining == 0` unless `require_settled` is set;
    /// underpaid completion is the observed behavior. The caller submits
    /// the order and, only on success, clears the cart.
    pub fn complete(&mut self, subtotal: Money) -> CoreResult<FinalizedSale> {
        if self.phase != CheckoutPhase::AwaitingPayment {
            return Err(CoreError::InvalidCheckoutPhase { current: self.phase });
        }

        let remaining = self.remaining(subtotal);
        if self.policy.require_settled && remaining.is_positive() {
            return Err(CoreError::NotSettled {
                remaining_cents: remaining.cents(),
            });
        }

        self.phase = CheckoutPhase::Completed;

        Ok(FinalizedSale {
            subtotal,
            discount: self.discount,
            discount_amount: self.discount_amount(subtotal),
            final_amount: self.final_amount(subtotal),
            payments: self.payments.clone(),
            total_paid: self.total_paid(),
            change_due: self.change_due(subtotal),
        })
    }
}
