//! # Till State
//!
//! The shared in-memory state of one till, plus the handles to the
//! external collaborators.
//!
//! ## Locking Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  All mutable state lives behind one std::sync::Mutex.               │
//! │                                                                     │
//! │  Operations lock, read or mutate, and release before any await:     │
//! │  the guard never crosses an await point. Network calls work on      │
//! │  snapshots, and their results are committed under a fresh lock.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::Utc;

use mercato_client::api::{CatalogApi, OrderApi, PrintBridge, StoreApi};
use mercato_core::auth::{self, AuthError, Permission};
use mercato_core::cart::Cart;
use mercato_core::checkout::{CheckoutPolicy, CheckoutSession};
use mercato_core::drawer::CashDrawer;
use mercato_core::report::CompletedSale;
use mercato_core::types::{Category, Customer, Product, Settings, User};

/// Everything mutable on the till.
#[derive(Debug, Default)]
pub(crate) struct TillState {
    pub operator: Option<User>,
    pub customer: Option<Customer>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub settings: Settings,
    pub cart: Cart,
    pub checkout: CheckoutSession,
    pub drawer: CashDrawer,
    pub completed_sales: Vec<CompletedSale>,
    pub receipt_counter: u32,
}

impl TillState {
    /// Next receipt number: date, time, and a per-till counter.
    pub fn next_receipt_number(&mut self) -> String {
        self.receipt_counter += 1;
        format!(
            "{}-{:04}",
            Utc::now().format("%y%m%d-%H%M%S"),
            self.receipt_counter
        )
    }
}

/// One till: shared state plus collaborator handles.
///
/// Cloning is cheap and every clone works on the same state, which is how
/// the host application hands the till to multiple UI event handlers.
#[derive(Clone)]
pub struct Till {
    state: Arc<Mutex<TillState>>,
    pub(crate) catalog: Arc<dyn CatalogApi>,
    pub(crate) orders: Arc<dyn OrderApi>,
    pub(crate) store: Arc<dyn StoreApi>,
    pub(crate) printer: Option<Arc<dyn PrintBridge>>,
    pub(crate) policy: CheckoutPolicy,
}

impl Till {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        orders: Arc<dyn OrderApi>,
        store: Arc<dyn StoreApi>,
        policy: CheckoutPolicy,
    ) -> Self {
        Till {
            state: Arc::new(Mutex::new(TillState {
                checkout: CheckoutSession::new(policy),
                ..TillState::default()
            })),
            catalog,
            orders,
            store,
            printer: None,
            policy,
        }
    }

    /// Attaches the receipt printer bridge.
    pub fn with_printer(mut self, printer: Arc<dyn PrintBridge>) -> Self {
        self.printer = Some(printer);
        self
    }

    /// Runs a closure with read access to the state.
    pub(crate) fn with_state<T>(&self, f: impl FnOnce(&TillState) -> T) -> T {
        let guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    /// Runs a closure with write access to the state.
    pub(crate) fn with_state_mut<T>(&self, f: impl FnOnce(&mut TillState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Signs an operator in, replacing any previous one.
    pub fn sign_in(&self, user: User) {
        self.with_state_mut(|state| state.operator = Some(user));
    }

    /// Signs the operator out. Till state (cart, drawer) is kept; a shift
    /// change mid-day does not lose the open drawer.
    pub fn sign_out(&self) {
        self.with_state_mut(|state| state.operator = None);
    }

    pub fn operator(&self) -> Option<User> {
        self.with_state(|state| state.operator.clone())
    }

    /// The signed-in operator, or a typed rejection.
    pub(crate) fn require_operator(&self) -> Result<User, AuthError> {
        self.operator().ok_or(AuthError::NotSignedIn)
    }

    /// The signed-in operator holding a permission, or a typed rejection.
    pub(crate) fn require_permission(&self, permission: Permission) -> Result<User, AuthError> {
        let user = self.require_operator()?;
        auth::require(&user, permission)?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_till, user};
    use mercato_core::types::UserRole;

    #[test]
    fn test_sign_in_and_out() {
        let till = test_till();
        assert!(till.operator().is_none());
        assert!(till.require_operator().is_err());

        till.sign_in(user(UserRole::Cashier));
        assert_eq!(till.operator().map(|u| u.role), Some(UserRole::Cashier));

        till.sign_out();
        assert!(till.operator().is_none());
    }

    #[test]
    fn test_require_permission() {
        let till = test_till();
        till.sign_in(user(UserRole::Inventory));

        assert!(till.require_permission(Permission::ManageProducts).is_ok());
        assert!(till.require_permission(Permission::CompleteSale).is_err());
    }

    #[test]
    fn test_receipt_numbers_increment() {
        let till = test_till();
        let (first, second) = till.with_state_mut(|state| {
            (state.next_receipt_number(), state.next_receipt_number())
        });

        assert!(first.ends_with("-0001"));
        assert!(second.ends_with("-0002"));
    }

    #[test]
    fn test_clones_share_state() {
        let till = test_till();
        let clone = till.clone();

        till.sign_in(user(UserRole::Admin));
        assert!(clone.operator().is_some());
    }
}
