//! Customer operations: selection (which seeds the standing discount) and
//! account statements.

use tracing::debug;

use mercato_core::account::AccountStatement;
use mercato_core::error::CoreError;
use mercato_core::money::Money;
use mercato_core::types::Customer;
use mercato_core::validation;

use crate::error::{ErrorCode, TillError, TillResult};
use crate::state::Till;

impl Till {
    /// All customers from the hosted data store.
    pub async fn customers(&self) -> TillResult<Vec<Customer>> {
        Ok(self.store.customers().await?)
    }

    /// Attaches a customer to the sale in progress.
    ///
    /// A customer with a standing discount seeds the checkout discount;
    /// the cashier can still override it afterwards. A customer without
    /// one leaves the current discount alone.
    pub async fn select_customer(&self, customer_id: &str) -> TillResult<Customer> {
        validation::validate_uuid(customer_id).map_err(CoreError::from)?;

        let customers = self.store.customers().await?;
        let customer = customers
            .into_iter()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| {
                TillError::new(ErrorCode::NotFound, format!("Customer not found: {customer_id}"))
            })?;

        self.with_state_mut(|state| -> TillResult<()> {
            if let Some(discount) = customer.discount {
                state.checkout.set_discount(Some(discount))?;
                debug!(customer = %customer.name, "seeded standing discount");
            }
            state.customer = Some(customer.clone());
            Ok(())
        })?;

        Ok(customer)
    }

    /// Detaches the customer and drops any discount on the checkout.
    pub fn clear_customer(&self) -> TillResult<()> {
        self.with_state_mut(|state| -> TillResult<()> {
            state.customer = None;
            state.checkout.set_discount(None)?;
            Ok(())
        })
    }

    pub fn selected_customer(&self) -> Option<Customer> {
        self.with_state(|state| state.customer.clone())
    }

    /// All-time account statement for a customer, oldest entry first.
    pub async fn account_statement(&self, customer_id: &str) -> TillResult<AccountStatement> {
        validation::validate_uuid(customer_id).map_err(CoreError::from)?;

        let transactions = self.store.account_transactions(customer_id).await?;
        Ok(AccountStatement::build(
            customer_id.to_string(),
            Money::zero(),
            transactions,
        ))
    }
}
