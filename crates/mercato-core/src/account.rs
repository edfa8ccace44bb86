//! # Customer Accounts
//!
//! On-account balances and periodic statements for charge customers.
//!
//! Balance convention: positive means the customer owes the store. Sales on
//! account raise the balance; payments and refunds lower it; adjustments
//! carry their own sign.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AccountTransactionKind {
    /// A sale charged to the account.
    Sale,
    /// A payment received against the balance.
    Payment,
    /// A refund credited back to the account.
    Refund,
    /// A manual correction; the stored amount is already signed.
    Adjustment,
}

/// One ledger entry on a customer account.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountTransaction {
    pub id: String,
    pub customer_id: String,
    pub kind: AccountTransactionKind,
    pub amount: Money,
    pub description: Option<String>,
    pub order_id: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl AccountTransaction {
    /// The entry's contribution to the balance owed.
    pub fn balance_effect(&self) -> Money {
        match self.kind {
            AccountTransactionKind::Sale => self.amount,
            AccountTransactionKind::Payment | AccountTransactionKind::Refund => {
                Money::zero() - self.amount
            }
            AccountTransactionKind::Adjustment => self.amount,
        }
    }
}

/// A customer's account standing, as held by the hosted data store.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccount {
    pub customer_id: String,

    /// Amount currently owed. Negative means the store owes the customer.
    pub balance: Money,

    pub credit_limit: Option<Money>,
}

impl CustomerAccount {
    /// Applies a ledger entry to the balance.
    pub fn apply(&mut self, transaction: &AccountTransaction) {
        self.balance += transaction.balance_effect();
    }

    /// Whether charging `amount` would push the balance past the credit
    /// limit. Accounts without a limit always have room.
    pub fn would_exceed_limit(&self, amount: Money) -> bool {
        match self.credit_limit {
            Some(limit) => self.balance + amount > limit,
            None => false,
        }
    }
}

/// One line of a statement, with the running balance after the entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub transaction: AccountTransaction,
    pub balance_after: Money,
}

/// A customer statement over a period.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatement {
    pub customer_id: String,
    pub opening_balance: Money,
    pub closing_balance: Money,
    pub lines: Vec<StatementLine>,
}

impl AccountStatement {
    /// Builds a statement from the opening balance and the period's entries,
    /// in the order given.
    pub fn build(
        customer_id: String,
        opening_balance: Money,
        transactions: Vec<AccountTransaction>,
    ) -> Self {
        let mut balance = opening_balance;
        let lines = transactions
            .into_iter()
            .map(|transaction| {
                balance += transaction.balance_effect();
                StatementLine {
                    transaction,
                    balance_after: balance,
                }
            })
            .collect();

        AccountStatement {
            customer_id,
            opening_balance,
            closing_balance: balance,
            lines,
        }
    }
}
