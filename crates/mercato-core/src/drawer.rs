//! # Cash Drawer
//!
//! Cash drawer sessions and end-of-day reconciliation.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │  open(opening)          record(kind, amount)         close(counted) │
//! │  ─────────────►  Open  ─────────────────────►  Open  ─────────────► │
//! │                          (repeatable)                               │
//! │                                                                     │
//! │                     Closed                                          │
//! │                     expected = opening + Σ signed cash movements    │
//! │                     difference = counted − expected                 │
//! │                                                                     │
//! │  At most one session is open at a time.                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only cash movements are recorded here. Card and mobile tenders never
//! touch the drawer, so they never shift the expected closing amount.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Whether a drawer session is still accepting movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DrawerStatus {
    Open,
    Closed,
}

/// The kind of a cash movement through the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DrawerTransactionKind {
    /// Cash tendered for a sale. Adds to the drawer.
    Sale,
    /// Cash handed back for a refund. Removes from the drawer.
    Refund,
    /// Cash taken out for a petty expense. Removes from the drawer.
    Expense,
    /// Cash put in outside a sale (e.g. change float top-up). Adds.
    Deposit,
}

impl DrawerTransactionKind {
    /// Signed direction of this kind: +1 into the drawer, -1 out of it.
    pub fn sign(&self) -> i64 {
        match self {
            DrawerTransactionKind::Sale | DrawerTransactionKind::Deposit => 1,
            DrawerTransactionKind::Refund | DrawerTransactionKind::Expense => -1,
        }
    }
}

/// One recorded cash movement. Amounts are stored as entered (positive);
/// direction comes from the kind.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DrawerTransaction {
    pub id: String,
    pub kind: DrawerTransactionKind,
    pub amount: Money,
    pub description: Option<String>,

    /// Order id for sale/refund movements.
    pub order_id: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl DrawerTransaction {
    /// The movement's contribution to the drawer balance.
    pub fn signed_amount(&self) -> Money {
        self.amount * self.kind.sign()
    }
}

/// One cash drawer session, from counting-in to counting-out.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DrawerSession {
    pub id: String,
    pub opened_by: String,

    /// Counted float at opening.
    pub opening_amount: Money,

    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    pub status: DrawerStatus,
    pub transactions: Vec<DrawerTransaction>,

    /// Counted amount at closing.
    pub closing_amount: Option<Money>,

    /// Expected amount at closing, frozen when the session closes.
    pub expected_amount: Option<Money>,

    /// `closing_amount − expected_amount`. Negative means a shortage.
    pub difference: Option<Money>,

    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,

    pub notes: Option<String>,
}

impl DrawerSession {
    fn open(opened_by: String, opening_amount: Money) -> Self {
        DrawerSession {
            id: Uuid::new_v4().to_string(),
            opened_by,
            opening_amount,
            opened_at: Utc::now(),
            status: DrawerStatus::Open,
            transactions: Vec::new(),
            closing_amount: None,
            expected_amount: None,
            difference: None,
            closed_at: None,
            notes: None,
        }
    }

    /// Net of all recorded cash movements, signed by kind.
    pub fn cash_total(&self) -> Money {
        self.transactions.iter().map(|t| t.signed_amount()).sum()
    }

    /// `opening_amount + cash_total`. With no movements this equals the
    /// opening amount.
    pub fn expected_closing(&self) -> Money {
        self.opening_amount + self.cash_total()
    }

    fn record(
        &mut self,
        kind: DrawerTransactionKind,
        amount: Money,
        description: Option<String>,
        order_id: Option<String>,
    ) -> DrawerTransaction {
        let transaction = DrawerTransaction {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
            description,
            order_id,
            created_at: Utc::now(),
        };
        self.transactions.push(transaction.clone());
        transaction
    }

    fn close(&mut self, counted: Money, notes: Option<String>) {
        let expected = self.expected_closing();

        self.status = DrawerStatus::Closed;
        self.closing_amount = Some(counted);
        self.expected_amount = Some(expected);
        self.difference = Some(counted - expected);
        self.closed_at = Some(Utc::now());
        self.notes = notes;
    }
}

/// Holder enforcing the at-most-one-open-session rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashDrawer {
    current: Option<DrawerSession>,
}

impl CashDrawer {
    pub fn new() -> Self {
        CashDrawer { current: None }
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&DrawerSession> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Opens a session with the counted opening float.
    ///
    /// Refused while a session is already open; the existing session is
    /// untouched by the refusal.
    pub fn open_session(
        &mut self,
        opened_by: String,
        opening_amount: Money,
    ) -> CoreResult<DrawerSession> {
        if let Some(existing) = &self.current {
            return Err(CoreError::DrawerAlreadyOpen {
                session_id: existing.id.clone(),
            });
        }

        let session = DrawerSession::open(opened_by, opening_amount);
        self.current = Some(session.clone());
        Ok(session)
    }

    /// Records a cash movement against the open session.
    pub fn record_transaction(
        &mut self,
        kind: DrawerTransactionKind,
        amount: Money,
        description: Option<String>,
        order_id: Option<String>,
    ) -> CoreResult<DrawerTransaction> {
        let session = self.current.as_mut().ok_or(CoreError::NoOpenDrawer)?;
        Ok(session.record(kind, amount, description, order_id))
    }

    /// Closes the open session against a physically counted amount and
    /// returns the reconciled session. The drawer is left with no open
    /// session; opening a new one is independent of past differences.
    pub fn close_session(
        &mut self,
        counted: Money,
        notes: Option<String>,
    ) -> CoreResult<DrawerSession> {
        let mut session = self.current.take().ok_or(CoreError::NoOpenDrawer)?;
        session.close(counted, notes);
        Ok(session)
    }
}
