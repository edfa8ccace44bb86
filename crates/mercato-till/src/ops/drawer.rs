//! Cash drawer operations.
//!
//! Every drawer change is persisted to the hosted data store BEFORE the
//! local state moves: if the store write fails, the till still shows the
//! truth. Changes are made on a clone and committed only after the write
//! succeeds.

use tracing::info;

use mercato_core::auth::Permission;
use mercato_core::drawer::{DrawerSession, DrawerTransactionKind};
use mercato_core::error::CoreError;
use mercato_core::money::Money;

use crate::error::TillResult;
use crate::state::Till;

impl Till {
    /// Opens a drawer session with the counted opening float.
    pub async fn open_drawer(&self, opening_input: &str) -> TillResult<DrawerSession> {
        let operator = self.require_permission(Permission::ManageCashDrawer)?;
        let opening = Money::parse_lenient(opening_input);

        let (trial, session) = self.with_state(|state| {
            let mut trial = state.drawer.clone();
            trial
                .open_session(operator.id.clone(), opening)
                .map(|session| (trial, session))
        })?;

        self.store.save_drawer_session(&session).await?;
        self.with_state_mut(|state| state.drawer = trial);

        info!(session_id = %session.id, opening = %opening, "drawer opened");
        Ok(session)
    }

    /// Records a cash movement outside a sale (expense or deposit).
    pub async fn record_cash_movement(
        &self,
        kind: DrawerTransactionKind,
        amount_input: &str,
        description: Option<String>,
    ) -> TillResult<DrawerSession> {
        self.require_permission(Permission::ManageCashDrawer)?;
        let amount = Money::parse_lenient(amount_input);

        let (trial, session_id, movement) = self.with_state(|state| {
            let mut trial = state.drawer.clone();
            let movement = trial.record_transaction(kind, amount, description, None)?;
            let session_id = trial
                .session()
                .map(|s| s.id.clone())
                .ok_or(CoreError::NoOpenDrawer)?;
            Ok::<_, CoreError>((trial, session_id, movement))
        })?;

        self.store
            .record_drawer_transaction(&session_id, &movement)
            .await?;

        Ok(self.with_state_mut(|state| {
            state.drawer = trial;
            // record_transaction succeeded above, the session is open
            state
                .drawer
                .session()
                .cloned()
                .ok_or(CoreError::NoOpenDrawer)
        })?)
    }

    /// Closes the drawer against the physically counted amount and returns
    /// the reconciled session.
    pub async fn close_drawer(
        &self,
        counted_input: &str,
        notes: Option<String>,
    ) -> TillResult<DrawerSession> {
        self.require_permission(Permission::ManageCashDrawer)?;
        let counted = Money::parse_lenient(counted_input);

        let (trial, closed) = self.with_state(|state| {
            let mut trial = state.drawer.clone();
            trial
                .close_session(counted, notes)
                .map(|closed| (trial, closed))
        })?;

        self.store.save_drawer_session(&closed).await?;
        self.with_state_mut(|state| state.drawer = trial);

        info!(
            session_id = %closed.id,
            expected = %closed.expected_closing(),
            counted = %counted,
            "drawer closed"
        );
        Ok(closed)
    }

    /// The open drawer session, if any.
    pub fn drawer_status(&self) -> Option<DrawerSession> {
        self.with_state(|state| state.drawer.session().cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{fixture, user};
    use mercato_core::drawer::DrawerStatus;
    use mercato_core::types::UserRole;

    #[tokio::test]
    async fn test_open_record_close() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));

        let session = f.till.open_drawer("100").await.unwrap();
        assert_eq!(session.opening_amount.cents(), 10000);

        f.till
            .record_cash_movement(DrawerTransactionKind::Deposit, "20", None)
            .await
            .unwrap();
        f.till
            .record_cash_movement(
                DrawerTransactionKind::Expense,
                "5.50",
                Some("window cleaner".to_string()),
            )
            .await
            .unwrap();

        let closed = f.till.close_drawer("114.50", None).await.unwrap();
        assert_eq!(closed.status, DrawerStatus::Closed);
        assert_eq!(closed.expected_amount.unwrap().cents(), 11450);
        assert_eq!(closed.difference.unwrap(), Money::zero());

        assert!(f.till.drawer_status().is_none());
        // open snapshot + closed snapshot were persisted
        assert_eq!(f.store.saved_sessions.lock().unwrap().len(), 2);
        assert_eq!(f.store.drawer_transactions.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_shortage_reported_negative() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Admin));
        f.till.open_drawer("100").await.unwrap();
        f.till
            .record_cash_movement(DrawerTransactionKind::Deposit, "50", None)
            .await
            .unwrap();

        let closed = f.till.close_drawer("140", None).await.unwrap();
        assert_eq!(closed.difference.unwrap().cents(), -1000);
    }

    #[tokio::test]
    async fn test_double_open_refused() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));
        f.till.open_drawer("100").await.unwrap();

        let err = f.till.open_drawer("50").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_close_without_open_refused() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));

        let err = f.till.close_drawer("0", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_store_failure_blocks_state_transition() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));
        f.store.fail_save.store(true, Ordering::SeqCst);

        let err = f.till.open_drawer("100").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unavailable);
        // the drawer never opened locally
        assert!(f.till.drawer_status().is_none());

        f.store.fail_save.store(false, Ordering::SeqCst);
        f.till.open_drawer("100").await.unwrap();

        // same rule on close
        f.store.fail_save.store(true, Ordering::SeqCst);
        let err = f.till.close_drawer("100", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unavailable);
        assert!(f.till.drawer_status().is_some());
    }

    #[tokio::test]
    async fn test_drawer_requires_permission() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Inventory));

        let err = f.till.open_drawer("100").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        f.till.sign_out();
        let err = f.till.open_drawer("100").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotSignedIn);
    }

    #[tokio::test]
    async fn test_junk_amounts_coerce_to_zero() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));

        let session = f.till.open_drawer("not a number").await.unwrap();
        assert_eq!(session.opening_amount, Money::zero());

        let closed = f.till.close_drawer("", None).await.unwrap();
        assert_eq!(closed.closing_amount.unwrap(), Money::zero());
        assert_eq!(closed.difference.unwrap(), Money::zero());
    }
}
