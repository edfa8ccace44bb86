//! # Authorization
//!
//! Role-to-permission checks for till operations. Authentication itself is
//! external; the signed-in [`User`] arrives with a role already assigned,
//! and this module only answers "may this role do that".
//!
//! ## Permission Matrix
//! ```text
//! ┌──────────────────────┬───────┬─────────┬───────────┐
//! │ Permission           │ Admin │ Cashier │ Inventory │
//! ├──────────────────────┼───────┼─────────┼───────────┤
//! │ CompleteSale         │   ✓   │    ✓    │           │
//! │ ManageCashDrawer     │   ✓   │    ✓    │           │
//! │ ManageProducts       │   ✓   │         │     ✓     │
//! │ ViewReports          │   ✓   │    ✓    │           │
//! └──────────────────────┴───────┴─────────┴───────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::types::{User, UserRole};

/// A till capability gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Finalize a sale and submit the order.
    CompleteSale,
    /// Open, close, and move cash through the drawer.
    ManageCashDrawer,
    /// Edit catalog products and stock.
    ManageProducts,
    /// View daily sales figures.
    ViewReports,
}

/// Authorization rejections.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Role {role:?} is not permitted to {permission:?}")]
    PermissionDenied {
        role: UserRole,
        permission: Permission,
    },

    /// No operator is signed in on this till.
    #[error("No user is signed in")]
    NotSignedIn,
}

/// Whether a role holds a permission.
pub fn allowed(role: UserRole, permission: Permission) -> bool {
    match role {
        UserRole::Admin => true,
        UserRole::Cashier => matches!(
            permission,
            Permission::CompleteSale | Permission::ManageCashDrawer | Permission::ViewReports
        ),
        UserRole::Inventory => matches!(permission, Permission::ManageProducts),
    }
}

/// Requires a permission for a user, producing a typed rejection otherwise.
pub fn require(user: &User, permission: Permission) -> Result<(), AuthError> {
    if allowed(user.role, permission) {
        return Ok(());
    }

    Err(AuthError::PermissionDenied {
        role: user.role,
        permission,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::user;

    #[test]
    fn test_admin_holds_everything() {
        for permission in [
            Permission::CompleteSale,
            Permission::ManageCashDrawer,
            Permission::ManageProducts,
            Permission::ViewReports,
        ] {
            assert!(allowed(UserRole::Admin, permission));
        }
    }

    #[test]
    fn test_cashier_can_run_the_drawer_but_not_the_catalog() {
        assert!(allowed(UserRole::Cashier, Permission::ManageCashDrawer));
        assert!(allowed(UserRole::Cashier, Permission::CompleteSale));
        assert!(!allowed(UserRole::Cashier, Permission::ManageProducts));
    }

    #[test]
    fn test_inventory_cannot_sell() {
        assert!(allowed(UserRole::Inventory, Permission::ManageProducts));
        assert!(!allowed(UserRole::Inventory, Permission::CompleteSale));
        assert!(!allowed(UserRole::Inventory, Permission::ManageCashDrawer));
    }

    #[test]
    fn test_require_produces_typed_rejection() {
        let operator = user(UserRole::Inventory);
        let err = require(&operator, Permission::ManageCashDrawer).unwrap_err();

        assert!(matches!(
            err,
            AuthError::PermissionDenied {
                role: UserRole::Inventory,
                permission: Permission::ManageCashDrawer,
            }
        ));
    }
}
