//! # Error Types
//!
//! Domain-specific error types for mercato-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  mercato-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                    │
//! │  ├── AuthError        - Permission rejections (auth module)         │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  mercato-client errors (separate crate)                             │
//! │  └── ClientError      - Collaborator/network failures               │
//! │                                                                     │
//! │  mercato-till errors                                                │
//! │  └── TillError        - What the frontend sees (serialized)         │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → TillError → Frontend           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::checkout::CheckoutPhase;

/// Core business logic errors.
///
/// These represent business rule violations. They are caught at the till
/// layer and translated to user-facing messages; none of them corrupt
/// in-memory state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A drawer session is already open; a second one may not be opened.
    #[error("A drawer session is already open (id {session_id})")]
    DrawerAlreadyOpen { session_id: String },

    /// No drawer session is open, so there is nothing to close.
    #[error("No open drawer session")]
    NoOpenDrawer,

    /// The checkout is not in a phase that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Adding payments before checkout has begun
    /// - Completing a checkout twice
    /// - Beginning checkout on an empty cart
    #[error("Checkout is in {current:?} phase, cannot perform operation")]
    InvalidCheckoutPhase { current: CheckoutPhase },

    /// Checkout began with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Completion was refused because the sale is not fully paid.
    /// Only raised when `CheckoutPolicy::require_settled` is set.
    #[error("Sale is not settled: {remaining_cents} cents remaining")]
    NotSettled { remaining_cents: i64 },

    /// A past order referenced a product the loaded catalog does not have.
    #[error("Product not found in catalog: {0}")]
    ProductNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
///
/// These occur when user input does not meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DrawerAlreadyOpen {
            session_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "A drawer session is already open (id abc)");

        let err = CoreError::NotSettled { remaining_cents: 250 };
        assert_eq!(err.to_string(), "Sale is not settled: 250 cents remaining");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
