//! # Till Errors
//!
//! The error shape crossing the till boundary to the frontend. Everything
//! internal (core rules, client failures, auth rejections) is folded into
//! a stable `{code, message}` pair the UI can branch on.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use ts_rs::TS;

use mercato_client::ClientError;
use mercato_core::auth::AuthError;
use mercato_core::error::CoreError;

/// Stable machine-readable error categories for the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed validation.
    InvalidInput,
    /// The operation is not valid in the current till state.
    Conflict,
    /// The referenced entity does not exist.
    NotFound,
    /// The signed-in role may not do this.
    PermissionDenied,
    /// No operator is signed in.
    NotSignedIn,
    /// A collaborator could not be reached or answered badly.
    Unavailable,
    /// Anything else.
    Internal,
}

/// User-facing error with a machine-readable code.
#[derive(Debug, Clone, Error, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct TillError {
    pub code: ErrorCode,
    pub message: String,
}

impl TillError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        TillError {
            code,
            message: message.into(),
        }
    }
}

impl From<CoreError> for TillError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::DrawerAlreadyOpen { .. }
            | CoreError::NoOpenDrawer
            | CoreError::InvalidCheckoutPhase { .. }
            | CoreError::EmptyCart
            | CoreError::NotSettled { .. } => ErrorCode::Conflict,
            CoreError::ProductNotFound(_) => ErrorCode::NotFound,
            CoreError::Validation(_) => ErrorCode::InvalidInput,
        };

        TillError::new(code, err.to_string())
    }
}

impl From<AuthError> for TillError {
    fn from(err: AuthError) -> Self {
        let code = match &err {
            AuthError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            AuthError::NotSignedIn => ErrorCode::NotSignedIn,
        };

        TillError::new(code, err.to_string())
    }
}

impl From<ClientError> for TillError {
    fn from(err: ClientError) -> Self {
        warn!(error = %err, "collaborator call failed");

        let code = match &err {
            ClientError::NotFound(_) => ErrorCode::NotFound,
            ClientError::Config(_) => ErrorCode::Internal,
            _ => ErrorCode::Unavailable,
        };

        TillError::new(code, err.to_string())
    }
}

pub type TillResult<T> = Result<T, TillError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mercato_core::checkout::CheckoutPhase;

    #[test]
    fn test_core_error_codes() {
        let err: TillError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err: TillError = CoreError::ProductNotFound("p9".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("p9"));

        let err: TillError = CoreError::InvalidCheckoutPhase {
            current: CheckoutPhase::Completed,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_client_error_maps_to_unavailable() {
        let err: TillError = ClientError::UnexpectedStatus {
            status: 500,
            endpoint: "/orders".to_string(),
            body: String::new(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::Unavailable);
    }

    #[test]
    fn test_serializes_as_code_and_message() {
        let err = TillError::new(ErrorCode::Conflict, "Cart is empty");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "conflict");
        assert_eq!(json["message"], "Cart is empty");
    }
}
