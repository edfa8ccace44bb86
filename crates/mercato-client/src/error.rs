//! # Client Errors
//!
//! Failures talking to the external collaborators. These never carry
//! business meaning; the till layer decides what a network failure does to
//! till state (usually: nothing).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The collaborator answered with a non-success status.
    #[error("Unexpected status {status} from {endpoint}: {body}")]
    UnexpectedStatus {
        status: u16,
        endpoint: String,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// The referenced resource does not exist on the collaborator.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client configuration is incomplete.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Environment configuration failures, raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {name}")]
    MissingVar { name: &'static str },

    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ClientError::UnexpectedStatus {
            status: 503,
            endpoint: "/products".to_string(),
            body: "maintenance".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected status 503 from /products: maintenance"
        );

        let err: ClientError = ConfigError::MissingVar {
            name: "MERCATO_COMMERCE_URL",
        }
        .into();
        assert!(err.to_string().contains("MERCATO_COMMERCE_URL"));
    }
}
