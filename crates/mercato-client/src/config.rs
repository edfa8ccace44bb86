//! # Client Configuration
//!
//! Connection settings for the two external collaborators, read from the
//! environment at startup.
//!
//! ## Environment Variables
//! ```text
//! ┌──────────────────────────┬────────────────────────────────────────┐
//! │ Variable                 │ Meaning                                │
//! ├──────────────────────────┼────────────────────────────────────────┤
//! │ MERCATO_COMMERCE_URL     │ Commerce backend base URL (required)   │
//! │ MERCATO_COMMERCE_KEY     │ Commerce API consumer key (required)   │
//! │ MERCATO_COMMERCE_SECRET  │ Commerce API consumer secret (required)│
//! │ MERCATO_STORE_URL        │ Hosted data store base URL (required)  │
//! │ MERCATO_STORE_KEY        │ Hosted data store API key (required)   │
//! │ MERCATO_HTTP_TIMEOUT_SECS│ Request timeout, default 30            │
//! └──────────────────────────┴────────────────────────────────────────┘
//! ```

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for both collaborators.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub commerce_url: String,
    pub commerce_key: String,
    pub commerce_secret: String,
    pub store_url: String,
    pub store_key: String,
    pub timeout: Duration,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar { name }),
    }
}

impl ClientConfig {
    /// Loads configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match env::var("MERCATO_HTTP_TIMEOUT_SECS") {
            Err(_) => DEFAULT_TIMEOUT_SECS,
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                name: "MERCATO_HTTP_TIMEOUT_SECS",
                reason: format!("not a number of seconds: {raw}"),
            })?,
        };

        Ok(ClientConfig {
            commerce_url: required("MERCATO_COMMERCE_URL")?,
            commerce_key: required("MERCATO_COMMERCE_KEY")?,
            commerce_secret: required("MERCATO_COMMERCE_SECRET")?,
            store_url: required("MERCATO_STORE_URL")?,
            store_key: required("MERCATO_STORE_KEY")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
