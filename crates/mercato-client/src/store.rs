//! # Hosted Data Store Client
//!
//! HTTP client for the hosted data store that owns customers, settings,
//! drawer sessions, and account ledgers. The store exposes its tables over
//! a REST layer; authentication is an API key sent both as the `apikey`
//! header and a bearer token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mercato_core::account::{AccountTransaction, AccountTransactionKind};
use mercato_core::drawer::{DrawerSession, DrawerTransaction};
use mercato_core::money::Money;
use mercato_core::types::{Customer, CustomerType, Discount, Settings};

use crate::api::StoreApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Client for the hosted data store's table REST API.
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.store_key).map_err(|_| ClientError::Decode {
            endpoint: "config".to_string(),
            reason: "store key contains invalid header characters".to_string(),
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.store_key)).map_err(
            |_| ClientError::Decode {
                endpoint: "config".to_string(),
                reason: "store key contains invalid header characters".to_string(),
            },
        )?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(StoreClient {
            http,
            base_url: config.store_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<Vec<T>> {
        debug!(table, "store SELECT");

        let response = self
            .http
            .get(self.url(table))
            .query(&[("select", "*")])
            .query(query)
            .send()
            .await?;

        Self::check(table, response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Decode {
                endpoint: table.to_string(),
                reason: e.to_string(),
            })
    }

    async fn upsert<B: Serialize>(&self, table: &str, row: &B) -> ClientResult<()> {
        debug!(table, "store UPSERT");

        let response = self
            .http
            .post(self.url(table))
            .header("Prefer", "resolution=merge-duplicates")
            .json(row)
            .send()
            .await?;

        Self::check(table, response).await?;
        Ok(())
    }

    async fn check(table: &str, response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(table.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: table.to_string(),
                body,
            });
        }

        Ok(response)
    }
}

// =============================================================================
// Wire Shapes
// =============================================================================
// Table rows use snake_case columns and decimal numbers; core types use
// integer cents. The conversion lives here and nowhere else.

fn cents_from_decimal(value: f64) -> Money {
    Money::from_cents((value * 100.0).round() as i64)
}

fn decimal_from_cents(value: Money) -> f64 {
    value.cents() as f64 / 100.0
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    id: String,
    name: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default, rename = "type")]
    customer_type: Option<CustomerType>,
    #[serde(default)]
    discount_type: Option<String>,
    #[serde(default)]
    discount_value: Option<f64>,
    #[serde(default)]
    total_purchases: f64,
    #[serde(default)]
    last_visit: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        let discount = match (row.discount_type.as_deref(), row.discount_value) {
            (Some("percentage"), Some(value)) => {
                Some(Discount::Percentage((value * 100.0).round().max(0.0) as u32))
            }
            (Some("fixed"), Some(value)) => Some(Discount::Fixed(cents_from_decimal(value))),
            _ => None,
        };

        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            notes: row.notes,
            customer_type: row.customer_type.unwrap_or(CustomerType::Retail),
            discount,
            total_purchases: cents_from_decimal(row.total_purchases),
            last_visit: row.last_visit,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsRow {
    #[serde(default)]
    store: serde_json::Value,
    #[serde(default)]
    receipt: serde_json::Value,
    #[serde(default)]
    localization: serde_json::Value,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        // a missing or malformed column falls back to defaults rather than
        // blocking the till from starting
        Settings {
            store: serde_json::from_value(row.store).unwrap_or_default(),
            receipt: serde_json::from_value(row.receipt).unwrap_or_default(),
            localization: serde_json::from_value(row.localization).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DrawerSessionRow<'a> {
    id: &'a str,
    opened_by: &'a str,
    opening_amount: f64,
    opened_at: DateTime<Utc>,
    status: &'a str,
    closing_amount: Option<f64>,
    expected_amount: Option<f64>,
    difference: Option<f64>,
    closed_at: Option<DateTime<Utc>>,
    notes: Option<&'a str>,
}

impl<'a> DrawerSessionRow<'a> {
    fn from_session(session: &'a DrawerSession) -> Self {
        DrawerSessionRow {
            id: &session.id,
            opened_by: &session.opened_by,
            opening_amount: decimal_from_cents(session.opening_amount),
            opened_at: session.opened_at,
            status: match session.status {
                mercato_core::drawer::DrawerStatus::Open => "open",
                mercato_core::drawer::DrawerStatus::Closed => "closed",
            },
            closing_amount: session.closing_amount.map(decimal_from_cents),
            expected_amount: session.expected_amount.map(decimal_from_cents),
            difference: session.difference.map(decimal_from_cents),
            closed_at: session.closed_at,
            notes: session.notes.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DrawerTransactionRow<'a> {
    id: &'a str,
    session_id: &'a str,
    #[serde(rename = "type")]
    kind: mercato_core::drawer::DrawerTransactionKind,
    amount: f64,
    description: Option<&'a str>,
    order_id: Option<&'a str>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct AccountTransactionRow {
    id: String,
    customer_id: String,
    #[serde(rename = "type")]
    kind: AccountTransactionKind,
    amount: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    order_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AccountTransactionRow> for AccountTransaction {
    fn from(row: AccountTransactionRow) -> Self {
        AccountTransaction {
            id: row.id,
            customer_id: row.customer_id,
            kind: row.kind,
            amount: cents_from_decimal(row.amount),
            description: row.description,
            order_id: row.order_id,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Trait Implementation
// =============================================================================

#[async_trait]
impl StoreApi for StoreClient {
    async fn customers(&self) -> ClientResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> = self.select("customers", &[("order", "name.asc")]).await?;

        debug!(count = rows.len(), "loaded customers");
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn settings(&self) -> ClientResult<Settings> {
        let rows: Vec<SettingsRow> = self.select("settings", &[("limit", "1")]).await?;

        // a store without a settings row runs on defaults
        Ok(rows.into_iter().next().map(Settings::from).unwrap_or_default())
    }

    async fn save_drawer_session(&self, session: &DrawerSession) -> ClientResult<()> {
        self.upsert("drawer_sessions", &DrawerSessionRow::from_session(session))
            .await
    }

    async fn record_drawer_transaction(
        &self,
        session_id: &str,
        transaction: &DrawerTransaction,
    ) -> ClientResult<()> {
        let row = DrawerTransactionRow {
            id: &transaction.id,
            session_id,
            kind: transaction.kind,
            amount: decimal_from_cents(transaction.amount),
            description: transaction.description.as_deref(),
            order_id: transaction.order_id.as_deref(),
            created_at: transaction.created_at,
        };
        self.upsert("drawer_transactions", &row).await
    }

    async fn account_transactions(
        &self,
        customer_id: &str,
    ) -> ClientResult<Vec<AccountTransaction>> {
        let filter = format!("eq.{customer_id}");
        let rows: Vec<AccountTransactionRow> = self
            .select(
                "account_transactions",
                &[("customer_id", filter.as_str()), ("order", "created_at.asc")],
            )
            .await?;

        Ok(rows.into_iter().map(AccountTransaction::from).collect())
    }
}
