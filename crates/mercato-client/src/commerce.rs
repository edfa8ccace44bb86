//! # Commerce Backend Client
//!
//! HTTP client for the commerce backend that owns the product catalog and
//! the order history. Authentication is a consumer key/secret pair passed
//! as query parameters, which is how the backend's REST API expects it.
//!
//! The backend serializes money as decimal strings ("12.50"); every amount
//! crossing this boundary goes through [`Money::parse_lenient`] so a
//! malformed price degrades to zero instead of failing the whole catalog
//! load.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mercato_core::money::Money;
use mercato_core::types::{Category, PaymentEntry, PaymentMethod, Product};

use crate::api::{
    CatalogApi, OrderApi, OrderConfirmation, OrderDraft, PastOrder, PastOrderLine,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const PAGE_SIZE: usize = 100;

/// Client for the commerce backend's REST API.
pub struct CommerceClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
    secret: String,
}

impl CommerceClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(CommerceClient {
            http,
            base_url: config.commerce_url.trim_end_matches('/').to_string(),
            key: config.commerce_key.clone(),
            secret: config.commerce_secret.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [
            ("consumer_key", self.key.as_str()),
            ("consumer_secret", self.secret.as_str()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        debug!(path, "commerce GET");

        let response = self
            .http
            .get(self.url(path))
            .query(&self.auth())
            .query(query)
            .send()
            .await?;

        Self::decode(path, response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        debug!(path, "commerce POST");

        let response = self
            .http
            .post(self.url(path))
            .query(&self.auth())
            .json(body)
            .send()
            .await?;

        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: path.to_string(),
                body,
            });
        }

        response.json().await.map_err(|e| ClientError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }
}

fn parse_datetime(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

fn parse_method(raw: &str) -> PaymentMethod {
    match raw {
        "card" => PaymentMethod::Card,
        "mobile" => PaymentMethod::Mobile,
        _ => PaymentMethod::Cash,
    }
}

// =============================================================================
// Wire Shapes
// =============================================================================
// The backend's own field names (snake_case, decimal-string amounts). These
// never leave this module; they are mapped to core types at the boundary.

#[derive(Debug, Deserialize)]
struct RemoteCategoryRef {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct RemoteImage {
    src: String,
}

#[derive(Debug, Deserialize)]
struct RemoteProduct {
    id: i64,
    name: String,
    #[serde(default)]
    sku: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    stock_quantity: Option<i64>,
    #[serde(default)]
    categories: Vec<RemoteCategoryRef>,
    #[serde(default)]
    images: Vec<RemoteImage>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    date_modified: Option<String>,
}

impl From<RemoteProduct> for Product {
    fn from(remote: RemoteProduct) -> Self {
        Product {
            id: remote.id.to_string(),
            name: remote.name,
            barcode: (!remote.sku.is_empty()).then_some(remote.sku),
            price: Money::parse_lenient(&remote.price),
            stock_quantity: remote.stock_quantity.unwrap_or(0),
            category_id: remote
                .categories
                .first()
                .map(|c| c.id.to_string())
                .unwrap_or_default(),
            image_url: remote.images.into_iter().next().map(|i| i.src),
            description: (!remote.description.is_empty()).then_some(remote.description),
            cost_price: None,
            created_at: parse_datetime(remote.date_created.as_deref()),
            updated_at: parse_datetime(remote.date_modified.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteCategory {
    id: i64,
    name: String,
}

#[derive(Debug, Serialize)]
struct StockUpdate {
    stock_quantity: i64,
}

#[derive(Debug, Serialize)]
struct RemoteOrderLineOut {
    product_id: i64,
    quantity: i64,
}

#[derive(Debug, Serialize)]
struct RemoteFeeLine {
    name: String,
    total: String,
}

#[derive(Debug, Serialize)]
struct RemoteMeta {
    key: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct RemoteOrderOut {
    payment_method: String,
    set_paid: bool,
    line_items: Vec<RemoteOrderLineOut>,
    fee_lines: Vec<RemoteFeeLine>,
    meta_data: Vec<RemoteMeta>,
}

impl RemoteOrderOut {
    fn from_draft(draft: &OrderDraft) -> Self {
        // split tenders collapse to the backend's single method field;
        // the full breakdown rides along as metadata
        let payment_method = match draft.figures.payments.as_slice() {
            [only] => serde_json::to_value(only.method)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| "cash".to_string()),
            _ => "split".to_string(),
        };

        let mut fee_lines = Vec::new();
        if !draft.figures.discount_amount.is_zero() {
            fee_lines.push(RemoteFeeLine {
                name: "Discount".to_string(),
                total: format!("-{}", draft.figures.discount_amount),
            });
        }

        let mut meta_data = vec![
            RemoteMeta {
                key: "receipt_number".to_string(),
                value: draft.receipt_number.clone(),
            },
            RemoteMeta {
                key: "cashier_id".to_string(),
                value: draft.cashier_id.clone(),
            },
            RemoteMeta {
                key: "payments".to_string(),
                value: serde_json::to_string(&draft.figures.payments).unwrap_or_default(),
            },
        ];
        if let Some(customer_id) = &draft.customer_id {
            meta_data.push(RemoteMeta {
                key: "customer_id".to_string(),
                value: customer_id.clone(),
            });
        }

        RemoteOrderOut {
            payment_method,
            set_paid: true,
            line_items: draft
                .lines
                .iter()
                .map(|line| RemoteOrderLineOut {
                    product_id: line.product_id.parse().unwrap_or(0),
                    quantity: line.quantity,
                })
                .collect(),
            fee_lines,
            meta_data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteOrderLineIn {
    #[serde(default)]
    product_id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    quantity: i64,
    #[serde(default)]
    total: String,
}

#[derive(Debug, Deserialize)]
struct RemoteOrderIn {
    id: i64,
    #[serde(default)]
    status: String,
    #[serde(default)]
    total: String,
    #[serde(default)]
    payment_method: String,
    #[serde(default)]
    line_items: Vec<RemoteOrderLineIn>,
    #[serde(default)]
    date_created: Option<String>,
}

impl From<RemoteOrderIn> for PastOrder {
    fn from(remote: RemoteOrderIn) -> Self {
        let total = Money::parse_lenient(&remote.total);

        PastOrder {
            order_id: remote.id.to_string(),
            status: remote.status,
            total,
            lines: remote
                .line_items
                .into_iter()
                .map(|line| PastOrderLine {
                    product_id: line.product_id.to_string(),
                    name: line.name,
                    quantity: line.quantity,
                    line_total: Money::parse_lenient(&line.total),
                })
                .collect(),
            payments: vec![PaymentEntry::new(parse_method(&remote.payment_method), total)],
            created_at: parse_datetime(remote.date_created.as_deref()),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

#[async_trait]
impl CatalogApi for CommerceClient {
    async fn products(&self) -> ClientResult<Vec<Product>> {
        let remote: Vec<RemoteProduct> = self
            .get_json("/products", &[("per_page", PAGE_SIZE.to_string())])
            .await?;

        debug!(count = remote.len(), "loaded products");
        Ok(remote.into_iter().map(Product::from).collect())
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        let remote: Vec<RemoteCategory> = self
            .get_json(
                "/products/categories",
                &[("per_page", PAGE_SIZE.to_string())],
            )
            .await?;

        Ok(remote
            .into_iter()
            .map(|c| Category {
                id: c.id.to_string(),
                name: c.name,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect())
    }

    async fn update_stock(&self, product_id: &str, stock_quantity: i64) -> ClientResult<()> {
        let path = format!("/products/{product_id}");
        let _: serde_json::Value = self
            .post_json(&path, &StockUpdate { stock_quantity })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OrderApi for CommerceClient {
    async fn create_order(&self, draft: &OrderDraft) -> ClientResult<OrderConfirmation> {
        let payload = RemoteOrderOut::from_draft(draft);
        let created: RemoteOrderIn = self.post_json("/orders", &payload).await?;

        debug!(order_id = created.id, "order created");
        Ok(OrderConfirmation {
            order_id: created.id.to_string(),
            status: created.status,
            created_at: parse_datetime(created.date_created.as_deref()),
        })
    }

    async fn order(&self, order_id: &str) -> ClientResult<PastOrder> {
        let path = format!("/orders/{order_id}");
        let remote: RemoteOrderIn = self.get_json(&path, &[]).await?;
        Ok(remote.into())
    }

    async fn recent_orders(&self, limit: usize) -> ClientResult<Vec<PastOrder>> {
        let remote: Vec<RemoteOrderIn> = self
            .get_json("/orders", &[("per_page", limit.to_string())])
            .await?;
        Ok(remote.into_iter().map(PastOrder::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_product_mapping() {
        let remote: RemoteProduct = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "Espresso",
                "sku": "4006381333931",
                "price": "3.50",
                "stock_quantity": 12,
                "categories": [{"id": 7, "name": "Drinks"}],
                "images": [{"src": "https://cdn.example.com/espresso.jpg"}],
                "description": "Double shot",
                "date_created": "2026-01-15T09:30:00+00:00"
            }"#,
        )
        .unwrap();

        let product = Product::from(remote);
        assert_eq!(product.id, "42");
        assert_eq!(product.price.cents(), 350);
        assert_eq!(product.barcode.as_deref(), Some("4006381333931"));
        assert_eq!(product.category_id, "7");
    }

    #[test]
    fn test_malformed_price_degrades_to_zero() {
        let remote: RemoteProduct =
            serde_json::from_str(r#"{"id": 1, "name": "Broken", "price": "n/a"}"#).unwrap();

        assert_eq!(Product::from(remote).price, Money::zero());
    }

    #[test]
    fn test_order_payload_collapses_split_tender() {
        use mercato_core::checkout::FinalizedSale;

        let draft = OrderDraft {
            receipt_number: "260824-101500-0001".to_string(),
            cashier_id: "u1".to_string(),
            customer_id: None,
            lines: Vec::new(),
            figures: FinalizedSale {
                subtotal: Money::from_cents(2500),
                discount: None,
                discount_amount: Money::from_cents(250),
                final_amount: Money::from_cents(2250),
                payments: vec![
                    PaymentEntry::new(PaymentMethod::Cash, Money::from_cents(1000)),
                    PaymentEntry::new(PaymentMethod::Card, Money::from_cents(1250)),
                ],
                total_paid: Money::from_cents(2250),
                change_due: Money::zero(),
            },
        };

        let payload = RemoteOrderOut::from_draft(&draft);
        assert_eq!(payload.payment_method, "split");
        assert_eq!(payload.fee_lines[0].total, "-2.50");
        assert!(payload.meta_data.iter().any(|m| m.key == "payments"));
    }

    #[test]
    fn test_single_tender_keeps_its_method() {
        use mercato_core::checkout::FinalizedSale;

        let draft = OrderDraft {
            receipt_number: "r".to_string(),
            cashier_id: "u1".to_string(),
            customer_id: None,
            lines: Vec::new(),
            figures: FinalizedSale {
                subtotal: Money::from_cents(500),
                discount: None,
                discount_amount: Money::zero(),
                final_amount: Money::from_cents(500),
                payments: vec![PaymentEntry::new(PaymentMethod::Card, Money::from_cents(500))],
                total_paid: Money::from_cents(500),
                change_due: Money::zero(),
            },
        };

        assert_eq!(RemoteOrderOut::from_draft(&draft).payment_method, "card");
    }
}
