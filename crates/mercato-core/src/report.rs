//! # Sales Reporting
//!
//! End-of-day rollups over completed sales: takings by payment method,
//! gross figures, and per-product quantities.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::LineItem;
use crate::checkout::FinalizedSale;
use crate::money::Money;
use crate::types::PaymentMethod;

/// A sale as finalized at the till, kept for reporting and reprints.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSale {
    /// Order id assigned by the commerce backend.
    pub order_id: String,
    pub receipt_number: String,
    pub cashier_id: String,
    pub customer_id: Option<String>,
    pub lines: Vec<LineItem>,
    pub figures: FinalizedSale,

    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

/// Takings through one payment method.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MethodTotal {
    pub method: PaymentMethod,
    pub total: Money,
    pub entry_count: usize,
}

/// Units moved of one product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub total: Money,
}

/// One day's sales rollup.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    #[ts(as = "String")]
    pub date: NaiveDate,

    pub sale_count: usize,

    /// Σ final amounts across all sales.
    pub gross: Money,

    /// Σ payments actually recorded, which can differ from gross when
    /// sales completed underpaid or with change given.
    pub total_collected: Money,

    /// Takings by method, in [`PaymentMethod::ALL`] order. Methods with
    /// no entries are omitted.
    pub by_method: Vec<MethodTotal>,

    /// Per-product quantities, highest total first.
    pub products: Vec<ProductSales>,
}

impl SalesReport {
    /// Builds the rollup for `date` from the day's completed sales.
    pub fn build(date: NaiveDate, sales: &[CompletedSale]) -> Self {
        let gross = sales.iter().map(|s| s.figures.final_amount).sum();
        let total_collected = sales.iter().map(|s| s.figures.total_paid).sum();

        let by_method = PaymentMethod::ALL
            .iter()
            .filter_map(|&method| {
                let entries: Vec<Money> = sales
                    .iter()
                    .flat_map(|s| &s.figures.payments)
                    .filter(|p| p.method == method)
                    .map(|p| p.amount)
                    .collect();

                if entries.is_empty() {
                    return None;
                }

                Some(MethodTotal {
                    method,
                    total: entries.iter().copied().sum(),
                    entry_count: entries.len(),
                })
            })
            .collect();

        let mut products: Vec<ProductSales> = Vec::new();
        for line in sales.iter().flat_map(|s| &s.lines) {
            match products.iter_mut().find(|p| p.product_id == line.product_id) {
                Some(existing) => {
                    existing.quantity += line.quantity;
                    existing.total += line.line_total();
                }
                None => products.push(ProductSales {
                    product_id: line.product_id.clone(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    total: line.line_total(),
                }),
            }
        }
        products.sort_by(|a, b| b.total.cmp(&a.total));

        SalesReport {
            date,
            sale_count: sales.len(),
            gross,
            total_collected,
            by_method,
            products,
        }
    }
}
