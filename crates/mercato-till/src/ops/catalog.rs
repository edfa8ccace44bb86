//! Catalog operations: loading products and settings, lookups, barcode
//! scanning.

use serde::Serialize;
use tracing::info;

use mercato_core::cart::CartTotals;
use mercato_core::error::CoreError;
use mercato_core::types::{Category, Product};

use crate::error::TillResult;
use crate::state::Till;

/// What a catalog refresh brought in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub product_count: usize,
    pub category_count: usize,
}

impl Till {
    /// Refreshes products, categories, and settings from the collaborators.
    ///
    /// The previous catalog stays in place if any fetch fails, so a flaky
    /// network cannot blank out an operating till.
    pub async fn load_catalog(&self) -> TillResult<CatalogSummary> {
        let products = self.catalog.products().await?;
        let categories = self.catalog.categories().await?;
        let settings = self.store.settings().await?;

        let summary = CatalogSummary {
            product_count: products.len(),
            category_count: categories.len(),
        };
        info!(
            products = summary.product_count,
            categories = summary.category_count,
            "catalog loaded"
        );

        self.with_state_mut(|state| {
            state.products = products;
            state.categories = categories;
            state.settings = settings;
        });

        Ok(summary)
    }

    pub fn products(&self) -> Vec<Product> {
        self.with_state(|state| state.products.clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.with_state(|state| state.categories.clone())
    }

    pub fn products_in_category(&self, category_id: &str) -> Vec<Product> {
        self.with_state(|state| {
            state
                .products
                .iter()
                .filter(|p| p.category_id == category_id)
                .cloned()
                .collect()
        })
    }

    /// Looks a product up by barcode and drops it straight into the cart,
    /// which is what a physical scan does.
    pub fn scan_barcode(&self, barcode: &str) -> TillResult<CartTotals> {
        let product = self
            .with_state(|state| {
                state
                    .products
                    .iter()
                    .find(|p| p.barcode.as_deref() == Some(barcode))
                    .cloned()
            })
            .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))?;

        self.add_to_cart(&product.id)
    }
}
