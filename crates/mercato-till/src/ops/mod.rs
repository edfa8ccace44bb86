//! Till operations, grouped by concern. Each submodule is an `impl` block
//! on [`crate::state::Till`].

mod cart;
mod catalog;
mod customer;
mod drawer;
mod orders;
mod report;
mod sale;

pub use catalog::CatalogSummary;
pub use sale::SaleOutcome;
