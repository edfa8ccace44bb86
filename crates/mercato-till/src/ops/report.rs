//! Reporting operations.

use chrono::Utc;

use mercato_core::auth::Permission;
use mercato_core::report::SalesReport;

use crate::error::TillResult;
use crate::state::Till;

impl Till {
    /// Today's sales rollup from this till's completed sales.
    pub fn daily_report(&self) -> TillResult<SalesReport> {
        self.require_permission(Permission::ViewReports)?;
        let today = Utc::now().date_naive();

        Ok(self.with_state(|state| {
            let todays: Vec<_> = state
                .completed_sales
                .iter()
                .filter(|s| s.completed_at.date_naive() == today)
                .cloned()
                .collect();
            SalesReport::build(today, &todays)
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorCode;
    use crate::testing::{fixture, user};
    use mercato_core::types::{PaymentMethod, UserRole};

    #[tokio::test]
    async fn test_daily_report_covers_completed_sales() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Cashier));
        f.till.load_catalog().await.unwrap();

        for _ in 0..2 {
            f.till.add_to_cart("a").unwrap();
            f.till.begin_checkout().unwrap();
            f.till.add_payment(PaymentMethod::Cash, "10").unwrap();
            f.till.complete_sale().await.unwrap();
        }

        let report = f.till.daily_report().unwrap();
        assert_eq!(report.sale_count, 2);
        assert_eq!(report.gross.cents(), 2000);
        assert_eq!(report.by_method.len(), 1);
        assert_eq!(report.by_method[0].method, PaymentMethod::Cash);
        assert_eq!(report.products[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_report_requires_permission() {
        let f = fixture();
        f.till.sign_in(user(UserRole::Inventory));

        let err = f.till.daily_report().unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
