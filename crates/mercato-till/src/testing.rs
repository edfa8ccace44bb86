//! In-memory fakes for the collaborator traits, plus fixture helpers.
//! Everything here is test-only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use mercato_client::api::{
    CatalogApi, OrderApi, OrderConfirmation, OrderDraft, PastOrder, PastOrderLine, PrintBridge,
    StoreApi,
};
use mercato_client::error::{ClientError, ClientResult};
use mercato_core::account::AccountTransaction;
use mercato_core::checkout::CheckoutPolicy;
use mercato_core::drawer::{DrawerSession, DrawerTransaction};
use mercato_core::money::Money;
use mercato_core::receipt::ReceiptData;
use mercato_core::types::{
    Category, Customer, CustomerType, Discount, Product, Settings, User, UserRole,
};

use crate::state::Till;

pub(crate) fn product(id: &str, price_cents: i64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        barcode: Some(format!("bar-{id}")),
        price: Money::from_cents(price_cents),
        stock_quantity: 100,
        category_id: "cat-1".to_string(),
        image_url: None,
        description: None,
        cost_price: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn user(role: UserRole) -> User {
    User {
        id: "user-1".to_string(),
        name: "Dana".to_string(),
        email: "dana@example.com".to_string(),
        role,
    }
}

/// Customer id used by [`wholesale_customer`]. Store ids are UUIDs.
pub(crate) const WHOLESALE_CUSTOMER_ID: &str = "4d6f2c1a-9b3e-4f5a-8c7d-2e1b0a9f8d3c";

pub(crate) fn wholesale_customer(discount: Option<Discount>) -> Customer {
    Customer {
        id: WHOLESALE_CUSTOMER_ID.to_string(),
        name: "Acme Ltd".to_string(),
        phone: None,
        email: None,
        address: None,
        notes: None,
        customer_type: CustomerType::Wholesale,
        discount,
        total_purchases: Money::zero(),
        last_visit: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn unavailable(endpoint: &str) -> ClientError {
    ClientError::UnexpectedStatus {
        status: 503,
        endpoint: endpoint.to_string(),
        body: "induced failure".to_string(),
    }
}

#[derive(Default)]
pub(crate) struct MockCatalog {
    pub products: Vec<Product>,
    pub stock_updates: Mutex<Vec<(String, i64)>>,
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn products(&self) -> ClientResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        Ok(vec![Category {
            id: "cat-1".to_string(),
            name: "General".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }])
    }

    async fn update_stock(&self, product_id: &str, stock_quantity: i64) -> ClientResult<()> {
        self.stock_updates
            .lock()
            .unwrap()
            .push((product_id.to_string(), stock_quantity));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockOrders {
    pub fail_create: AtomicBool,
    pub created: Mutex<Vec<OrderDraft>>,
    pub past: Mutex<HashMap<String, PastOrder>>,
    next_id: AtomicU64,
}

#[async_trait]
impl OrderApi for MockOrders {
    async fn create_order(&self, draft: &OrderDraft) -> ClientResult<OrderConfirmation> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(unavailable("/orders"));
        }

        let id = (1000 + self.next_id.fetch_add(1, Ordering::SeqCst)).to_string();
        self.created.lock().unwrap().push(draft.clone());
        self.past.lock().unwrap().insert(
            id.clone(),
            PastOrder {
                order_id: id.clone(),
                status: "completed".to_string(),
                total: draft.figures.final_amount,
                lines: draft
                    .lines
                    .iter()
                    .map(|l| PastOrderLine {
                        product_id: l.product_id.clone(),
                        name: l.name.clone(),
                        quantity: l.quantity,
                        line_total: l.line_total(),
                    })
                    .collect(),
                payments: draft.figures.payments.clone(),
                created_at: Utc::now(),
            },
        );

        Ok(OrderConfirmation {
            order_id: id,
            status: "completed".to_string(),
            created_at: Utc::now(),
        })
    }

    async fn order(&self, order_id: &str) -> ClientResult<PastOrder> {
        self.past
            .lock()
            .unwrap()
            .get(order_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("/orders/{order_id}")))
    }

    async fn recent_orders(&self, limit: usize) -> ClientResult<Vec<PastOrder>> {
        Ok(self.past.lock().unwrap().values().take(limit).cloned().collect())
    }
}

#[derive(Default)]
pub(crate) struct MockStore {
    pub fail_save: AtomicBool,
    pub customers: Vec<Customer>,
    pub saved_sessions: Mutex<Vec<DrawerSession>>,
    pub drawer_transactions: Mutex<Vec<(String, DrawerTransaction)>>,
    pub account_entries: Vec<AccountTransaction>,
}

#[async_trait]
impl StoreApi for MockStore {
    async fn customers(&self) -> ClientResult<Vec<Customer>> {
        Ok(self.customers.clone())
    }

    async fn settings(&self) -> ClientResult<Settings> {
        Ok(Settings::default())
    }

    async fn save_drawer_session(&self, session: &DrawerSession) -> ClientResult<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(unavailable("drawer_sessions"));
        }
        self.saved_sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn record_drawer_transaction(
        &self,
        session_id: &str,
        transaction: &DrawerTransaction,
    ) -> ClientResult<()> {
        self.drawer_transactions
            .lock()
            .unwrap()
            .push((session_id.to_string(), transaction.clone()));
        Ok(())
    }

    async fn account_transactions(
        &self,
        customer_id: &str,
    ) -> ClientResult<Vec<AccountTransaction>> {
        Ok(self
            .account_entries
            .iter()
            .filter(|t| t.customer_id == customer_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct MockPrinter {
    pub printed: Mutex<Vec<String>>,
}

#[async_trait]
impl PrintBridge for MockPrinter {
    async fn print(&self, receipt: &ReceiptData) -> ClientResult<()> {
        self.printed.lock().unwrap().push(receipt.receipt_number.clone());
        Ok(())
    }
}

/// A till wired to mocks, with handles kept for inspection.
pub(crate) struct Fixture {
    pub till: Till,
    pub orders: Arc<MockOrders>,
    pub store: Arc<MockStore>,
    pub printer: Arc<MockPrinter>,
}

pub(crate) fn fixture_with(
    products: Vec<Product>,
    customers: Vec<Customer>,
    policy: CheckoutPolicy,
) -> Fixture {
    let catalog = Arc::new(MockCatalog {
        products,
        ..MockCatalog::default()
    });
    let orders = Arc::new(MockOrders::default());
    let store = Arc::new(MockStore {
        customers,
        ..MockStore::default()
    });
    let printer = Arc::new(MockPrinter::default());

    let till = Till::new(catalog, orders.clone(), store.clone(), policy)
        .with_printer(printer.clone());

    Fixture {
        till,
        orders,
        store,
        printer,
    }
}

/// The standard fixture: two products (10.00 and 5.00) and one wholesale
/// customer with a 10% standing discount.
pub(crate) fn fixture() -> Fixture {
    fixture_with(
        vec![product("a", 1000), product("b", 500)],
        vec![wholesale_customer(Some(Discount::Percentage(1000)))],
        CheckoutPolicy::default(),
    )
}

pub(crate) fn test_till() -> Till {
    fixture().till
}
