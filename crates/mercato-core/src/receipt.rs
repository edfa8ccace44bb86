//! # Receipt
//!
//! Assembles the printable receipt for a completed sale. Rendering and the
//! physical printer live outside the core; this module only produces the
//! data and a plain-text fallback used by the print bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::LineItem;
use crate::checkout::FinalizedSale;
use crate::money::Money;
use crate::types::{PaymentEntry, Settings};

/// Everything a receipt renderer needs for one sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    pub receipt_number: String,
    pub store_name: String,
    pub store_address: Option<String>,
    pub store_phone: Option<String>,
    pub store_vat: Option<String>,
    pub cashier_name: String,
    pub customer_name: Option<String>,
    pub lines: Vec<LineItem>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub final_amount: Money,
    pub payments: Vec<PaymentEntry>,
    pub total_paid: Money,

    /// Change handed back, never negative.
    pub change_due: Money,

    pub footer_text: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,

    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
}

impl ReceiptData {
    /// Assembles receipt data from the finalized figures and the store's
    /// display settings. Optional store fields follow the receipt toggles.
    pub fn assemble(
        receipt_number: String,
        settings: &Settings,
        cashier_name: String,
        customer_name: Option<String>,
        lines: Vec<LineItem>,
        figures: &FinalizedSale,
    ) -> Self {
        let store = &settings.store;
        let toggles = &settings.receipt;

        ReceiptData {
            receipt_number,
            store_name: store.name.clone(),
            store_address: toggles.show_address.then(|| store.address.clone()),
            store_phone: toggles.show_phone.then(|| store.phone.clone()),
            store_vat: toggles.show_vat.then(|| store.vat.clone()),
            cashier_name,
            customer_name,
            lines,
            subtotal: figures.subtotal,
            discount_amount: figures.discount_amount,
            final_amount: figures.final_amount,
            payments: figures.payments.clone(),
            total_paid: figures.total_paid,
            change_due: figures.change_due,
            footer_text: toggles.footer_text.clone(),
            currency_symbol: settings.localization.currency_symbol.clone(),
            currency_decimals: settings.localization.currency_decimals,
            issued_at: Utc::now(),
        }
    }

    fn amount(&self, value: Money) -> String {
        value.format_with(&self.currency_symbol, self.currency_decimals)
    }

    /// Renders a plain-text receipt for printers without a template engine.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let push = |out: &mut String, line: &str| {
            out.push_str(line);
            out.push('\n');
        };

        push(&mut out, &self.store_name);
        if let Some(address) = &self.store_address {
            push(&mut out, address);
        }
        if let Some(phone) = &self.store_phone {
            push(&mut out, phone);
        }
        if let Some(vat) = &self.store_vat {
            push(&mut out, &format!("VAT: {vat}"));
        }
        push(&mut out, &format!("Receipt {}", self.receipt_number));
        push(&mut out, &format!("Cashier: {}", self.cashier_name));
        if let Some(customer) = &self.customer_name {
            push(&mut out, &format!("Customer: {customer}"));
        }
        push(&mut out, "--------------------------------");

        for line in &self.lines {
            push(
                &mut out,
                &format!(
                    "{} x{}  {}",
                    line.name,
                    line.quantity,
                    self.amount(line.line_total())
                ),
            );
        }

        push(&mut out, "--------------------------------");
        push(&mut out, &format!("Subtotal  {}", self.amount(self.subtotal)));
        if !self.discount_amount.is_zero() {
            push(
                &mut out,
                &format!("Discount  -{}", self.amount(self.discount_amount)),
            );
        }
        push(&mut out, &format!("Total     {}", self.amount(self.final_amount)));

        for payment in &self.payments {
            push(
                &mut out,
                &format!("{:?}  {}", payment.method, self.amount(payment.amount)),
            );
        }
        if !self.change_due.is_zero() {
            push(&mut out, &format!("Change    {}", self.amount(self.change_due)));
        }

        push(&mut out, &self.footer_text);
        out
    }
}
