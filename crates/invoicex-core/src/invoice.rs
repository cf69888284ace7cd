// SPDX-License-Identifier: MIT OR Apache-2.0
//! The `Invoice` entity and its nested value types (spec.md §3, §6.1).

use serde::{Deserialize, Serialize};

/// An incoming invoice document, as read from `json_files/invoices/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// The invoice's own identifier. Doubles as "invoice number" in the
    /// source tooling's duplicate-detection fingerprint.
    pub invoice_id: String,
    /// The PO number the invoice claims to be billing against.
    pub purchase_order_number: String,
    /// Supplier (vendor) identity as stated on the invoice.
    pub supplier_info: SupplierInfo,
    /// The billed-to party as stated on the invoice.
    pub bill_to_info: BillToInfo,
    /// `YYYY-MM-DD`.
    pub issue_date: String,
    /// `YYYY-MM-DD`.
    pub due_date: String,
    /// Free text, e.g. `"Net 30"`.
    pub payment_terms: String,
    /// ISO-4217-shaped currency code, e.g. `"USD"`.
    #[serde(default)]
    pub currency: Option<String>,
    /// Subtotal/tax/billing-amount roll-up.
    pub summary: InvoiceSummary,
    /// Line-level detail; may be empty.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// Supplier identity on an [`Invoice`] or [`crate::Contract`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierInfo {
    /// Display name.
    pub name: String,
    /// Vendor ID assigned by the buyer's system of record.
    pub vendor_id: String,
}

/// Bill-to party on an [`Invoice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillToInfo {
    /// Display name.
    pub name: String,
}

/// Invoice-level monetary roll-up. Invariant (spec.md §3): `subtotal +
/// tax_amount == billing_amount` to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    /// Sum of line totals before tax.
    pub subtotal: f64,
    /// Tax charged.
    pub tax_amount: f64,
    /// Amount actually billed; should equal `subtotal + tax_amount`.
    pub billing_amount: f64,
}

/// A single line item, shared shape between [`Invoice`] and
/// [`crate::PoItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable identifier correlating invoice and PO lines.
    #[serde(default)]
    pub item_id: Option<String>,
    /// Free-text description, used for Jaccard-similarity matching
    /// when `item_id` correlation is unavailable.
    #[serde(default)]
    pub description: String,
    /// Units billed/ordered.
    pub quantity: f64,
    /// Price per unit.
    pub unit_price: f64,
    /// `quantity * unit_price`, restated explicitly by the source
    /// documents rather than derived, so it can itself be checked.
    pub line_total: f64,
}

impl InvoiceSummary {
    /// Whether `subtotal + tax_amount == billing_amount` to 2 decimal places.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        round2(self.subtotal + self.tax_amount) == round2(self.billing_amount)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
