// SPDX-License-Identifier: MIT OR Apache-2.0
//! The `PoItem` entity (spec.md §3, §6.1).

use serde::{Deserialize, Serialize};

use crate::invoice::LineItem;

/// A purchase-order line, as read from `json_files/POs/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoItem {
    /// Purchase-order number, matched against
    /// [`crate::Invoice::purchase_order_number`].
    pub po_number: String,
    /// The governing contract's identifier.
    pub contract_id: String,
    /// `YYYY-MM-DD`; the PO is not effective before this date.
    #[serde(default)]
    pub effective_date: Option<String>,
    /// Ceiling on total spend under this PO. Invariant (spec.md §3):
    /// `sum(line_items.line_total) <= total_value`.
    pub total_value: f64,
    /// Free-text description of the PO's scope.
    #[serde(default)]
    pub description: String,
    /// Line-level detail; may be empty.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl PoItem {
    /// Sum of `line_items.line_total`.
    #[must_use]
    pub fn line_items_total(&self) -> f64 {
        self.line_items.iter().map(|l| l.line_total).sum()
    }

    /// Whether `sum(line_items.line_total) <= total_value`.
    #[must_use]
    pub fn line_items_within_total_value(&self) -> bool {
        crate::invoice::round2(self.line_items_total()) <= crate::invoice::round2(self.total_value)
    }
}
