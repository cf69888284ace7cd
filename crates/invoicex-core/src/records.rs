// SPDX-License-Identifier: MIT OR Apache-2.0
//! The two durable record types triage writes, and the small enums
//! that parametrize them (spec.md §3, §4.8, §6.2–§6.4).

use std::fmt;

use serde::{Deserialize, Serialize};

/// One append-only line in `system_logs/processed_invoices.log`
/// (spec.md §3, §4.7). Never mutated once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedInvoiceRecord {
    /// RFC3339 UTC timestamp of when this record was appended.
    pub timestamp: String,
    /// The invoice's `invoice_id`.
    pub invoice_id: String,
    /// Supplier name as stated on the invoice.
    pub supplier_name: String,
    /// Vendor ID as stated on the invoice.
    pub vendor_id: String,
    /// Same value as `invoice_id` — the source tooling's duplicate
    /// fingerprint uses `invoice_id` as the invoice number.
    pub invoice_number: String,
    /// Invoice's `summary.billing_amount`.
    pub billing_amount: f64,
    /// Invoice's `purchase_order_number`.
    pub po_number: String,
    /// The disposition this processing run ended in, e.g.
    /// `"APPROVED"`, `"REJECTED_PRICE_DISCREPANCIES"`,
    /// `"PENDING_MANAGER_APPROVAL"`.
    pub processing_result: String,
    /// `invoice.line_items.len()`.
    pub line_items_count: usize,
    /// Invoice's `issue_date`.
    pub issue_date: String,
}

/// Named exception queues, in the triage priority order they are
/// tried (spec.md §4.8, extended by the two supplemental validators
/// in §2 of the expanded spec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Queue {
    /// Rule 1: duplicate detector FAIL.
    DuplicateInvoices,
    /// Rule 2: resolver dependency FAIL.
    MissingData,
    /// Rule 3: `overall_confidence < 0.7`.
    LowConfidenceMatches,
    /// Rule 4: line-item reconciliation FAIL.
    PriceDiscrepancies,
    /// Rule 5: supplier-match FAIL.
    SupplierMismatch,
    /// Rule 6: billing-arithmetic FAIL.
    BillingDiscrepancies,
    /// Rule 7: date-validation FAIL.
    DateDiscrepancies,
    /// Rule 8 (supplemental): currency-validation FAIL.
    CurrencyDiscrepancies,
    /// Rule 9 (supplemental): payment-terms-validation FAIL.
    PaymentTermsDiscrepancies,
    /// Rule 10: all PASS, but high-value or low-confidence.
    HighValueApproval,
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DuplicateInvoices => "duplicate_invoices",
            Self::MissingData => "missing_data",
            Self::LowConfidenceMatches => "low_confidence_matches",
            Self::PriceDiscrepancies => "price_discrepancies",
            Self::SupplierMismatch => "supplier_mismatch",
            Self::BillingDiscrepancies => "billing_discrepancies",
            Self::DateDiscrepancies => "date_discrepancies",
            Self::CurrencyDiscrepancies => "currency_discrepancies",
            Self::PaymentTermsDiscrepancies => "payment_terms_discrepancies",
            Self::HighValueApproval => "high_value_approval",
        };
        f.write_str(name)
    }
}

/// Queue priority (spec.md §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// No manager-approval queues use this today, but the field exists
    /// in the canonical record format (spec.md §6.2).
    Low,
    /// `supplier_mismatch`, `date_discrepancies`,
    /// `currency_discrepancies`, `payment_terms_discrepancies`.
    Medium,
    /// Every other rejection/approval queue.
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

/// Terminal disposition a triage decision ends in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Routed to an exception queue; needs human follow-up.
    Rejected,
    /// All validators passed, but routed to manager approval anyway
    /// (high value or below-0.9 confidence).
    PendingApproval,
    /// All validators passed; appended to the payments log.
    Approved,
}

impl Disposition {
    /// The `processing_result` string recorded in the
    /// [`ProcessedInvoiceRecord`] for this disposition.
    #[must_use]
    pub fn processing_result(self, queue: Option<Queue>) -> String {
        match self {
            Self::Approved => "APPROVED".to_string(),
            Self::PendingApproval => "PENDING_MANAGER_APPROVAL".to_string(),
            Self::Rejected => {
                let queue_name = queue.map(|q| q.to_string()).unwrap_or_default();
                format!("REJECTED_{}", queue_name.to_uppercase())
            }
        }
    }
}

/// The canonical, delimited-text exception record written to
/// `system_logs/queue_<queue>.log` (spec.md §6.2). `invoicex-ledger`
/// owns serializing/parsing this to the exact wire format; this struct
/// is the in-memory model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionRecord {
    /// `EXC-` plus 12 uppercase hex characters.
    pub exception_id: String,
    /// Always `"VALIDATION_FAILED"`.
    pub exception_type: String,
    /// Always `"OPEN"` at creation; records are never mutated by the pipeline.
    pub status: String,
    /// Destination queue.
    pub queue: Queue,
    /// Queue priority.
    pub priority: Priority,
    /// RFC3339 UTC creation timestamp.
    pub timestamp: String,
    /// Invoice's `invoice_id`.
    pub invoice_id: String,
    /// Invoice's `purchase_order_number`, or `"N/A"` if absent.
    pub po_number: String,
    /// `summary.billing_amount` formatted as `$n,nnn.nn`, or `"N/A"`.
    pub amount: String,
    /// Invoice's `supplier_info.name`.
    pub supplier: String,
    /// One-line free-text explanation of why this queue was chosen.
    pub routing_reason: String,
    /// Whether a human manager must approve before this exception is resolved.
    pub manager_approval_required: bool,
    /// Ordered `field: value` pairs specific to the failing validator(s).
    pub validation_details: Vec<(String, String)>,
    /// Free-text multi-line context block.
    pub context: String,
    /// Suggested follow-up actions, rendered as a bullet list.
    pub suggested_actions: Vec<String>,
    /// Ordered `key: value` metadata pairs.
    pub metadata: Vec<(String, String)>,
}
