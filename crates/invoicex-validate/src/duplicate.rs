// SPDX-License-Identifier: MIT OR Apache-2.0
//! Duplicate invoice detection (spec.md §4.5.5). Scores the current
//! invoice against every record in the processed-invoice log and
//! reports the single highest-confidence match.

use invoicex_core::{Invoice, ProcessedInvoiceRecord, StructuredException, ValidationResult};

const POSSIBLE_DUPLICATE_THRESHOLD: f64 = 0.5;
const POTENTIAL_DUPLICATE_THRESHOLD: f64 = 0.8;

/// Score `invoice` against every prior `processed` record and emit
/// `potential_duplicate` (FAIL) above 0.8, `possible_duplicate` (PASS
/// annotation) above 0.5, or PASS silently otherwise. Does not require
/// a resolved PO/contract, matching spec.md §4.6's dependency-check
/// carve-out for the duplicate detector.
#[must_use]
pub fn check_for_duplicates(invoice: &Invoice, processed: &[ProcessedInvoiceRecord]) -> ValidationResult {
    let mut highest_confidence = 0.0_f64;
    let mut best_reasons: Vec<String> = Vec::new();

    for record in processed {
        let confidence = duplicate_confidence(invoice, record);
        if confidence > highest_confidence {
            highest_confidence = confidence;
            best_reasons = match_reasons(invoice, record);
        }
    }

    if highest_confidence > POTENTIAL_DUPLICATE_THRESHOLD {
        return ValidationResult::new(
            "duplicate_invoice_check",
            vec![StructuredException::PotentialDuplicate {
                confidence: highest_confidence,
                match_reasons: best_reasons,
            }],
        );
    }

    if highest_confidence > POSSIBLE_DUPLICATE_THRESHOLD {
        return ValidationResult::new(
            "duplicate_invoice_check",
            vec![StructuredException::PossibleDuplicate {
                confidence: highest_confidence,
                match_reasons: best_reasons,
            }],
        );
    }

    ValidationResult::new("duplicate_invoice_check", Vec::new())
}

/// Weighted composite duplicate-confidence score, capped at 1.0:
/// supplier name 0.3, vendor_id 0.2, invoice_id 0.4, billing_amount
/// within 1¢ 0.1, PO number 0.1.
fn duplicate_confidence(invoice: &Invoice, record: &ProcessedInvoiceRecord) -> f64 {
    let mut confidence = 0.0;

    if invoice.supplier_info.name.to_lowercase() == record.supplier_name.to_lowercase() {
        confidence += 0.3;
    }
    if invoice.supplier_info.vendor_id == record.vendor_id {
        confidence += 0.2;
    }
    if invoice.invoice_id == record.invoice_id {
        confidence += 0.4;
    }
    if (invoice.summary.billing_amount - record.billing_amount).abs() < 0.01 {
        confidence += 0.1;
    }
    if invoice.purchase_order_number == record.po_number {
        confidence += 0.1;
    }

    confidence.min(1.0)
}

/// Human-readable match reasons. `record`'s fields are flat (it is a
/// [`ProcessedInvoiceRecord`], not an [`Invoice`]) — this mirrors the
/// source tool's cross-shape field comparison rather than a symmetric
/// field-for-field diff.
fn match_reasons(invoice: &Invoice, record: &ProcessedInvoiceRecord) -> Vec<String> {
    let mut reasons = Vec::new();

    if invoice.supplier_info.name == record.supplier_name {
        reasons.push("Same supplier name".to_string());
    }
    if invoice.supplier_info.vendor_id == record.vendor_id {
        reasons.push("Same vendor ID".to_string());
    }
    if invoice.invoice_id == record.invoice_number {
        reasons.push("Same invoice number".to_string());
    }
    if (invoice.summary.billing_amount - record.billing_amount).abs() < 0.01 {
        reasons.push("Same billing amount".to_string());
    }
    if invoice.purchase_order_number == record.po_number {
        reasons.push("Same PO number".to_string());
    }

    reasons
}
