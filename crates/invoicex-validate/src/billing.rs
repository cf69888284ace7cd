// SPDX-License-Identifier: MIT OR Apache-2.0
//! Billing arithmetic and overbilling (spec.md §4.5.2).

use invoicex_core::{Invoice, PoItem, StructuredException, ValidationResult};

use crate::round2;

/// `subtotal + tax_amount == billing_amount` (to 2 dp), and
/// `billing_amount <= po_item.total_value`.
#[must_use]
pub fn validate_billing(invoice: &Invoice, po_item: &PoItem) -> ValidationResult {
    let mut exceptions = Vec::new();
    let summary = &invoice.summary;

    if !summary.is_consistent() {
        let expected = round2(summary.subtotal + summary.tax_amount);
        exceptions.push(StructuredException::BillingAmountMismatch {
            subtotal: summary.subtotal,
            tax_amount: summary.tax_amount,
            billing_amount: summary.billing_amount,
            expected_billing_amount: expected,
            difference: round2(summary.billing_amount - expected),
        });
    }

    if summary.billing_amount > po_item.total_value {
        exceptions.push(StructuredException::InvoiceExceedsPo {
            billing_amount: summary.billing_amount,
            po_total_value: po_item.total_value,
            excess: round2(summary.billing_amount - po_item.total_value),
        });
    }

    ValidationResult::new("billing_arithmetic", exceptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicex_core::{BillToInfo, InvoiceSummary, SupplierInfo};

    fn invoice(subtotal: f64, tax: f64, billing: f64) -> Invoice {
        Invoice {
            invoice_id: "INV-1".into(),
            purchase_order_number: "PO-1".into(),
            supplier_info: SupplierInfo { name: "Acme".into(), vendor_id: "V-1".into() },
            bill_to_info: BillToInfo { name: "Client".into() },
            issue_date: "2024-06-01".into(),
            due_date: "2024-07-01".into(),
            payment_terms: "Net 30".into(),
            currency: Some("USD".into()),
            summary: InvoiceSummary { subtotal, tax_amount: tax, billing_amount: billing },
            line_items: vec![],
        }
    }

    fn po(total_value: f64) -> PoItem {
        PoItem {
            po_number: "PO-1".into(),
            contract_id: "C-1".into(),
            effective_date: None,
            total_value,
            description: String::new(),
            line_items: vec![],
        }
    }

    #[test]
    fn consistent_billing_within_po_passes() {
        let result = validate_billing(&invoice(900.0, 100.0, 1000.0), &po(1000.0));
        assert!(result.is_pass());
    }

    #[test]
    fn arithmetic_mismatch_fails() {
        let result = validate_billing(&invoice(900.0, 100.0, 1100.0), &po(2000.0));
        assert!(!result.is_pass());
        assert_eq!(result.exceptions[0].kind(), "billing_amount_mismatch");
    }

    #[test]
    fn overbilling_beyond_po_fails() {
        let result = validate_billing(&invoice(900.0, 100.0, 1000.0), &po(500.0));
        assert!(!result.is_pass());
        assert!(result.exceptions.iter().any(|e| e.kind() == "invoice_exceeds_po"));
    }

    #[test]
    fn both_failures_reported_together() {
        let result = validate_billing(&invoice(900.0, 100.0, 1500.0), &po(500.0));
        assert_eq!(result.exceptions.len(), 2);
    }
}
