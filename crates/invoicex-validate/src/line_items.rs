// SPDX-License-Identifier: MIT OR Apache-2.0
//! Line-item reconciliation (spec.md §4.5.4). Four scenarios depending
//! on which side carries line items; the richest path — both sides
//! populated — correlates lines by `item_id` first, then by
//! description Jaccard word-overlap among PO lines not yet matched.

use std::collections::HashSet;

use invoicex_core::{Invoice, LineItem, PoItem, Severity, StructuredException, ValidationResult};

use crate::round2;

const DESCRIPTION_FUZZY_THRESHOLD: f64 = 0.8;
const INVOICE_ONLY_DESCRIPTION_THRESHOLD: f64 = 0.3;
const TOTAL_TOLERANCE: f64 = 0.01;

/// Reconcile `invoice.line_items` against `po_item.line_items`,
/// dispatching to one of the four scenarios spec.md §4.5.4 describes.
#[must_use]
pub fn validate_line_items(invoice: &Invoice, po_item: &PoItem) -> ValidationResult {
    let has_invoice_lines = !invoice.line_items.is_empty();
    let has_po_lines = !po_item.line_items.is_empty();

    match (has_invoice_lines, has_po_lines) {
        (false, false) => ValidationResult::new("line_item_reconciliation", Vec::new()),
        (false, true) => validate_invoice_total_against_po_lines(invoice, po_item),
        (true, false) => validate_invoice_lines_against_po_description(invoice, po_item),
        (true, true) => validate_both_have_lines(invoice, po_item),
    }
}

fn validate_invoice_total_against_po_lines(invoice: &Invoice, po_item: &PoItem) -> ValidationResult {
    let mut exceptions = Vec::new();
    let po_lines_total = po_item.line_items_total();
    let invoice_total = invoice.summary.billing_amount;

    if (invoice_total - po_lines_total).abs() > TOTAL_TOLERANCE {
        exceptions.push(StructuredException::Freeform(format!(
            "total_mismatch: invoice_total={invoice_total:.2} po_lines_total={po_lines_total:.2} difference={:.2}",
            round2(invoice_total - po_lines_total)
        )));
    }

    if invoice_total > po_item.total_value {
        exceptions.push(StructuredException::InvoiceExceedsPo {
            billing_amount: invoice_total,
            po_total_value: po_item.total_value,
            excess: round2(invoice_total - po_item.total_value),
        });
    }

    ValidationResult::new("line_item_reconciliation", exceptions)
}

fn validate_invoice_lines_against_po_description(invoice: &Invoice, po_item: &PoItem) -> ValidationResult {
    let mut exceptions = Vec::new();
    let invoice_lines_total: f64 = invoice.line_items.iter().map(|l| l.line_total).sum();
    let billing_amount = invoice.summary.billing_amount;

    if (invoice_lines_total - billing_amount).abs() > TOTAL_TOLERANCE {
        exceptions.push(StructuredException::Freeform(format!(
            "line_items_billing_mismatch: line_items_total={invoice_lines_total:.2} billing_amount={billing_amount:.2} difference={:.2}",
            round2(invoice_lines_total - billing_amount)
        )));
    }

    if billing_amount > po_item.total_value {
        exceptions.push(StructuredException::InvoiceExceedsPo {
            billing_amount,
            po_total_value: po_item.total_value,
            excess: round2(billing_amount - po_item.total_value),
        });
    }

    for line in &invoice.line_items {
        let similarity = jaccard_word_overlap(&line.description, &po_item.description);
        if similarity < INVOICE_ONLY_DESCRIPTION_THRESHOLD {
            exceptions.push(StructuredException::DescriptionMismatch {
                item_id: line.item_id.clone(),
                invoice_description: line.description.clone(),
                po_description: po_item.description.clone(),
                similarity,
            });
        }
    }

    ValidationResult::new("line_item_reconciliation", exceptions)
}

fn validate_both_have_lines(invoice: &Invoice, po_item: &PoItem) -> ValidationResult {
    let mut exceptions = Vec::new();
    let mut matched_po_indices: HashSet<usize> = HashSet::new();

    for (index, inv_line) in invoice.line_items.iter().enumerate() {
        let Some(item_id) = inv_line.item_id.as_deref() else {
            exceptions.push(StructuredException::InvoiceLineMissingItemId { index });
            continue;
        };

        let po_index = po_item
            .line_items
            .iter()
            .position(|po_line| po_line.item_id.as_deref() == Some(item_id))
            .or_else(|| best_description_match(inv_line, po_item, &matched_po_indices));

        let Some(po_index) = po_index else {
            exceptions.push(StructuredException::LineItemNotFoundOnPo {
                item_id: item_id.to_string(),
                description: inv_line.description.clone(),
            });
            continue;
        };
        matched_po_indices.insert(po_index);
        let po_line = &po_item.line_items[po_index];

        if round2(inv_line.unit_price) != round2(po_line.unit_price) {
            let percent_diff = if po_line.unit_price != 0.0 {
                round2((inv_line.unit_price - po_line.unit_price) / po_line.unit_price * 100.0)
            } else {
                0.0
            };
            exceptions.push(StructuredException::LineItemUnitPrice {
                item_id: item_id.to_string(),
                invoice_value: inv_line.unit_price,
                po_value: po_line.unit_price,
                percent_diff,
            });
        }

        if inv_line.quantity > po_line.quantity {
            exceptions.push(StructuredException::LineItemQuantityMismatch {
                item_id: item_id.to_string(),
                invoice_quantity: inv_line.quantity,
                po_quantity: po_line.quantity,
                severity: Severity::Fail,
            });
        } else if inv_line.quantity < po_line.quantity {
            exceptions.push(StructuredException::LineItemQuantityMismatch {
                item_id: item_id.to_string(),
                invoice_quantity: inv_line.quantity,
                po_quantity: po_line.quantity,
                severity: Severity::Info,
            });
        }

        let expected_total = round2(inv_line.unit_price * inv_line.quantity);
        if round2(inv_line.line_total) != expected_total {
            exceptions.push(StructuredException::LineItemTotalMismatch {
                item_id: item_id.to_string(),
                invoice_value: inv_line.line_total,
                expected_value: expected_total,
                difference: round2(inv_line.line_total - expected_total),
            });
        }
    }

    for (index, po_line) in po_item.line_items.iter().enumerate() {
        if matched_po_indices.contains(&index) {
            continue;
        }
        let Some(po_item_id) = &po_line.item_id else {
            continue;
        };
        exceptions.push(StructuredException::UninvoicedItem {
            po_item_id: po_item_id.clone(),
            description: po_line.description.clone(),
            unit_price: po_line.unit_price,
            line_total: po_line.line_total,
        });
    }

    ValidationResult::new("line_item_reconciliation", exceptions)
}

fn best_description_match(
    inv_line: &LineItem,
    po_item: &PoItem,
    already_matched: &HashSet<usize>,
) -> Option<usize> {
    if inv_line.description.is_empty() {
        return None;
    }

    let mut best_index = None;
    let mut best_similarity = DESCRIPTION_FUZZY_THRESHOLD;
    for (index, po_line) in po_item.line_items.iter().enumerate() {
        if already_matched.contains(&index) || po_line.description.is_empty() {
            continue;
        }
        let similarity = jaccard_word_overlap(&inv_line.description, &po_line.description);
        if similarity >= best_similarity {
            best_similarity = similarity;
            best_index = Some(index);
        }
    }
    best_index
}

/// Jaccard similarity over lowercase whitespace-split word sets.
fn jaccard_word_overlap(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let set_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let set_b: HashSet<&str> = b_lower.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicex_core::{BillToInfo, InvoiceSummary, SupplierInfo};

    fn base_invoice(line_items: Vec<LineItem>, billing_amount: f64) -> Invoice {
        Invoice {
            invoice_id: "INV-1".into(),
            purchase_order_number: "PO-1".into(),
            supplier_info: SupplierInfo { name: "Acme".into(), vendor_id: "V-1".into() },
            bill_to_info: BillToInfo { name: "Client".into() },
            issue_date: "2024-06-01".into(),
            due_date: "2024-07-01".into(),
            payment_terms: "Net 30".into(),
            currency: Some("USD".into()),
            summary: InvoiceSummary {
                subtotal: billing_amount,
                tax_amount: 0.0,
                billing_amount,
            },
            line_items,
        }
    }

    fn base_po(line_items: Vec<LineItem>, total_value: f64, description: &str) -> PoItem {
        PoItem {
            po_number: "PO-1".into(),
            contract_id: "C-1".into(),
            effective_date: None,
            total_value,
            description: description.into(),
            line_items,
        }
    }

    fn line(item_id: &str, description: &str, qty: f64, price: f64) -> LineItem {
        LineItem {
            item_id: Some(item_id.into()),
            description: description.into(),
            quantity: qty,
            unit_price: price,
            line_total: qty * price,
        }
    }

    #[test]
    fn neither_has_lines_passes() {
        let result = validate_line_items(&base_invoice(vec![], 1000.0), &base_po(vec![], 1000.0, ""));
        assert!(result.is_pass());
        assert!(result.exceptions.is_empty());
    }

    #[test]
    fn po_only_validates_invoice_total_against_po_lines() {
        let po_lines = vec![line("A", "Widget", 10.0, 100.0)];
        let result = validate_line_items(&base_invoice(vec![], 1000.0), &base_po(po_lines, 1000.0, ""));
        assert!(result.is_pass());
    }

    #[test]
    fn po_only_total_mismatch_fails() {
        let po_lines = vec![line("A", "Widget", 10.0, 100.0)];
        let result = validate_line_items(&base_invoice(vec![], 900.0), &base_po(po_lines, 1000.0, ""));
        assert!(!result.is_pass());
    }

    #[test]
    fn invoice_only_validates_against_po_description() {
        let inv_lines = vec![line("A", "Industrial Widget Assembly", 10.0, 100.0)];
        let result = validate_line_items(
            &base_invoice(inv_lines, 1000.0),
            &base_po(vec![], 1000.0, "Industrial Widget Assembly"),
        );
        assert!(result.is_pass());
    }

    #[test]
    fn invoice_only_description_mismatch_fails() {
        let inv_lines = vec![line("A", "Completely Unrelated Service", 10.0, 100.0)];
        let result = validate_line_items(
            &base_invoice(inv_lines, 1000.0),
            &base_po(vec![], 1000.0, "Industrial Widget Assembly"),
        );
        assert!(result.exceptions.iter().any(|e| e.kind() == "description_mismatch"));
    }

    #[test]
    fn both_have_lines_exact_match_passes() {
        let inv_lines = vec![line("A", "Widget", 10.0, 100.0)];
        let po_lines = vec![line("A", "Widget", 10.0, 100.0)];
        let result = validate_line_items(
            &base_invoice(inv_lines, 1000.0),
            &base_po(po_lines, 1000.0, ""),
        );
        assert!(result.is_pass());
    }

    #[test]
    fn both_have_lines_over_quantity_fails() {
        let inv_lines = vec![line("A", "Widget", 12.0, 100.0)];
        let po_lines = vec![line("A", "Widget", 10.0, 100.0)];
        let result = validate_line_items(
            &base_invoice(inv_lines, 1200.0),
            &base_po(po_lines, 1200.0, ""),
        );
        assert!(!result.is_pass());
        assert!(result.exceptions.iter().any(|e| e.kind() == "line_item_quantity_mismatch"));
    }

    #[test]
    fn both_have_lines_under_quantity_is_info_only() {
        let inv_lines = vec![line("A", "Widget", 8.0, 100.0)];
        let po_lines = vec![line("A", "Widget", 10.0, 100.0)];
        let result = validate_line_items(
            &base_invoice(inv_lines, 800.0),
            &base_po(po_lines, 1000.0, ""),
        );
        assert!(result.is_pass());
    }

    #[test]
    fn uninvoiced_po_line_is_info_only() {
        let inv_lines = vec![line("A", "Widget", 10.0, 100.0)];
        let po_lines = vec![line("A", "Widget", 10.0, 100.0), line("B", "Gadget", 5.0, 50.0)];
        let result = validate_line_items(
            &base_invoice(inv_lines, 1000.0),
            &base_po(po_lines, 1250.0, ""),
        );
        assert!(result.is_pass());
        assert!(result.exceptions.iter().any(|e| e.kind() == "uninvoiced_items"));
    }

    #[test]
    fn missing_item_id_on_invoice_line_is_info_only() {
        let inv_lines = vec![LineItem {
            item_id: None,
            description: "Widget".into(),
            quantity: 10.0,
            unit_price: 100.0,
            line_total: 1000.0,
        }];
        let po_lines = vec![line("A", "Widget", 10.0, 100.0)];
        let result = validate_line_items(
            &base_invoice(inv_lines, 1000.0),
            &base_po(po_lines, 1000.0, ""),
        );
        assert!(result.is_pass());
        assert!(result.exceptions.iter().any(|e| e.kind() == "invoice_line_missing_item_id"));
    }

    #[test]
    fn description_fuzzy_match_correlates_without_item_id_match() {
        let inv_lines = vec![line("X1", "Premium Widget Assembly Unit", 10.0, 100.0)];
        let po_lines = vec![line("PO-9", "Premium Widget Assembly Unit Kit", 10.0, 100.0)];
        let result = validate_line_items(
            &base_invoice(inv_lines, 1000.0),
            &base_po(po_lines, 1000.0, ""),
        );
        assert!(result.is_pass());
    }

    #[test]
    fn no_item_id_or_description_match_reports_item_not_found_as_info() {
        let inv_lines = vec![line("X1", "Completely Unrelated", 10.0, 100.0)];
        let po_lines = vec![line("PO-9", "Widget", 10.0, 100.0)];
        let result = validate_line_items(
            &base_invoice(inv_lines, 1000.0),
            &base_po(po_lines, 1000.0, ""),
        );
        assert!(result.is_pass());
        assert!(result.exceptions.iter().any(|e| e.kind() == "item_not_found_on_po"));
    }
}
