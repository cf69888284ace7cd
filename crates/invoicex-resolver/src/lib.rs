// SPDX-License-Identifier: MIT OR Apache-2.0
//! Resolve an invoice filename to its governing PO item and contract
//! (spec.md §4.4).

#![deny(unsafe_code)]
#![warn(missing_docs)]

use invoicex_core::{MatchingDetails, ResolvedTriple};
use invoicex_match::{find_best_po_match, find_best_supplier_match, SupplierCandidate};
use invoicex_store::DocumentStore;

/// Resolve `filename` against `store`, producing the full
/// `{invoice, po_item, contract, matching_details}` triple.
///
/// Each stage short-circuits the next on a miss: an unresolved invoice
/// skips PO matching entirely (confidence `0.0`); an unresolved PO
/// skips contract lookup and supplier matching. A miss never fails
/// this function — it is the validation runner's job (spec.md §4.6) to
/// turn an incomplete [`ResolvedTriple`] into a `dependency_check`
/// exception.
///
/// `min_po_confidence`/`min_supplier_confidence` default to
/// [`invoicex_match::DEFAULT_MIN_PO_CONFIDENCE`]/
/// [`invoicex_match::DEFAULT_MIN_SUPPLIER_CONFIDENCE`] — pass them
/// explicitly so callers can tune via `invoicex-config`.
#[tracing::instrument(skip(store))]
#[must_use]
pub fn resolve(
    store: &DocumentStore,
    filename: &str,
    min_po_confidence: f64,
    min_supplier_confidence: f64,
) -> ResolvedTriple {
    let mut triple = ResolvedTriple::default();

    let Some(invoice) = store.load_invoice(filename) else {
        tracing::info!(confidence = 0.0, "invoice not found");
        return triple;
    };

    if invoice.purchase_order_number.is_empty() {
        triple.invoice = Some(invoice);
        return triple;
    }

    let po_items = store.list_po_items();
    let po_numbers: Vec<&str> = po_items.iter().map(|p| p.po_number.as_str()).collect();
    let po_report = find_best_po_match(
        &invoice.purchase_order_number,
        &po_numbers,
        min_po_confidence,
    );
    let mut matching_details = MatchingDetails::new(po_report.confidence, 0.0);

    let po_item = po_report.matched_index.map(|idx| po_items[idx].clone());

    if let Some(po_item) = &po_item {
        let normalized_contract_id = invoicex_normalize::normalize_token_str(&po_item.contract_id);
        if let Some(contract) = store.find_contract_by_id(&normalized_contract_id) {
            let candidate = SupplierCandidate {
                name: &contract.parties.supplier.name,
                vendor_id: &contract.parties.supplier.vendor_id,
            };
            if let Some((_, supplier_report)) = find_best_supplier_match(
                &invoice.supplier_info.name,
                &invoice.supplier_info.vendor_id,
                std::slice::from_ref(&candidate),
            ) {
                tracing::debug!(
                    match_type = ?supplier_report.match_type,
                    cleared_threshold = supplier_report.is_match(min_supplier_confidence),
                    "supplier match scored"
                );
                matching_details =
                    MatchingDetails::new(po_report.confidence, supplier_report.confidence);
            }
            triple.contract = Some(contract);
        }
    }

    tracing::info!(
        overall_confidence = matching_details.overall_confidence(),
        "resolved invoice"
    );

    triple.invoice = Some(invoice);
    triple.po_item = po_item;
    triple.matching_details = matching_details;
    triple
}
