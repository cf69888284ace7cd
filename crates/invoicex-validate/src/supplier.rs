// SPDX-License-Identifier: MIT OR Apache-2.0
//! Supplier and bill-to consistency between invoice and contract
//! (spec.md §4.5.1).

use invoicex_core::{Contract, Invoice, StructuredException, ValidationResult};

/// Exact-match invoice/contract supplier and bill-to fields. Emits one
/// [`StructuredException`] per mismatched field; never more than three.
#[must_use]
pub fn validate_supplier(invoice: &Invoice, contract: &Contract) -> ValidationResult {
    let mut exceptions = Vec::new();

    let inv_name = &invoice.supplier_info.name;
    let con_name = &contract.parties.supplier.name;
    if inv_name != con_name {
        exceptions.push(StructuredException::SupplierNameMismatch {
            invoice_value: inv_name.clone(),
            expected_value: con_name.clone(),
            diff_description: highlight_diff(inv_name, con_name),
            comparison_method: "exact_match".into(),
            threshold: "100% exact match required".into(),
        });
    }

    let inv_vendor_id = &invoice.supplier_info.vendor_id;
    let con_vendor_id = &contract.parties.supplier.vendor_id;
    if inv_vendor_id != con_vendor_id {
        exceptions.push(StructuredException::SupplierVendorIdMismatch {
            invoice_value: inv_vendor_id.clone(),
            expected_value: con_vendor_id.clone(),
            diff_description: highlight_diff(inv_vendor_id, con_vendor_id),
            comparison_method: "exact_match".into(),
            threshold: "100% exact match required".into(),
        });
    }

    let inv_billto_name = &invoice.bill_to_info.name;
    let con_client_name = &contract.parties.client.name;
    if inv_billto_name != con_client_name {
        exceptions.push(StructuredException::BillToNameMismatch {
            invoice_value: inv_billto_name.clone(),
            expected_value: con_client_name.clone(),
            diff_description: highlight_diff(inv_billto_name, con_client_name),
            comparison_method: "exact_match".into(),
            threshold: "100% exact match required".into(),
        });
    }

    ValidationResult::new("supplier_match", exceptions)
}

/// Character-position diff between two equal-role strings, spaces
/// marked `[SPACE]` for visibility so a mismatched whitespace run
/// (e.g. a doubled space) is obvious instead of invisible in the
/// printed diagnostic. Returns `"Strings are identical"` when equal,
/// or a length-difference note when every shared position matches but
/// the strings differ in length.
fn highlight_diff(a: &str, b: &str) -> String {
    if a == b {
        return "Strings are identical".to_string();
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());

    for i in 0..max_len {
        let ca = a_chars.get(i).copied();
        let cb = b_chars.get(i).copied();
        if ca != cb {
            return format!(
                "First difference at position {i}: invoice has {}, expected {}",
                describe_char(ca),
                describe_char(cb),
            );
        }
    }

    format!("Length difference: {} vs {} chars", a_chars.len(), b_chars.len())
}

/// Render a single character for the diff description, marking a
/// space as `[SPACE]` and a missing character as `<end of string>`.
fn describe_char(c: Option<char>) -> String {
    match c {
        None => "<end of string>".to_string(),
        Some(' ') => "[SPACE]".to_string(),
        Some(c) => c.to_string(),
    }
}
