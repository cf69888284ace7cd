// SPDX-License-Identifier: MIT OR Apache-2.0
//! Supplemental payment-terms validation (spec.md §4.5.7).

use invoicex_core::{Contract, Invoice, StructuredException, ValidationResult};

const SUPPORTED_TERMS: &[&str] = &["Net 15", "Net 30", "Net 45", "Net 60"];

/// Invoice payment terms must match `^Net\s+\d+$` (case-insensitive),
/// be in the supported set, and match the contract's terms (defaulting
/// to `"Net 30"` when the contract doesn't specify any). A missing
/// invoice value short-circuits to a single FAIL.
#[must_use]
pub fn validate_payment_terms(invoice: &Invoice, contract: &Contract) -> ValidationResult {
    let invoice_terms = invoice.payment_terms.trim();

    if invoice_terms.is_empty() {
        return ValidationResult::new(
            "payment_terms_validation",
            vec![StructuredException::MissingPaymentTerms],
        );
    }

    let mut exceptions = Vec::new();

    if !matches_net_pattern(invoice_terms) {
        exceptions.push(StructuredException::InvalidPaymentTermsFormat {
            value: invoice_terms.to_string(),
        });
    }

    if !SUPPORTED_TERMS.contains(&invoice_terms) {
        exceptions.push(StructuredException::UnsupportedPaymentTerms {
            value: invoice_terms.to_string(),
        });
    }

    let contract_terms = contract.payment_terms.as_deref().unwrap_or("Net 30").trim();
    if contract_terms != invoice_terms {
        exceptions.push(StructuredException::PaymentTermsMismatch {
            invoice_value: invoice_terms.to_string(),
            expected_value: contract_terms.to_string(),
        });
    }

    ValidationResult::new("payment_terms_validation", exceptions)
}

/// `^Net\s+\d+$`, case-insensitive.
fn matches_net_pattern(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    let Some(rest) = lower.strip_prefix("net") else {
        return false;
    };
    let digits = rest.trim_start();
    if digits.len() == rest.len() {
        return false; // no whitespace between "Net" and what follows
    }
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicex_core::{
        BillToInfo, ClientInfo, ContractMetadata, InvoiceSummary, Parties, SupplierInfo,
    };

    fn invoice(payment_terms: &str) -> Invoice {
        Invoice {
            invoice_id: "INV-1".into(),
            purchase_order_number: "PO-1".into(),
            supplier_info: SupplierInfo { name: "Acme".into(), vendor_id: "V-1".into() },
            bill_to_info: BillToInfo { name: "Client".into() },
            issue_date: "2024-06-01".into(),
            due_date: "2024-07-01".into(),
            payment_terms: payment_terms.into(),
            currency: Some("USD".into()),
            summary: InvoiceSummary { subtotal: 900.0, tax_amount: 100.0, billing_amount: 1000.0 },
            line_items: vec![],
        }
    }

    fn contract(payment_terms: Option<&str>) -> Contract {
        Contract {
            contract_id: "C-1".into(),
            parties: Parties {
                supplier: SupplierInfo { name: "Acme".into(), vendor_id: "V-1".into() },
                client: ClientInfo { name: "Client".into() },
            },
            contract_metadata: ContractMetadata {
                effective_date: "2024-01-01".into(),
                end_date: "2024-12-31".into(),
            },
            payment_terms: payment_terms.map(String::from),
            currency: Some("USD".into()),
            sections: vec![],
        }
    }

    #[test]
    fn matching_net30_passes() {
        let result = validate_payment_terms(&invoice("Net 30"), &contract(Some("Net 30")));
        assert!(result.is_pass());
    }

    #[test]
    fn missing_terms_fails_alone() {
        let result = validate_payment_terms(&invoice("   "), &contract(Some("Net 30")));
        assert_eq!(result.exceptions.len(), 1);
        assert_eq!(result.exceptions[0].kind(), "missing_payment_terms");
    }

    #[test]
    fn unsupported_terms_fails() {
        let result = validate_payment_terms(&invoice("Net 90"), &contract(Some("Net 30")));
        assert!(result.exceptions.iter().any(|e| e.kind() == "unsupported_payment_terms"));
    }

    #[test]
    fn bad_format_fails() {
        let result = validate_payment_terms(&invoice("Due on receipt"), &contract(Some("Net 30")));
        assert!(result.exceptions.iter().any(|e| e.kind() == "invalid_payment_terms_format"));
    }

    #[test]
    fn mismatch_against_contract_fails() {
        let result = validate_payment_terms(&invoice("Net 15"), &contract(Some("Net 30")));
        assert!(result.exceptions.iter().any(|e| e.kind() == "payment_terms_mismatch"));
    }

    #[test]
    fn contract_without_terms_defaults_to_net30() {
        let result = validate_payment_terms(&invoice("Net 30"), &contract(None));
        assert!(result.is_pass());
    }

    #[test]
    fn pattern_matcher_accepts_case_insensitive_net() {
        assert!(matches_net_pattern("net 45"));
        assert!(matches_net_pattern("NET 45"));
        assert!(!matches_net_pattern("Net45"));
        assert!(!matches_net_pattern("Net"));
        assert!(!matches_net_pattern("Net thirty"));
    }
}
