// SPDX-License-Identifier: MIT OR Apache-2.0
//! The validation runner (spec.md §4.6): resolves the dependency
//! check, then invokes every validator in fixed order.

use invoicex_core::{ResolvedTriple, StructuredException, ToolStatus, ValidationResult};
use invoicex_ledger::SystemLogs;

use crate::{
    check_for_duplicates, validate_billing, validate_currency, validate_dates,
    validate_line_items, validate_payment_terms, validate_supplier,
};

/// The runner's full output: the resolved triple it validated against
/// and the ordered list of tool results it produced, plus the overall
/// PASS/FAIL verdict spec.md §4.6 derives from them.
#[derive(Debug, Clone)]
pub struct ValidationRun {
    /// The triple the runner validated. Incomplete iff the runner
    /// short-circuited on the dependency check.
    pub triple: ResolvedTriple,
    /// Every tool result produced, in invocation order. A single
    /// `dependency_check` entry when the triple was incomplete;
    /// otherwise supplier, billing, dates, line items, duplicate
    /// detection, currency, payment terms.
    pub tool_results: Vec<ValidationResult>,
    /// PASS iff every entry in `tool_results` is PASS.
    pub validation: ToolStatus,
}

/// Run the full validator pipeline against `triple`, consulting
/// `system_logs`'s processed-invoice history for duplicate detection.
///
/// Fixed order: dependency check (short-circuits on FAIL) → supplier
/// match → billing arithmetic → date validation → line-item
/// reconciliation → duplicate detection → currency → payment terms.
/// An individual validator FAIL never skips the remaining validators —
/// only an incomplete triple short-circuits, producing a single-entry
/// `tool_results` list.
#[must_use]
pub fn run_validations(triple: ResolvedTriple, system_logs: &SystemLogs) -> ValidationRun {
    if let Some(missing) = triple.first_missing() {
        let dependency_check = ValidationResult::new(
            "dependency_check",
            vec![exception_for_missing(missing)],
        );
        return ValidationRun {
            triple,
            tool_results: vec![dependency_check],
            validation: ToolStatus::Fail,
        };
    }

    let invoice = triple.invoice.as_ref().expect("checked complete above");
    let po_item = triple.po_item.as_ref().expect("checked complete above");
    let contract = triple.contract.as_ref().expect("checked complete above");

    let mut tool_results = vec![
        validate_supplier(invoice, contract),
        validate_billing(invoice, po_item),
        validate_dates(invoice, contract, po_item),
        validate_line_items(invoice, po_item),
        check_for_duplicates(invoice, &system_logs.read_processed_invoices()),
        validate_currency(invoice, contract),
        validate_payment_terms(invoice, contract),
    ];
    tool_results.shrink_to_fit();

    let validation = if tool_results.iter().all(ValidationResult::is_pass) {
        ToolStatus::Pass
    } else {
        ToolStatus::Fail
    };

    ValidationRun {
        triple,
        tool_results,
        validation,
    }
}

fn exception_for_missing(missing: invoicex_core::MissingMember) -> StructuredException {
    match missing {
        invoicex_core::MissingMember::Invoice => StructuredException::InvoiceNotFound,
        invoicex_core::MissingMember::PoItem => StructuredException::PoItemNotFound,
        invoicex_core::MissingMember::Contract => StructuredException::ContractNotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicex_core::{
        BillToInfo, ClientInfo, Contract, ContractMetadata, Invoice, InvoiceSummary, Parties,
        PoItem, SupplierInfo,
    };

    fn invoice() -> Invoice {
        Invoice {
            invoice_id: "INV-1".into(),
            purchase_order_number: "PO-1".into(),
            supplier_info: SupplierInfo { name: "Acme".into(), vendor_id: "V-1".into() },
            bill_to_info: BillToInfo { name: "Client".into() },
            issue_date: "2024-06-01".into(),
            due_date: "2024-07-01".into(),
            payment_terms: "Net 30".into(),
            currency: Some("USD".into()),
            summary: InvoiceSummary { subtotal: 900.0, tax_amount: 100.0, billing_amount: 1000.0 },
            line_items: vec![],
        }
    }

    fn po_item() -> PoItem {
        PoItem {
            po_number: "PO-1".into(),
            contract_id: "C-1".into(),
            effective_date: Some("2024-01-01".into()),
            total_value: 1000.0,
            description: String::new(),
            line_items: vec![],
        }
    }

    fn contract() -> Contract {
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
            payment_terms: Some("Net 30".into()),
            currency: Some("USD".into()),
            sections: vec![],
        }
    }

    #[test]
    fn incomplete_triple_short_circuits_to_single_dependency_check() {
        let dir = tempfile::tempdir().unwrap();
        let logs = SystemLogs::new(dir.path());
        let run = run_validations(ResolvedTriple::default(), &logs);
        assert_eq!(run.tool_results.len(), 1);
        assert_eq!(run.tool_results[0].tool_id, "dependency_check");
        assert_eq!(run.validation, ToolStatus::Fail);
        assert_eq!(run.tool_results[0].exceptions[0].kind(), "invoice_not_found");
    }

    #[test]
    fn complete_triple_runs_all_seven_validators_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let logs = SystemLogs::new(dir.path());
        let triple = ResolvedTriple {
            invoice: Some(invoice()),
            po_item: Some(po_item()),
            contract: Some(contract()),
            matching_details: Default::default(),
        };
        let run = run_validations(triple, &logs);
        let ids: Vec<&str> = run.tool_results.iter().map(|r| r.tool_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "supplier_match",
                "billing_arithmetic",
                "date_check",
                "line_item_reconciliation",
                "duplicate_invoice_check",
                "currency_validation",
                "payment_terms_validation",
            ]
        );
        assert_eq!(run.validation, ToolStatus::Pass);
    }

    #[test]
    fn one_failing_validator_does_not_skip_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let logs = SystemLogs::new(dir.path());
        let mut bad_invoice = invoice();
        bad_invoice.supplier_info.name = "Someone Else".into();
        let triple = ResolvedTriple {
            invoice: Some(bad_invoice),
            po_item: Some(po_item()),
            contract: Some(contract()),
            matching_details: Default::default(),
        };
        let run = run_validations(triple, &logs);
        assert_eq!(run.tool_results.len(), 7);
        assert_eq!(run.validation, ToolStatus::Fail);
        assert!(!run.tool_results[0].is_pass());
        assert!(run.tool_results[1].is_pass());
    }
}
