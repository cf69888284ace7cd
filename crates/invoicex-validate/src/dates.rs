// SPDX-License-Identifier: MIT OR Apache-2.0
//! Date consistency across invoice, contract, and PO item (spec.md §4.5.3).

use chrono::NaiveDate;

use invoicex_core::{Contract, Invoice, PoItem, StructuredException, ValidationResult};

const DATE_FMT: &str = "%Y-%m-%d";

fn parse(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FMT).ok()
}

/// Checks, in order: `issue_date`/`due_date` parse; contract window
/// membership; Net-30 due-date arithmetic; PO effective-date ordering.
/// A parse failure on invoice or contract dates short-circuits the
/// remaining checks, matching the source tool's `try/except return`.
#[must_use]
pub fn validate_dates(invoice: &Invoice, contract: &Contract, po_item: &PoItem) -> ValidationResult {
    let Some(issue_date) = parse(&invoice.issue_date) else {
        return ValidationResult::new(
            "date_check",
            vec![StructuredException::InvoiceDateParseError {
                field: "issue_date".into(),
                value: invoice.issue_date.clone(),
            }],
        );
    };
    let Some(due_date) = parse(&invoice.due_date) else {
        return ValidationResult::new(
            "date_check",
            vec![StructuredException::InvoiceDateParseError {
                field: "due_date".into(),
                value: invoice.due_date.clone(),
            }],
        );
    };

    let Some(effective_date) = parse(&contract.contract_metadata.effective_date) else {
        return ValidationResult::new(
            "date_check",
            vec![StructuredException::ContractDateParseError {
                field: "effective_date".into(),
                value: contract.contract_metadata.effective_date.clone(),
            }],
        );
    };
    let Some(end_date) = parse(&contract.contract_metadata.end_date) else {
        return ValidationResult::new(
            "date_check",
            vec![StructuredException::ContractDateParseError {
                field: "end_date".into(),
                value: contract.contract_metadata.end_date.clone(),
            }],
        );
    };

    let mut exceptions = Vec::new();

    if !(effective_date <= issue_date && issue_date <= end_date) {
        exceptions.push(StructuredException::InvoiceIssueOutOfContractWindow {
            issue_date: invoice.issue_date.clone(),
            effective_date: contract.contract_metadata.effective_date.clone(),
            end_date: contract.contract_metadata.end_date.clone(),
        });
    }

    if invoice.payment_terms == "Net 30" {
        let expected_due_date = issue_date + chrono::Duration::days(30);
        if due_date != expected_due_date {
            exceptions.push(StructuredException::DueDateNotNet30 {
                issue_date: invoice.issue_date.clone(),
                due_date: invoice.due_date.clone(),
                expected_due_date: expected_due_date.format(DATE_FMT).to_string(),
            });
        }
    }

    if let Some(po_effective_raw) = &po_item.effective_date {
        match parse(po_effective_raw) {
            Some(po_effective) if issue_date < po_effective => {
                exceptions.push(StructuredException::InvoiceIssueBeforePoEffectiveDate {
                    issue_date: invoice.issue_date.clone(),
                    po_effective_date: po_effective_raw.clone(),
                });
            }
            Some(_) => {}
            None => {
                exceptions.push(StructuredException::PoEffectiveDateParseError {
                    value: po_effective_raw.clone(),
                });
            }
        }
    }

    ValidationResult::new("date_check", exceptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicex_core::{
        BillToInfo, ClientInfo, ContractMetadata, InvoiceSummary, Parties, SupplierInfo,
    };

    fn invoice(issue_date: &str, due_date: &str, payment_terms: &str) -> Invoice {
        Invoice {
            invoice_id: "INV-1".into(),
            purchase_order_number: "PO-1".into(),
            supplier_info: SupplierInfo { name: "Acme".into(), vendor_id: "V-1".into() },
            bill_to_info: BillToInfo { name: "Client".into() },
            issue_date: issue_date.into(),
            due_date: due_date.into(),
            payment_terms: payment_terms.into(),
            currency: Some("USD".into()),
            summary: InvoiceSummary { subtotal: 900.0, tax_amount: 100.0, billing_amount: 1000.0 },
            line_items: vec![],
        }
    }

    fn contract(effective_date: &str, end_date: &str) -> Contract {
        Contract {
            contract_id: "C-1".into(),
            parties: Parties {
                supplier: SupplierInfo { name: "Acme".into(), vendor_id: "V-1".into() },
                client: ClientInfo { name: "Client".into() },
            },
            contract_metadata: ContractMetadata {
                effective_date: effective_date.into(),
                end_date: end_date.into(),
            },
            payment_terms: Some("Net 30".into()),
            currency: Some("USD".into()),
            sections: vec![],
        }
    }

    fn po(effective_date: Option<&str>) -> PoItem {
        PoItem {
            po_number: "PO-1".into(),
            contract_id: "C-1".into(),
            effective_date: effective_date.map(String::from),
            total_value: 1000.0,
            description: String::new(),
            line_items: vec![],
        }
    }

    #[test]
    fn within_window_net30_passes() {
        let result = validate_dates(
            &invoice("2024-06-01", "2024-07-01", "Net 30"),
            &contract("2024-01-01", "2024-12-31"),
            &po(Some("2024-01-01")),
        );
        assert!(result.is_pass());
    }

    #[test]
    fn unparseable_issue_date_short_circuits() {
        let result = validate_dates(
            &invoice("not-a-date", "2024-07-01", "Net 30"),
            &contract("2024-01-01", "2024-12-31"),
            &po(None),
        );
        assert_eq!(result.exceptions.len(), 1);
        assert_eq!(result.exceptions[0].kind(), "invoice_date_parse_error");
    }

    #[test]
    fn outside_contract_window_fails() {
        let result = validate_dates(
            &invoice("2025-06-01", "2025-07-01", "Net 30"),
            &contract("2024-01-01", "2024-12-31"),
            &po(None),
        );
        assert!(result.exceptions.iter().any(|e| e.kind() == "invoice_issue_out_of_contract_window"));
    }

    #[test]
    fn net30_due_date_mismatch_fails() {
        let result = validate_dates(
            &invoice("2024-06-01", "2024-06-15", "Net 30"),
            &contract("2024-01-01", "2024-12-31"),
            &po(None),
        );
        assert!(result.exceptions.iter().any(|e| e.kind() == "due_date_not_net30"));
    }

    #[test]
    fn non_net30_terms_skip_due_date_check() {
        let result = validate_dates(
            &invoice("2024-06-01", "2024-06-15", "Net 15"),
            &contract("2024-01-01", "2024-12-31"),
            &po(None),
        );
        assert!(result.is_pass());
    }

    #[test]
    fn issue_before_po_effective_date_fails() {
        let result = validate_dates(
            &invoice("2024-06-01", "2024-07-01", "Net 30"),
            &contract("2024-01-01", "2024-12-31"),
            &po(Some("2024-06-15")),
        );
        assert!(result
            .exceptions
            .iter()
            .any(|e| e.kind() == "invoice_issue_before_po_effective_date"));
    }

    #[test]
    fn unparseable_po_effective_date_fails() {
        let result = validate_dates(
            &invoice("2024-06-01", "2024-07-01", "Net 30"),
            &contract("2024-01-01", "2024-12-31"),
            &po(Some("not-a-date")),
        );
        assert!(result.exceptions.iter().any(|e| e.kind() == "po_effective_date_parse_error"));
    }
}
