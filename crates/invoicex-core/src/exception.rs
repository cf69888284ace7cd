// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured exceptions and validator outcomes (spec.md §3, §4.5–§4.6).

use serde::{Deserialize, Serialize};

/// Whether a [`StructuredException`] should fail its validator or is
/// merely informational (attached to an otherwise-PASS result).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Fails the owning validator.
    Fail,
    /// Recorded but does not fail the owning validator.
    Info,
}

/// A single typed validation failure (or annotation). One variant per
/// `kind` named across spec.md §3 and §4.5; `Freeform` covers the
/// simple string-only exceptions the source tooling emits for cases
/// that don't carry extra diagnostic fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuredException {
    /// Invoice `supplier_info.name` does not exactly match the
    /// contract's `parties.supplier.name`.
    SupplierNameMismatch {
        /// Value as stated on the invoice.
        invoice_value: String,
        /// Value as stated on the contract.
        expected_value: String,
        /// Character-position diff, spaces marked `[SPACE]`.
        diff_description: String,
        /// Always `"exact_match"`.
        comparison_method: String,
        /// Always `"100% exact match required"`.
        threshold: String,
    },
    /// Invoice `supplier_info.vendor_id` does not exactly match the
    /// contract's `parties.supplier.vendor_id`.
    SupplierVendorIdMismatch {
        /// Value as stated on the invoice.
        invoice_value: String,
        /// Value as stated on the contract.
        expected_value: String,
        /// Character-position diff, spaces marked `[SPACE]`.
        diff_description: String,
        /// Always `"exact_match"`.
        comparison_method: String,
        /// Always `"100% exact match required"`.
        threshold: String,
    },
    /// Invoice `bill_to_info.name` does not exactly match the
    /// contract's `parties.client.name`.
    BillToNameMismatch {
        /// Value as stated on the invoice.
        invoice_value: String,
        /// Value as stated on the contract.
        expected_value: String,
        /// Character-position diff, spaces marked `[SPACE]`.
        diff_description: String,
        /// Always `"exact_match"`.
        comparison_method: String,
        /// Always `"100% exact match required"`.
        threshold: String,
    },
    /// `subtotal + tax_amount != billing_amount` (to 2 dp).
    BillingAmountMismatch {
        /// Invoice's `summary.subtotal`.
        subtotal: f64,
        /// Invoice's `summary.tax_amount`.
        tax_amount: f64,
        /// Invoice's `summary.billing_amount`.
        billing_amount: f64,
        /// `subtotal + tax_amount`, rounded to 2 dp.
        expected_billing_amount: f64,
        /// `billing_amount - expected_billing_amount`.
        difference: f64,
    },
    /// `billing_amount > po_item.total_value`.
    InvoiceExceedsPo {
        /// Invoice's `summary.billing_amount`.
        billing_amount: f64,
        /// PO item's `total_value`.
        po_total_value: f64,
        /// `billing_amount - po_total_value`.
        excess: f64,
    },
    /// Invoice `issue_date` or `due_date` failed to parse as `YYYY-MM-DD`.
    InvoiceDateParseError {
        /// Which field failed to parse (`"issue_date"` or `"due_date"`).
        field: String,
        /// The raw, unparseable value.
        value: String,
    },
    /// Contract `effective_date` or `end_date` failed to parse.
    ContractDateParseError {
        /// Which field failed to parse.
        field: String,
        /// The raw, unparseable value.
        value: String,
    },
    /// PO item's `effective_date` failed to parse.
    PoEffectiveDateParseError {
        /// The raw, unparseable value.
        value: String,
    },
    /// `issue_date` falls outside `[contract.effective_date, contract.end_date]`.
    InvoiceIssueOutOfContractWindow {
        /// Invoice's `issue_date`.
        issue_date: String,
        /// Contract's `effective_date`.
        effective_date: String,
        /// Contract's `end_date`.
        end_date: String,
    },
    /// `payment_terms == "Net 30"` but `due_date != issue_date + 30 days`.
    DueDateNotNet30 {
        /// Invoice's `issue_date`.
        issue_date: String,
        /// Invoice's stated `due_date`.
        due_date: String,
        /// `issue_date + 30 days`.
        expected_due_date: String,
    },
    /// `issue_date < po_item.effective_date`.
    InvoiceIssueBeforePoEffectiveDate {
        /// Invoice's `issue_date`.
        issue_date: String,
        /// PO item's `effective_date`.
        po_effective_date: String,
    },
    /// An invoice-only line item's description scored below the 0.3
    /// Jaccard threshold against the PO item's description.
    DescriptionMismatch {
        /// Invoice line's `item_id`, if present.
        item_id: Option<String>,
        /// Invoice line's description.
        invoice_description: String,
        /// PO item's description compared against.
        po_description: String,
        /// Jaccard word-overlap similarity actually observed.
        similarity: f64,
    },
    /// A matched line pair's `unit_price` differs (to 2 dp).
    LineItemUnitPrice {
        /// Correlating `item_id`.
        item_id: String,
        /// Invoice line's `unit_price`.
        invoice_value: f64,
        /// PO line's `unit_price`.
        po_value: f64,
        /// `(invoice_value - po_value) / po_value * 100`, when `po_value != 0`.
        percent_diff: f64,
    },
    /// A matched line pair's `quantity` differs. Over-quantity is
    /// [`Severity::Fail`]; under-quantity is [`Severity::Info`].
    LineItemQuantityMismatch {
        /// Correlating `item_id`.
        item_id: String,
        /// Invoice line's `quantity`.
        invoice_quantity: f64,
        /// PO line's `quantity`.
        po_quantity: f64,
        /// Whether this is a fail-level over-quantity or info-level under-quantity.
        severity: Severity,
    },
    /// A matched line pair's `line_total != unit_price * quantity`.
    LineItemTotalMismatch {
        /// Correlating `item_id`.
        item_id: String,
        /// Invoice line's stated `line_total`.
        invoice_value: f64,
        /// `unit_price * quantity`, rounded to 2 dp.
        expected_value: f64,
        /// `invoice_value - expected_value`.
        difference: f64,
    },
    /// A PO line was never matched to any invoice line. Always
    /// [`Severity::Info`].
    UninvoicedItem {
        /// The unmatched PO line's `item_id`.
        po_item_id: String,
        /// The unmatched PO line's description.
        description: String,
        /// The unmatched PO line's `unit_price`.
        unit_price: f64,
        /// The unmatched PO line's `line_total`.
        line_total: f64,
    },
    /// An invoice line carries no `item_id` and could not be correlated.
    InvoiceLineMissingItemId {
        /// Index of the offending line within `invoice.line_items`.
        index: usize,
    },
    /// An invoice line's `item_id` correlated to no PO line, and its
    /// description scored below the both-sides fuzzy-match threshold
    /// against every unmatched PO line.
    LineItemNotFoundOnPo {
        /// The invoice line's `item_id`.
        item_id: String,
        /// The invoice line's description.
        description: String,
    },
    /// The duplicate detector's `max_score > 0.8` FAIL path.
    PotentialDuplicate {
        /// The weighted composite duplicate-confidence score.
        confidence: f64,
        /// Human-readable reasons the records matched.
        match_reasons: Vec<String>,
    },
    /// The duplicate detector's `0.5 < max_score <= 0.8` PASS annotation.
    PossibleDuplicate {
        /// The weighted composite duplicate-confidence score.
        confidence: f64,
        /// Human-readable reasons the records matched.
        match_reasons: Vec<String>,
    },
    /// Invoice carries no `currency` field.
    MissingCurrency,
    /// Invoice `currency` is not a 3-letter alphabetic code.
    InvalidCurrencyFormat {
        /// The offending raw value.
        value: String,
    },
    /// Invoice `currency` is well-formed but not in the supported set.
    UnsupportedCurrency {
        /// The offending value.
        value: String,
    },
    /// Invoice `currency` does not match the contract's `currency`.
    CurrencyMismatch {
        /// Invoice's currency.
        invoice_value: String,
        /// Contract's currency.
        expected_value: String,
    },
    /// Invoice carries no `payment_terms` field.
    MissingPaymentTerms,
    /// Invoice `payment_terms` does not match `^Net\s+\d+$` (case-insensitive).
    InvalidPaymentTermsFormat {
        /// The offending raw value.
        value: String,
    },
    /// Invoice `payment_terms` is well-formed but not in the supported set.
    UnsupportedPaymentTerms {
        /// The offending value.
        value: String,
    },
    /// Invoice `payment_terms` does not match the contract's `payment_terms`.
    PaymentTermsMismatch {
        /// Invoice's payment terms.
        invoice_value: String,
        /// Contract's payment terms.
        expected_value: String,
    },
    /// The invoice document itself could not be resolved.
    InvoiceNotFound,
    /// No PO item cleared the best-PO-match confidence floor.
    PoItemNotFound,
    /// The matched PO item's `contract_id` did not resolve.
    ContractNotFound,
    /// A simple string-only exception, for cases the source tooling
    /// emits without extra structured fields.
    Freeform(String),
}

impl StructuredException {
    /// Whether this exception fails its owning validator (as opposed
    /// to being an [`Severity::Info`]-level annotation on a PASS result).
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::UninvoicedItem { .. }
            | Self::PossibleDuplicate { .. }
            | Self::InvoiceLineMissingItemId { .. }
            | Self::LineItemNotFoundOnPo { .. } => Severity::Info,
            Self::LineItemQuantityMismatch { severity, .. } => *severity,
            _ => Severity::Fail,
        }
    }

    /// The `kind` tag this exception serializes under.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SupplierNameMismatch { .. } => "supplier_name_mismatch",
            Self::SupplierVendorIdMismatch { .. } => "supplier_vendor_id_mismatch",
            Self::BillToNameMismatch { .. } => "bill_to_name_mismatch",
            Self::BillingAmountMismatch { .. } => "billing_amount_mismatch",
            Self::InvoiceExceedsPo { .. } => "invoice_exceeds_po",
            Self::InvoiceDateParseError { .. } => "invoice_date_parse_error",
            Self::ContractDateParseError { .. } => "contract_date_parse_error",
            Self::PoEffectiveDateParseError { .. } => "po_effective_date_parse_error",
            Self::InvoiceIssueOutOfContractWindow { .. } => "invoice_issue_out_of_contract_window",
            Self::DueDateNotNet30 { .. } => "due_date_not_net30",
            Self::InvoiceIssueBeforePoEffectiveDate { .. } => {
                "invoice_issue_before_po_effective_date"
            }
            Self::DescriptionMismatch { .. } => "description_mismatch",
            Self::LineItemUnitPrice { .. } => "line_item_unit_price",
            Self::LineItemQuantityMismatch { .. } => "line_item_quantity_mismatch",
            Self::LineItemTotalMismatch { .. } => "line_item_total_mismatch",
            Self::UninvoicedItem { .. } => "uninvoiced_items",
            Self::InvoiceLineMissingItemId { .. } => "invoice_line_missing_item_id",
            Self::LineItemNotFoundOnPo { .. } => "item_not_found_on_po",
            Self::PotentialDuplicate { .. } => "potential_duplicate",
            Self::PossibleDuplicate { .. } => "possible_duplicate",
            Self::MissingCurrency => "missing_currency",
            Self::InvalidCurrencyFormat { .. } => "invalid_currency_format",
            Self::UnsupportedCurrency { .. } => "unsupported_currency",
            Self::CurrencyMismatch { .. } => "currency_mismatch",
            Self::MissingPaymentTerms => "missing_payment_terms",
            Self::InvalidPaymentTermsFormat { .. } => "invalid_payment_terms_format",
            Self::UnsupportedPaymentTerms { .. } => "unsupported_payment_terms",
            Self::PaymentTermsMismatch { .. } => "payment_terms_mismatch",
            Self::InvoiceNotFound => "invoice_not_found",
            Self::PoItemNotFound => "po_item_not_found",
            Self::ContractNotFound => "contract_not_found",
            Self::Freeform(_) => "freeform",
        }
    }
}

/// PASS/FAIL outcome of a single validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ToolStatus {
    /// No fail-severity exceptions were produced.
    Pass,
    /// At least one fail-severity exception was produced.
    Fail,
}

/// The output of a single validator (spec.md §3, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Identifies which validator produced this result, e.g.
    /// `"supplier_match"`, `"billing_arithmetic"`.
    pub tool_id: String,
    /// PASS iff no exception herein is fail-severity.
    pub status: ToolStatus,
    /// Every exception (fail and info severity) this validator produced.
    pub exceptions: Vec<StructuredException>,
}

impl ValidationResult {
    /// Build a result, deriving `status` from whether any exception is fail-severity.
    #[must_use]
    pub fn new(tool_id: impl Into<String>, exceptions: Vec<StructuredException>) -> Self {
        let status = if exceptions.iter().any(|e| e.severity() == Severity::Fail) {
            ToolStatus::Fail
        } else {
            ToolStatus::Pass
        };
        Self {
            tool_id: tool_id.into(),
            status,
            exceptions,
        }
    }

    /// Whether this result passed.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.status == ToolStatus::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_only_exceptions_still_pass() {
        let result = ValidationResult::new(
            "line_item_reconciliation",
            vec![StructuredException::UninvoicedItem {
                po_item_id: "A".into(),
                description: "widget".into(),
                unit_price: 1.0,
                line_total: 1.0,
            }],
        );
        assert!(result.is_pass());
    }

    #[test]
    fn fail_severity_exception_fails_result() {
        let result = ValidationResult::new(
            "billing_arithmetic",
            vec![StructuredException::InvoiceExceedsPo {
                billing_amount: 1500.0,
                po_total_value: 1000.0,
                excess: 500.0,
            }],
        );
        assert_eq!(result.status, ToolStatus::Fail);
    }

    #[test]
    fn kind_tags_match_serde_tag() {
        let exc = StructuredException::MissingCurrency;
        let json = serde_json::to_value(&exc).unwrap();
        assert_eq!(json["kind"], "missing_currency");
        assert_eq!(exc.kind(), "missing_currency");
    }

    #[test]
    fn quantity_under_is_info_severity() {
        let exc = StructuredException::LineItemQuantityMismatch {
            item_id: "A".into(),
            invoice_quantity: 5.0,
            po_quantity: 10.0,
            severity: Severity::Info,
        };
        assert_eq!(exc.severity(), Severity::Info);
    }
}
