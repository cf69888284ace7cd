// SPDX-License-Identifier: MIT OR Apache-2.0
//! Building the canonical exception record's queue-specific fields:
//! routing reason, validation details, and the human-readable context
//! block (spec.md §4.9, §6.2). Grounded on
//! `triage_resolution_tool.py`'s `_create_queue_specific_log_entry`.

use invoicex_core::{MissingMember, Queue, Severity, StructuredException, ValidationResult};
use invoicex_validate::ValidationRun;

/// Format a dollar amount with thousands separators, e.g. `$1,500.00`.
#[must_use]
pub(crate) fn format_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let whole = rounded.abs().trunc() as i64;
    let cents = ((rounded.abs() - whole as f64) * 100.0).round() as i64;

    let whole_digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in whole_digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let grouped: String = grouped.chars().rev().collect();

    format!("{sign}${grouped}.{cents:02}")
}

fn find<'a>(run: &'a ValidationRun, tool_id: &str) -> Option<&'a ValidationResult> {
    run.tool_results.iter().find(|r| r.tool_id == tool_id)
}

/// One `field: value` pair per key of every fail-severity exception's
/// serialized form, prefixed by the exception's `kind`. Avoids a
/// thirty-arm match over every [`StructuredException`] variant; every
/// variant already derives `Serialize`, so its field names are the
/// detail keys for free.
fn details_from_exceptions(exceptions: &[StructuredException]) -> Vec<(String, String)> {
    let mut details = Vec::new();
    for exc in exceptions {
        if exc.severity() != Severity::Fail {
            continue;
        }
        let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(exc) else {
            continue;
        };
        for (key, value) in fields {
            if key == "kind" {
                continue;
            }
            let formatted = match value {
                serde_json::Value::Number(n) => n
                    .as_f64()
                    .map(|f| format!("{f:.2}"))
                    .unwrap_or_else(|| n.to_string()),
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            details.push((format!("{}.{key}", exc.kind()), formatted));
        }
    }
    details
}

fn details_from_tool(run: &ValidationRun, tool_id: &str) -> Vec<(String, String)> {
    find(run, tool_id)
        .map(|r| details_from_exceptions(&r.exceptions))
        .unwrap_or_default()
}

/// `VALIDATION_DETAILS:` section contents for `queue`.
#[must_use]
pub(crate) fn validation_details_for(queue: Queue, run: &ValidationRun) -> Vec<(String, String)> {
    match queue {
        Queue::DuplicateInvoices => details_from_tool(run, "duplicate_invoice_check"),
        Queue::MissingData => vec![(
            "missing_member".to_string(),
            run.triple
                .first_missing()
                .map(MissingMember::exception_kind)
                .unwrap_or("unknown")
                .to_string(),
        )],
        Queue::LowConfidenceMatches => vec![
            (
                "po_confidence".to_string(),
                format!("{:.2}", run.triple.matching_details.po_confidence),
            ),
            (
                "supplier_confidence".to_string(),
                format!("{:.2}", run.triple.matching_details.supplier_confidence),
            ),
            (
                "overall_confidence".to_string(),
                format!("{:.2}", run.triple.matching_details.overall_confidence()),
            ),
        ],
        Queue::PriceDiscrepancies => details_from_tool(run, "line_item_reconciliation"),
        Queue::SupplierMismatch => details_from_tool(run, "supplier_match"),
        Queue::BillingDiscrepancies => details_from_tool(run, "billing_arithmetic"),
        Queue::DateDiscrepancies => details_from_tool(run, "date_check"),
        Queue::CurrencyDiscrepancies => details_from_tool(run, "currency_validation"),
        Queue::PaymentTermsDiscrepancies => details_from_tool(run, "payment_terms_validation"),
        Queue::HighValueApproval => {
            let billing_amount = run
                .triple
                .invoice
                .as_ref()
                .map(|i| i.summary.billing_amount)
                .unwrap_or(0.0);
            vec![
                ("billing_amount".to_string(), format!("{billing_amount:.2}")),
                (
                    "overall_confidence".to_string(),
                    format!("{:.2}", run.triple.matching_details.overall_confidence()),
                ),
            ]
        }
    }
}

fn bullet_exceptions(result: Option<&ValidationResult>) -> String {
    let Some(result) = result else {
        return "  - General validation failure".to_string();
    };
    let lines: Vec<String> = result
        .exceptions
        .iter()
        .filter(|e| e.severity() == Severity::Fail)
        .map(|e| format!("  - {}", serde_json::to_string(e).unwrap_or_default()))
        .collect();
    if lines.is_empty() {
        "  - General validation failure".to_string()
    } else {
        lines.join("\n")
    }
}

/// `CONTEXT:` block contents for `queue`, giving a human reviewer
/// enough detail to act without re-running the validators.
#[must_use]
pub(crate) fn context_for(queue: Queue, run: &ValidationRun) -> String {
    match queue {
        Queue::DuplicateInvoices => format!(
            "DUPLICATE DETECTION:\n{}",
            bullet_exceptions(find(run, "duplicate_invoice_check"))
        ),
        Queue::MissingData => format!(
            "DEPENDENCY CHECK:\n  - {}",
            run.triple
                .first_missing()
                .map(MissingMember::exception_kind)
                .unwrap_or("unknown")
        ),
        Queue::LowConfidenceMatches => format!(
            "MATCHING CONFIDENCE:\n  - Overall confidence: {:.1}%\n  - Review matching logic and consider manual verification",
            run.triple.matching_details.overall_confidence() * 100.0
        ),
        Queue::PriceDiscrepancies => format!(
            "LINE ITEM DISCREPANCIES:\n{}",
            bullet_exceptions(find(run, "line_item_reconciliation"))
        ),
        Queue::SupplierMismatch => format!(
            "SUPPLIER MISMATCH:\n{}",
            bullet_exceptions(find(run, "supplier_match"))
        ),
        Queue::BillingDiscrepancies => format!(
            "BILLING ISSUES:\n{}",
            bullet_exceptions(find(run, "billing_arithmetic"))
        ),
        Queue::DateDiscrepancies => format!(
            "DATE ISSUES:\n{}",
            bullet_exceptions(find(run, "date_check"))
        ),
        Queue::CurrencyDiscrepancies => format!(
            "CURRENCY ISSUES:\n{}",
            bullet_exceptions(find(run, "currency_validation"))
        ),
        Queue::PaymentTermsDiscrepancies => format!(
            "PAYMENT TERMS ISSUES:\n{}",
            bullet_exceptions(find(run, "payment_terms_validation"))
        ),
        Queue::HighValueApproval => {
            let billing_amount = run
                .triple
                .invoice
                .as_ref()
                .map(|i| i.summary.billing_amount)
                .unwrap_or(0.0);
            format!(
                "HIGH VALUE / LOW CONFIDENCE APPROVAL:\n  - Billing amount: {}\n  - Overall confidence: {:.1}%",
                format_amount(billing_amount),
                run.triple.matching_details.overall_confidence() * 100.0
            )
        }
    }
}

/// One-line `ROUTING_REASON:` for `queue`.
#[must_use]
pub(crate) fn routing_reason_for(queue: Queue, run: &ValidationRun) -> String {
    match queue {
        Queue::DuplicateInvoices => "Potential duplicate invoice detected".to_string(),
        Queue::MissingData => {
            let member = run
                .triple
                .first_missing()
                .map(MissingMember::exception_kind)
                .unwrap_or("unknown");
            format!("Missing or unresolved data: {member}")
        }
        Queue::LowConfidenceMatches => format!(
            "Low confidence matching ({:.1}%)",
            run.triple.matching_details.overall_confidence() * 100.0
        ),
        Queue::PriceDiscrepancies => "Line item validation failed".to_string(),
        Queue::SupplierMismatch => "Supplier information mismatch".to_string(),
        Queue::BillingDiscrepancies => "Billing amount exceeds PO or arithmetic error".to_string(),
        Queue::DateDiscrepancies => "Date validation failed".to_string(),
        Queue::CurrencyDiscrepancies => "Currency validation failed".to_string(),
        Queue::PaymentTermsDiscrepancies => "Payment terms validation failed".to_string(),
        Queue::HighValueApproval => {
            let billing_amount = run
                .triple
                .invoice
                .as_ref()
                .map(|i| i.summary.billing_amount)
                .unwrap_or(0.0);
            format!(
                "High-value invoice ({}) or low confidence ({:.1}%)",
                format_amount(billing_amount),
                run.triple.matching_details.overall_confidence() * 100.0
            )
        }
    }
}

/// The four generic suggested actions every rejection/approval queue
/// carries, matching the source tool's fixed list.
#[must_use]
pub(crate) fn suggested_actions() -> Vec<String> {
    vec![
        "Review the specific issues listed above".to_string(),
        "Contact supplier if data discrepancies found".to_string(),
        "Verify PO and contract details if matching issues".to_string(),
        "Approve manually if all checks pass after review".to_string(),
    ]
}
