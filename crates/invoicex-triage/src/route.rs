// SPDX-License-Identifier: MIT OR Apache-2.0
//! Queue selection: the fixed priority order (spec.md §4.8, extended
//! by the expanded spec's two supplemental queues).

use invoicex_core::{Priority, Queue};
use invoicex_validate::ValidationRun;

/// Pick the first queue (in priority order) whose condition holds, or
/// `None` if every validator passed and neither of the PASS-branch
/// conditions (rule 10) fires — meaning the invoice is approved
/// outright (rule 11).
#[must_use]
pub fn select_queue(run: &ValidationRun) -> Option<Queue> {
    let find = |tool_id: &str| run.tool_results.iter().find(|r| r.tool_id == tool_id);
    let failed = |tool_id: &str| find(tool_id).is_some_and(|r| !r.is_pass());

    if failed("duplicate_invoice_check") {
        return Some(Queue::DuplicateInvoices);
    }
    if failed("dependency_check") {
        return Some(Queue::MissingData);
    }
    if run.triple.matching_details.overall_confidence() < 0.7 {
        return Some(Queue::LowConfidenceMatches);
    }
    if failed("line_item_reconciliation") {
        return Some(Queue::PriceDiscrepancies);
    }
    if failed("supplier_match") {
        return Some(Queue::SupplierMismatch);
    }
    if failed("billing_arithmetic") {
        return Some(Queue::BillingDiscrepancies);
    }
    if failed("date_check") {
        return Some(Queue::DateDiscrepancies);
    }
    if failed("currency_validation") {
        return Some(Queue::CurrencyDiscrepancies);
    }
    if failed("payment_terms_validation") {
        return Some(Queue::PaymentTermsDiscrepancies);
    }

    None
}

/// Fixed priority/manager-approval table (spec.md §4.8).
#[must_use]
pub fn priority_for(queue: Queue) -> Priority {
    match queue {
        Queue::SupplierMismatch
        | Queue::DateDiscrepancies
        | Queue::CurrencyDiscrepancies
        | Queue::PaymentTermsDiscrepancies => Priority::Medium,
        _ => Priority::High,
    }
}

/// Whether `queue` requires manager approval before it can be closed
/// (spec.md §4.8).
#[must_use]
pub fn requires_approval(queue: Queue) -> bool {
    !matches!(
        queue,
        Queue::SupplierMismatch
            | Queue::DateDiscrepancies
            | Queue::CurrencyDiscrepancies
            | Queue::PaymentTermsDiscrepancies
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_priority_queues_never_require_approval() {
        for queue in [
            Queue::SupplierMismatch,
            Queue::DateDiscrepancies,
            Queue::CurrencyDiscrepancies,
            Queue::PaymentTermsDiscrepancies,
        ] {
            assert_eq!(priority_for(queue), Priority::Medium);
            assert!(!requires_approval(queue));
        }
    }

    #[test]
    fn high_priority_queues_always_require_approval() {
        for queue in [
            Queue::DuplicateInvoices,
            Queue::MissingData,
            Queue::LowConfidenceMatches,
            Queue::PriceDiscrepancies,
            Queue::BillingDiscrepancies,
            Queue::HighValueApproval,
        ] {
            assert_eq!(priority_for(queue), Priority::High);
            assert!(requires_approval(queue));
        }
    }
}
