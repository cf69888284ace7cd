// SPDX-License-Identifier: MIT OR Apache-2.0
//! Triage / router (spec.md §4.8, extended by the expanded spec's
//! currency and payment-terms queues): turns a completed
//! [`ValidationRun`] into one of eleven terminal dispositions, writes
//! the canonical exception record (or the payments log), and appends
//! the processed-invoice record every disposition ends in.
//!
//! Grounded on `original_source/tool_library/triage_resolution_tool.py`
//! (`triage_and_route`, `_determine_routing_queue`).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod record;
mod route;

use invoicex_core::{Disposition, ExceptionRecord, Priority, ProcessedInvoiceRecord, Queue};
use invoicex_error::PipelineError;
use invoicex_ledger::SystemLogs;
use invoicex_validate::ValidationRun;

pub use route::select_queue;

/// The outcome of routing one invoice: which disposition it ended in,
/// and — for anything but [`Disposition::Approved`] — the queue,
/// priority, and freshly generated exception id.
#[derive(Debug, Clone)]
pub struct TriageDecision {
    /// The terminal disposition this invoice was routed to.
    pub disposition: Disposition,
    /// The queue an exception record was written to, `None` for `Approved`.
    pub queue: Option<Queue>,
    /// The queue's priority, `None` for `Approved`.
    pub priority: Option<Priority>,
    /// The freshly generated `EXC-...` id, `None` for `Approved`.
    pub exception_id: Option<String>,
}

/// Route `run`'s outcome to a terminal disposition and persist every
/// log that disposition requires (spec.md §4.8, §4.9).
///
/// # Errors
///
/// Returns [`PipelineError`] if any log append fails.
#[tracing::instrument(skip(run, logs))]
pub fn triage_and_route(run: &ValidationRun, logs: &SystemLogs) -> Result<TriageDecision, PipelineError> {
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    let decision = match select_queue(run) {
        Some(queue) => reject_or_hold(Disposition::Rejected, queue, run, &timestamp, logs),
        None => {
            let invoice = run
                .triple
                .invoice
                .as_ref()
                .expect("overall PASS implies every member of the triple resolved");
            let overall_confidence = run.triple.matching_details.overall_confidence();

            if invoice.summary.billing_amount > 10_000.0 || overall_confidence < 0.9 {
                reject_or_hold(
                    Disposition::PendingApproval,
                    Queue::HighValueApproval,
                    run,
                    &timestamp,
                    logs,
                )
            } else {
                approve(invoice, &timestamp, logs)
            }
        }
    }?;

    tracing::info!(
        disposition = ?decision.disposition,
        queue = ?decision.queue,
        "triaged invoice"
    );
    Ok(decision)
}

fn reject_or_hold(
    disposition: Disposition,
    queue: Queue,
    run: &ValidationRun,
    timestamp: &str,
    logs: &SystemLogs,
) -> Result<TriageDecision, PipelineError> {
    let exception_id = invoicex_ledger::generate_exception_id();
    let priority = route::priority_for(queue);

    let invoice = run.triple.invoice.as_ref();
    let invoice_id = invoice
        .map(|i| i.invoice_id.clone())
        .unwrap_or_else(|| "<unknown>".to_string());
    let po_number = invoice
        .map(|i| i.purchase_order_number.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "N/A".to_string());
    let amount = invoice
        .map(|i| record::format_amount(i.summary.billing_amount))
        .unwrap_or_else(|| "N/A".to_string());
    let supplier = invoice.map(|i| i.supplier_info.name.clone()).unwrap_or_default();

    let exception_record = ExceptionRecord {
        exception_id: exception_id.clone(),
        exception_type: "VALIDATION_FAILED".to_string(),
        status: "OPEN".to_string(),
        queue,
        priority,
        timestamp: timestamp.to_string(),
        invoice_id: invoice_id.clone(),
        po_number: po_number.clone(),
        amount,
        supplier: supplier.clone(),
        routing_reason: record::routing_reason_for(queue, run),
        manager_approval_required: route::requires_approval(queue),
        validation_details: record::validation_details_for(queue, run),
        context: record::context_for(queue, run),
        suggested_actions: record::suggested_actions(),
        metadata: Vec::new(),
    };
    logs.append_exception(&exception_record)?;

    let processed = ProcessedInvoiceRecord {
        timestamp: timestamp.to_string(),
        invoice_id,
        supplier_name: supplier,
        vendor_id: invoice.map(|i| i.supplier_info.vendor_id.clone()).unwrap_or_default(),
        invoice_number: invoice.map(|i| i.invoice_id.clone()).unwrap_or_else(|| "<unknown>".to_string()),
        billing_amount: invoice.map(|i| i.summary.billing_amount).unwrap_or(0.0),
        po_number,
        processing_result: invoicex_ledger::processing_result(disposition, Some(queue)),
        line_items_count: invoice.map(|i| i.line_items.len()).unwrap_or(0),
        issue_date: invoice.map(|i| i.issue_date.clone()).unwrap_or_default(),
    };
    logs.append_processed_invoice(&processed)?;

    Ok(TriageDecision {
        disposition,
        queue: Some(queue),
        priority: Some(priority),
        exception_id: Some(exception_id),
    })
}

fn approve(
    invoice: &invoicex_core::Invoice,
    timestamp: &str,
    logs: &SystemLogs,
) -> Result<TriageDecision, PipelineError> {
    logs.append_payment(invoice, timestamp)?;

    let processed = ProcessedInvoiceRecord {
        timestamp: timestamp.to_string(),
        invoice_id: invoice.invoice_id.clone(),
        supplier_name: invoice.supplier_info.name.clone(),
        vendor_id: invoice.supplier_info.vendor_id.clone(),
        invoice_number: invoice.invoice_id.clone(),
        billing_amount: invoice.summary.billing_amount,
        po_number: invoice.purchase_order_number.clone(),
        processing_result: invoicex_ledger::processing_result(Disposition::Approved, None),
        line_items_count: invoice.line_items.len(),
        issue_date: invoice.issue_date.clone(),
    };
    logs.append_processed_invoice(&processed)?;

    Ok(TriageDecision {
        disposition: Disposition::Approved,
        queue: None,
        priority: None,
        exception_id: None,
    })
}
