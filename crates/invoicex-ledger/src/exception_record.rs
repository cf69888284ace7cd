// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canonical, delimited-text serialization and parsing of
//! [`ExceptionRecord`] (spec.md §6.2).

use std::fmt::Write as _;

use invoicex_core::{Disposition, ExceptionRecord, Priority, Queue};

const START_MARKER: &str = "=== EXCEPTION_START ===";
const END_MARKER: &str = "=== EXCEPTION_END ===";

/// Render `record` as the exact delimited-text block spec.md §6.2
/// describes.
#[must_use]
pub fn render(record: &ExceptionRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{START_MARKER}");
    let _ = writeln!(out, "EXCEPTION_ID: {}", record.exception_id);
    let _ = writeln!(out, "EXCEPTION_TYPE: {}", record.exception_type);
    let _ = writeln!(out, "STATUS: {}", record.status);
    let _ = writeln!(out, "QUEUE: {}", record.queue);
    let _ = writeln!(out, "PRIORITY: {}", record.priority);
    let _ = writeln!(out, "TIMESTAMP: {}", record.timestamp);
    let _ = writeln!(out, "INVOICE_ID: {}", record.invoice_id);
    let _ = writeln!(out, "PO_NUMBER: {}", record.po_number);
    let _ = writeln!(out, "AMOUNT: {}", record.amount);
    let _ = writeln!(out, "SUPPLIER: {}", record.supplier);
    let _ = writeln!(out, "ROUTING_REASON: {}", record.routing_reason);
    let _ = writeln!(
        out,
        "MANAGER_APPROVAL_REQUIRED: {}",
        if record.manager_approval_required {
            "YES"
        } else {
            "NO"
        }
    );
    let _ = writeln!(out, "VALIDATION_DETAILS:");
    for (field, value) in &record.validation_details {
        let _ = writeln!(out, "{field}: {value}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "CONTEXT:");
    let _ = writeln!(out, "{}", record.context);
    let _ = writeln!(out);
    let _ = writeln!(out, "SUGGESTED_ACTIONS:");
    for action in &record.suggested_actions {
        let _ = writeln!(out, "- {action}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "METADATA:");
    for (key, value) in &record.metadata {
        let _ = writeln!(out, "{key}: {value}");
    }
    let _ = writeln!(out, "{END_MARKER}");
    out
}

/// Error parsing a delimited exception-record block.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No `=== EXCEPTION_START ===`/`=== EXCEPTION_END ===` pair was found.
    #[error("missing EXCEPTION_START/EXCEPTION_END markers")]
    MissingMarkers,
    /// A required header field was absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// A header field's value could not be parsed as its expected type.
    #[error("invalid value for field {field}: {value}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// The unparseable raw value.
        value: String,
    },
}

/// Parse a single delimited exception-record block, tolerating
/// arbitrary whitespace and unknown keys (spec.md §6.2).
///
/// Round-trips losslessly with [`render`], except for intentional
/// whitespace normalization (leading/trailing line whitespace is
/// trimmed on read).
pub fn parse(text: &str) -> Result<ExceptionRecord, ParseError> {
    let start = text.find(START_MARKER).ok_or(ParseError::MissingMarkers)?;
    let end = text[start..]
        .find(END_MARKER)
        .map(|i| start + i)
        .ok_or(ParseError::MissingMarkers)?;
    let body = &text[start + START_MARKER.len()..end];

    let mut exception_id = None;
    let mut exception_type = None;
    let mut status = None;
    let mut queue = None;
    let mut priority = None;
    let mut timestamp = None;
    let mut invoice_id = None;
    let mut po_number = None;
    let mut amount = None;
    let mut supplier = None;
    let mut routing_reason = None;
    let mut manager_approval_required = None;
    let mut validation_details = Vec::new();
    let mut context_lines: Vec<&str> = Vec::new();
    let mut suggested_actions = Vec::new();
    let mut metadata = Vec::new();

    #[derive(PartialEq)]
    enum Section {
        Header,
        ValidationDetails,
        Context,
        SuggestedActions,
        Metadata,
    }
    let mut section = Section::Header;

    for raw_line in body.lines() {
        let line = raw_line.trim_end();
        let trimmed = line.trim();

        if let Some(value) = trimmed.strip_prefix("VALIDATION_DETAILS:") {
            section = Section::ValidationDetails;
            if !value.trim().is_empty() {
                push_field_line(value.trim(), &mut validation_details);
            }
            continue;
        }
        if trimmed == "CONTEXT:" {
            section = Section::Context;
            continue;
        }
        if trimmed == "SUGGESTED_ACTIONS:" {
            section = Section::SuggestedActions;
            continue;
        }
        if trimmed == "METADATA:" {
            section = Section::Metadata;
            continue;
        }

        if section == Section::Header {
            if trimmed.is_empty() {
                continue;
            }
            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "EXCEPTION_ID" => exception_id = Some(value.to_string()),
                "EXCEPTION_TYPE" => exception_type = Some(value.to_string()),
                "STATUS" => status = Some(value.to_string()),
                "QUEUE" => queue = Some(parse_queue(value)?),
                "PRIORITY" => priority = Some(parse_priority(value)?),
                "TIMESTAMP" => timestamp = Some(value.to_string()),
                "INVOICE_ID" => invoice_id = Some(value.to_string()),
                "PO_NUMBER" => po_number = Some(value.to_string()),
                "AMOUNT" => amount = Some(value.to_string()),
                "SUPPLIER" => supplier = Some(value.to_string()),
                "ROUTING_REASON" => routing_reason = Some(value.to_string()),
                "MANAGER_APPROVAL_REQUIRED" => {
                    manager_approval_required = Some(value.eq_ignore_ascii_case("yes"));
                }
                _ => {} // unknown header key: tolerated, ignored
            }
        } else if section == Section::ValidationDetails {
            if trimmed.is_empty() {
                section = Section::Header; // blank line ends the block
                continue;
            }
            push_field_line(trimmed, &mut validation_details);
        } else if section == Section::Context {
            if trimmed.is_empty() && !context_lines.is_empty() {
                continue;
            }
            context_lines.push(line);
        } else if section == Section::SuggestedActions {
            if let Some(action) = trimmed.strip_prefix("- ") {
                suggested_actions.push(action.to_string());
            }
        } else if section == Section::Metadata {
            if trimmed.is_empty() {
                continue;
            }
            push_field_line(trimmed, &mut metadata);
        }
    }

    // Trailing blank lines accumulated in CONTEXT are cosmetic.
    while matches!(context_lines.last(), Some(l) if l.trim().is_empty()) {
        context_lines.pop();
    }

    Ok(ExceptionRecord {
        exception_id: exception_id.ok_or(ParseError::MissingField("EXCEPTION_ID"))?,
        exception_type: exception_type.ok_or(ParseError::MissingField("EXCEPTION_TYPE"))?,
        status: status.ok_or(ParseError::MissingField("STATUS"))?,
        queue: queue.ok_or(ParseError::MissingField("QUEUE"))?,
        priority: priority.ok_or(ParseError::MissingField("PRIORITY"))?,
        timestamp: timestamp.ok_or(ParseError::MissingField("TIMESTAMP"))?,
        invoice_id: invoice_id.ok_or(ParseError::MissingField("INVOICE_ID"))?,
        po_number: po_number.unwrap_or_else(|| "N/A".to_string()),
        amount: amount.unwrap_or_else(|| "N/A".to_string()),
        supplier: supplier.unwrap_or_default(),
        routing_reason: routing_reason.unwrap_or_default(),
        manager_approval_required: manager_approval_required.unwrap_or(false),
        validation_details,
        context: context_lines.join("\n"),
        suggested_actions,
        metadata,
    })
}

fn push_field_line(line: &str, out: &mut Vec<(String, String)>) {
    if let Some((field, value)) = line.split_once(':') {
        out.push((field.trim().to_string(), value.trim().to_string()));
    }
}

fn parse_queue(value: &str) -> Result<Queue, ParseError> {
    match value {
        "duplicate_invoices" => Ok(Queue::DuplicateInvoices),
        "missing_data" => Ok(Queue::MissingData),
        "low_confidence_matches" => Ok(Queue::LowConfidenceMatches),
        "price_discrepancies" => Ok(Queue::PriceDiscrepancies),
        "supplier_mismatch" => Ok(Queue::SupplierMismatch),
        "billing_discrepancies" => Ok(Queue::BillingDiscrepancies),
        "date_discrepancies" => Ok(Queue::DateDiscrepancies),
        "currency_discrepancies" => Ok(Queue::CurrencyDiscrepancies),
        "payment_terms_discrepancies" => Ok(Queue::PaymentTermsDiscrepancies),
        "high_value_approval" => Ok(Queue::HighValueApproval),
        other => Err(ParseError::InvalidField {
            field: "QUEUE",
            value: other.to_string(),
        }),
    }
}

fn parse_priority(value: &str) -> Result<Priority, ParseError> {
    match value {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        other => Err(ParseError::InvalidField {
            field: "PRIORITY",
            value: other.to_string(),
        }),
    }
}

/// The single-line exceptions-ledger entry (spec.md §6.2).
#[must_use]
pub fn render_ledger_line(record: &ExceptionRecord) -> String {
    format!(
        "[EXCEPTION] [{}] id={} status=OPEN type=VALIDATION_FAILED invoice_id={} queue={}",
        record.timestamp, record.exception_id, record.invoice_id, record.queue
    )
}

/// Generate a fresh `EXC-<12 uppercase hex>` exception ID (spec.md §3, §4.8).
#[must_use]
pub fn generate_exception_id() -> String {
    format!("EXC-{}", &uuid::Uuid::new_v4().simple().to_string()[..12].to_uppercase())
}

/// The `processing_result` tag written to the processed-invoice log
/// for a given terminal disposition (spec.md §4.8).
#[must_use]
pub fn processing_result(disposition: Disposition, queue: Option<Queue>) -> String {
    disposition.processing_result(queue)
}
