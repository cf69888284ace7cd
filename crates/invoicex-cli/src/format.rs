// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output formatting for the invoicex CLI (spec.md §6.6, extended by
//! the expanded spec's `--format json|text` flag).

use std::fmt;
use std::str::FromStr;

use invoicex_core::ValidationResult;
use serde::Serialize;

use crate::commands::{disposition_label, BatchCounts, BatchItem, ProcessOutcome};

/// Output format for `process`/`process-batch` (spec.md §6.6's
/// human-readable default, extended with a JSON mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable multi-line text. Default, matching spec.md §6.6.
    Text,
    /// A single JSON object (pretty-printed) describing the outcome.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected text|json)")),
        }
    }
}

#[derive(Serialize)]
struct ToolResultJson<'a> {
    tool_id: &'a str,
    status: &'a str,
    exception_kinds: Vec<&'a str>,
}

#[derive(Serialize)]
struct ProcessOutcomeJson<'a> {
    filename: &'a str,
    validation: &'a str,
    tool_results: Vec<ToolResultJson<'a>>,
    disposition: &'a str,
    queue: Option<String>,
    priority: Option<String>,
    exception_id: Option<&'a str>,
}

fn tool_result_line(result: &ValidationResult) -> String {
    let status = if result.is_pass() { "PASS" } else { "FAIL" };
    if result.exceptions.is_empty() {
        format!("  [{status}] {}", result.tool_id)
    } else {
        let kinds: Vec<&str> = result.exceptions.iter().map(|e| e.kind()).collect();
        format!("  [{status}] {} ({})", result.tool_id, kinds.join(", "))
    }
}

/// Render a [`ProcessOutcome`] as spec.md §6.6's human-readable
/// summary: per-tool PASS/FAIL with reasons, overall verdict, and the
/// triage decision.
#[must_use]
pub fn format_outcome_text(outcome: &ProcessOutcome) -> String {
    let mut lines = vec![format!("invoice: {}", outcome.filename)];
    for result in &outcome.tool_results {
        lines.push(tool_result_line(result));
    }
    lines.push(format!(
        "validation: {}",
        if outcome.overall_pass { "PASS" } else { "FAIL" }
    ));
    lines.push(format!("triage: {}", disposition_label(&outcome.decision)));
    lines.join("\n")
}

/// Render a [`ProcessOutcome`] as a single pretty-printed JSON object.
#[must_use]
pub fn format_outcome_json(outcome: &ProcessOutcome) -> String {
    let decision = &outcome.decision;
    let json = ProcessOutcomeJson {
        filename: &outcome.filename,
        validation: if outcome.overall_pass { "PASS" } else { "FAIL" },
        tool_results: outcome
            .tool_results
            .iter()
            .map(|r| ToolResultJson {
                tool_id: &r.tool_id,
                status: if r.is_pass() { "PASS" } else { "FAIL" },
                exception_kinds: r.exceptions.iter().map(|e| e.kind()).collect(),
            })
            .collect(),
        disposition: match decision.disposition {
            invoicex_core::Disposition::Approved => "APPROVED",
            invoicex_core::Disposition::PendingApproval => "PENDING_APPROVAL",
            invoicex_core::Disposition::Rejected => "REJECTED",
        },
        queue: decision.queue.map(|q| q.to_string()),
        priority: decision.priority.map(|p| p.to_string()),
        exception_id: decision.exception_id.as_deref(),
    };
    serde_json::to_string_pretty(&json).unwrap_or_default()
}

/// Render `outcome` per `format`.
#[must_use]
pub fn format_outcome(outcome: &ProcessOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_outcome_text(outcome),
        OutputFormat::Json => format_outcome_json(outcome),
    }
}

/// One-line `process-batch` summary for a single item, `filename:
/// <disposition>` or `filename: ERROR <message>` on a fatal write
/// failure.
#[must_use]
pub fn format_batch_item_line(item: &BatchItem) -> String {
    match &item.result {
        Ok(outcome) => format!("{}: {}", item.filename, disposition_label(&outcome.decision)),
        Err(message) => format!("{}: ERROR {message}", item.filename),
    }
}

/// Render the final counts table spec.md §4.10 describes: approved,
/// pending_approval, then one line per exception queue that saw at
/// least one rejection.
#[must_use]
pub fn format_batch_counts(counts: &BatchCounts) -> String {
    let mut lines = vec![
        format!("approved: {}", counts.approved),
        format!("pending_approval: {}", counts.pending_approval),
    ];
    for (queue, count) in &counts.by_queue {
        if *count > 0 {
            lines.push(format!("{queue}: {count}"));
        }
    }
    lines.join("\n")
}
