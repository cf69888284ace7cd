// SPDX-License-Identifier: MIT OR Apache-2.0
//! Library-level command implementations for the invoicex CLI.
//!
//! Kept separate from `main.rs` so the pipeline wiring — resolve,
//! validate, triage — can be exercised by `assert_cmd` integration
//! tests without spawning a fresh process per assertion where a direct
//! call suffices.

use std::path::Path;

use invoicex_config::RepoConfig;
use invoicex_core::{Disposition, Priority, Queue, ValidationResult};
use invoicex_error::PipelineError;
use invoicex_ledger::SystemLogs;
use invoicex_store::DocumentStore;
use invoicex_triage::TriageDecision;
use invoicex_validate::run_validations;

/// Every queue the triage router can route to, in priority order —
/// used by `clear-logs` to enumerate `system_logs/queue_*.log` without
/// guessing file names from disk.
const ALL_QUEUES: [Queue; 9] = [
    Queue::DuplicateInvoices,
    Queue::MissingData,
    Queue::LowConfidenceMatches,
    Queue::PriceDiscrepancies,
    Queue::SupplierMismatch,
    Queue::BillingDiscrepancies,
    Queue::DateDiscrepancies,
    Queue::CurrencyDiscrepancies,
    Queue::PaymentTermsDiscrepancies,
];

/// The full outcome of processing one invoice filename: the validator
/// results and the triage decision they produced.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// `filename` as given on the command line.
    pub filename: String,
    /// Per-validator PASS/FAIL results, in the runner's fixed order.
    pub tool_results: Vec<ValidationResult>,
    /// Overall PASS iff every tool result is PASS.
    pub overall_pass: bool,
    /// The triage decision reached for this invoice.
    pub decision: TriageDecision,
}

/// Run one invoice through resolve → validate → triage against
/// `config`, persisting every log write that disposition requires.
///
/// # Errors
///
/// Returns [`PipelineError`] only for a fatal log/ledger write
/// failure (spec.md §7) — every validation or routing outcome is
/// reported as data in the returned [`ProcessOutcome`].
pub fn process_invoice(filename: &str, config: &RepoConfig) -> Result<ProcessOutcome, PipelineError> {
    let root = config.repo_root_path();
    let store = DocumentStore::new(&root);
    let logs = SystemLogs::new(&root);

    let triple = invoicex_resolver::resolve(
        &store,
        filename,
        config.po_min_confidence,
        config.supplier_min_confidence,
    );
    let run = run_validations(triple, &logs);
    let overall_pass = run.validation == invoicex_core::ToolStatus::Pass;
    let tool_results = run.tool_results.clone();
    let decision = invoicex_triage::triage_and_route(&run, &logs)?;

    Ok(ProcessOutcome {
        filename: filename.to_string(),
        tool_results,
        overall_pass,
        decision,
    })
}

/// The summary line recorded for one invoice in a `process-batch` run.
#[derive(Debug)]
pub struct BatchItem {
    /// The invoice filename processed.
    pub filename: String,
    /// `Ok` with the outcome, or `Err` with the fatal I/O failure that
    /// stopped processing of this item (a later item may still succeed).
    pub result: Result<ProcessOutcome, String>,
}

/// Tallies of a `process-batch` run: disposition counts plus a count
/// per exception queue, in [`ALL_QUEUES`] order.
#[derive(Debug, Default)]
pub struct BatchCounts {
    /// Number of invoices approved outright.
    pub approved: usize,
    /// Number of invoices routed to manager approval while otherwise passing.
    pub pending_approval: usize,
    /// Per-queue rejection counts, `(queue, count)`, in priority order.
    pub by_queue: Vec<(Queue, usize)>,
}

impl BatchCounts {
    fn record(&mut self, decision: &TriageDecision) {
        match decision.disposition {
            Disposition::Approved => self.approved += 1,
            Disposition::PendingApproval => self.pending_approval += 1,
            Disposition::Rejected => {
                let queue = decision.queue.expect("rejected decisions always carry a queue");
                if self.by_queue.is_empty() {
                    self.by_queue = ALL_QUEUES.iter().map(|q| (*q, 0)).collect();
                }
                if let Some(entry) = self.by_queue.iter_mut().find(|(q, _)| *q == queue) {
                    entry.1 += 1;
                }
            }
        }
    }
}

/// Enumerate every `*.json` file directly under `dir` (lexicographic
/// order) and run each through [`process_invoice`] (spec.md §4.10).
///
/// A fatal log-write error on one invoice is recorded in that item's
/// `result` and does not stop processing of the rest of the batch.
#[must_use]
pub fn process_batch(dir: &Path, config: &RepoConfig) -> (Vec<BatchItem>, BatchCounts) {
    let mut entries: Vec<std::path::PathBuf> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    entries.sort();

    let mut items = Vec::with_capacity(entries.len());
    let mut counts = BatchCounts::default();
    for path in entries {
        let filename = path.display().to_string();
        match process_invoice(&filename, config) {
            Ok(outcome) => {
                counts.record(&outcome.decision);
                items.push(BatchItem { filename, result: Ok(outcome) });
            }
            Err(err) => {
                items.push(BatchItem { filename, result: Err(err.to_string()) });
            }
        }
    }
    (items, counts)
}

/// Truncate every `system_logs/*.log` file under `config`'s repo root
/// to zero bytes (spec.md §4.11). Returns the paths that were
/// truncated, including ones that did not exist (truncation of a
/// missing file is a no-op, not an error — the file is simply created
/// empty, matching the Python utility's `open(path, "w").close()`).
///
/// # Errors
///
/// Returns [`PipelineError::LogWrite`] if any file could not be
/// opened/truncated.
pub fn clear_logs(config: &RepoConfig) -> Result<Vec<std::path::PathBuf>, PipelineError> {
    let root = config.repo_root_path();
    let logs = SystemLogs::new(&root);

    let mut paths = vec![
        logs.processed_invoices_path(),
        logs.exceptions_ledger_path(),
        logs.payments_log_path(),
    ];
    paths.extend(ALL_QUEUES.iter().map(|q| logs.queue_log_path(*q)));
    paths.push(logs.queue_log_path(Queue::HighValueApproval));

    for path in &paths {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PipelineError::log_write(path.clone(), e))?;
        }
        std::fs::File::create(path).map_err(|e| PipelineError::log_write(path.clone(), e))?;
    }
    Ok(paths)
}

/// Human-readable one-line disposition label, used by the text
/// formatter and the `process-batch` per-item summary line.
#[must_use]
pub fn disposition_label(decision: &TriageDecision) -> String {
    match decision.disposition {
        Disposition::Approved => "APPROVED".to_string(),
        Disposition::PendingApproval => format!(
            "PENDING_APPROVAL (queue={}, priority={})",
            decision.queue.map(|q| q.to_string()).unwrap_or_default(),
            decision.priority.map(priority_label).unwrap_or_default(),
        ),
        Disposition::Rejected => format!(
            "REJECTED (queue={}, priority={}, exception_id={})",
            decision.queue.map(|q| q.to_string()).unwrap_or_default(),
            decision.priority.map(priority_label).unwrap_or_default(),
            decision.exception_id.as_deref().unwrap_or("<none>"),
        ),
    }
}

fn priority_label(p: Priority) -> String {
    p.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("json_files");
        fs::create_dir_all(base.join("invoices")).unwrap();
        fs::create_dir_all(base.join("POs")).unwrap();
        fs::create_dir_all(base.join("contracts")).unwrap();
        fs::write(
            base.join("invoices").join("inv-1.json"),
            r#"{
                "invoice_id": "INV-1",
                "purchase_order_number": "PO-1",
                "supplier_info": {"name": "Acme", "vendor_id": "V-1"},
                "bill_to_info": {"name": "Client"},
                "issue_date": "2024-06-01",
                "due_date": "2024-07-01",
                "payment_terms": "Net 30",
                "currency": "USD",
                "summary": {"subtotal": 900.0, "tax_amount": 100.0, "billing_amount": 1000.0},
                "line_items": []
            }"#,
        )
        .unwrap();
        fs::write(
            base.join("POs").join("pos.json"),
            r#"{"purchase_orders": [{"po_number": "PO-1", "contract_id": "C-1", "total_value": 1000.0, "description": "", "line_items": []}]}"#,
        )
        .unwrap();
        fs::write(
            base.join("contracts").join("c.json"),
            r#"{
                "contract_id": "C-1",
                "parties": {"supplier": {"name": "Acme", "vendor_id": "V-1"}, "client": {"name": "Client"}},
                "contract_metadata": {"effective_date": "2024-01-01", "end_date": "2024-12-31"},
                "payment_terms": "Net 30",
                "currency": "USD",
                "sections": []
            }"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn happy_path_invoice_is_approved_and_logged() {
        let repo = fixture_repo();
        let config = RepoConfig {
            repo_root: Some(repo.path().display().to_string()),
            ..RepoConfig::default()
        };
        let outcome = process_invoice("inv-1.json", &config).unwrap();
        assert!(outcome.overall_pass);
        assert_eq!(outcome.decision.disposition, Disposition::Approved);
        assert!(repo.path().join("system_logs/payments.log").exists());
    }

    #[test]
    fn missing_invoice_routes_to_missing_data() {
        let repo = fixture_repo();
        let config = RepoConfig {
            repo_root: Some(repo.path().display().to_string()),
            ..RepoConfig::default()
        };
        let outcome = process_invoice("does-not-exist.json", &config).unwrap();
        assert!(!outcome.overall_pass);
        assert_eq!(outcome.decision.queue, Some(Queue::MissingData));
    }

    #[test]
    fn process_batch_counts_one_approval() {
        let repo = fixture_repo();
        let config = RepoConfig {
            repo_root: Some(repo.path().display().to_string()),
            ..RepoConfig::default()
        };
        let (items, counts) =
            process_batch(&repo.path().join("json_files/invoices"), &config);
        assert_eq!(items.len(), 1);
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.pending_approval, 0);
    }

    #[test]
    fn clear_logs_truncates_existing_content() {
        let repo = fixture_repo();
        let config = RepoConfig {
            repo_root: Some(repo.path().display().to_string()),
            ..RepoConfig::default()
        };
        process_invoice("inv-1.json", &config).unwrap();
        let payments_path = repo.path().join("system_logs/payments.log");
        assert!(fs::metadata(&payments_path).unwrap().len() > 0);

        clear_logs(&config).unwrap();
        assert_eq!(fs::metadata(&payments_path).unwrap().len(), 0);
    }

    #[test]
    fn clear_logs_creates_missing_files_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = RepoConfig {
            repo_root: Some(dir.path().display().to_string()),
            ..RepoConfig::default()
        };
        let paths = clear_logs(&config).unwrap();
        assert!(!paths.is_empty());
        for path in &paths {
            assert_eq!(fs::metadata(path).unwrap().len(), 0);
        }
    }
}
