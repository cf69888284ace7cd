// SPDX-License-Identifier: MIT OR Apache-2.0
//! Durable append-only text stores under `system_logs/` (spec.md §4.7,
//! §4.8, §6.2–§6.4): the processed-invoice ledger the duplicate
//! detector reads and triage writes, the canonical delimited exception
//! record (with a lossless parser), the exceptions ledger, and the
//! payments log.
//!
//! Every file has its own write-exclusive [`std::sync::Mutex`]; the
//! read path is always lock-free and tolerates a torn final line
//! (spec.md §5). [`SystemLogs`] is the one type most callers need —
//! `invoicex-triage` is the sole writer of everything but the
//! processed-invoice log's read path, which `invoicex-validate`'s
//! duplicate detector also uses.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod exception_record;
mod locks;
mod payments;
mod processed;

use std::path::{Path, PathBuf};

use invoicex_core::{ExceptionRecord, Invoice, ProcessedInvoiceRecord, Queue};
use invoicex_error::PipelineError;

pub use exception_record::{
    generate_exception_id, parse as parse_exception_record, processing_result,
    render as render_exception_record, render_ledger_line, ParseError as ExceptionRecordParseError,
};

use locks::FileLocks;

/// Handle onto a repo root's `system_logs/` directory. Cheap to clone
/// logically but kept behind `&self` methods since the lock registry
/// must be shared across every caller writing to the same repo root.
#[derive(Debug)]
pub struct SystemLogs {
    dir: PathBuf,
    locks: FileLocks,
}

impl SystemLogs {
    /// Open the `system_logs/` directory under `repo_root`. Performs
    /// no I/O; the directory is created lazily on first write.
    #[must_use]
    pub fn new(repo_root: impl AsRef<Path>) -> Self {
        Self {
            dir: repo_root.as_ref().join("system_logs"),
            locks: FileLocks::new(),
        }
    }

    /// Path to the processed-invoice log.
    #[must_use]
    pub fn processed_invoices_path(&self) -> PathBuf {
        self.dir.join("processed_invoices.log")
    }

    /// Path to a named queue's log.
    #[must_use]
    pub fn queue_log_path(&self, queue: Queue) -> PathBuf {
        self.dir.join(format!("queue_{queue}.log"))
    }

    /// Path to the exceptions ledger.
    #[must_use]
    pub fn exceptions_ledger_path(&self) -> PathBuf {
        self.dir.join("exceptions_ledger.log")
    }

    /// Path to the payments log.
    #[must_use]
    pub fn payments_log_path(&self) -> PathBuf {
        self.dir.join("payments.log")
    }

    /// Every well-formed record in the processed-invoice log, in file
    /// order. Lock-free; used by the duplicate detector (spec.md §4.5.5).
    #[must_use]
    pub fn read_processed_invoices(&self) -> Vec<ProcessedInvoiceRecord> {
        processed::read_all(&self.processed_invoices_path())
    }

    /// Append `record` to the processed-invoice log.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::LogWrite`] if the append fails.
    pub fn append_processed_invoice(
        &self,
        record: &ProcessedInvoiceRecord,
    ) -> Result<(), PipelineError> {
        let path = self.processed_invoices_path();
        let lock = self.locks.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        processed::append(&path, record)
    }

    /// Write `record`'s canonical block to its queue log, then append
    /// its one-line summary to the exceptions ledger (spec.md §4.8,
    /// §6.2). Each file is guarded by its own lock; the two writes are
    /// not atomic with respect to each other, matching spec.md §5's
    /// per-record-not-per-invocation atomicity guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::LogWrite`] if either append fails.
    pub fn append_exception(&self, record: &ExceptionRecord) -> Result<(), PipelineError> {
        let queue_path = self.queue_log_path(record.queue);
        {
            let lock = self.locks.lock_for(&queue_path);
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            append_block(&queue_path, &render_exception_record(record))?;
        }

        let ledger_path = self.exceptions_ledger_path();
        let lock = self.locks.lock_for(&ledger_path);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        append_block(&ledger_path, &format!("{}\n", render_ledger_line(record)))
    }

    /// Append the payments-log entry for an approved `invoice`
    /// (spec.md §6.3).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::LogWrite`] if the append fails.
    pub fn append_payment(&self, invoice: &Invoice, timestamp: &str) -> Result<(), PipelineError> {
        let path = self.payments_log_path();
        let lock = self.locks.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        payments::append(&path, invoice, timestamp)
    }
}

fn append_block(path: &Path, text: &str) -> Result<(), PipelineError> {
    use std::fs::OpenOptions;
    use std::io::Write as _;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::log_write(path, e))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PipelineError::log_write(path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| PipelineError::log_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicex_core::Priority;

    fn processed_record() -> ProcessedInvoiceRecord {
        ProcessedInvoiceRecord {
            timestamp: "2024-06-01T00:00:00Z".into(),
            invoice_id: "INV-1".into(),
            supplier_name: "Acme".into(),
            vendor_id: "V-1".into(),
            invoice_number: "INV-1".into(),
            billing_amount: 1000.0,
            po_number: "PO-1".into(),
            processing_result: "APPROVED".into(),
            line_items_count: 1,
            issue_date: "2024-06-01".into(),
        }
    }

    fn exception_record() -> ExceptionRecord {
        ExceptionRecord {
            exception_id: generate_exception_id(),
            exception_type: "VALIDATION_FAILED".into(),
            status: "OPEN".into(),
            queue: Queue::BillingDiscrepancies,
            priority: Priority::High,
            timestamp: "2024-06-01T00:00:00Z".into(),
            invoice_id: "INV-1".into(),
            po_number: "PO-1".into(),
            amount: "$1,500.00".into(),
            supplier: "Acme".into(),
            routing_reason: "Billing amount exceeds PO total value".into(),
            manager_approval_required: true,
            validation_details: vec![("billing_amount".into(), "1500.00".into())],
            context: "Invoice exceeds PO total_value.".into(),
            suggested_actions: vec!["Contact supplier".into()],
            metadata: vec![],
        }
    }

    #[test]
    fn processed_invoice_round_trips_through_system_logs() {
        let dir = tempfile::tempdir().unwrap();
        let logs = SystemLogs::new(dir.path());
        logs.append_processed_invoice(&processed_record()).unwrap();
        let records = logs.read_processed_invoices();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].invoice_id, "INV-1");
    }

    #[test]
    fn exception_writes_queue_log_and_ledger_line() {
        let dir = tempfile::tempdir().unwrap();
        let logs = SystemLogs::new(dir.path());
        let record = exception_record();
        logs.append_exception(&record).unwrap();

        let queue_contents = std::fs::read_to_string(logs.queue_log_path(record.queue)).unwrap();
        assert!(queue_contents.contains("EXCEPTION_ID: "));
        assert!(queue_contents.contains(&record.exception_id));

        let ledger_contents = std::fs::read_to_string(logs.exceptions_ledger_path()).unwrap();
        assert!(ledger_contents.contains(&record.exception_id));
        assert!(ledger_contents.starts_with("[EXCEPTION] "));
    }

    #[test]
    fn missing_repo_root_reads_as_empty_history() {
        let logs = SystemLogs::new("/nonexistent/repo/root");
        assert!(logs.read_processed_invoices().is_empty());
    }
}
