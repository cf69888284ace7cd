// SPDX-License-Identifier: MIT OR Apache-2.0
//! The processed-invoice log: `system_logs/processed_invoices.log`
//! (spec.md §3, §4.7, §6.4).

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use invoicex_core::ProcessedInvoiceRecord;
use invoicex_error::PipelineError;

const LINE_PREFIX: &str = "PROCESSED: ";

/// Read every well-formed record in the processed-invoice log at
/// `path`. Lines that don't start with `PROCESSED: `, or whose JSON
/// fails to parse, are silently skipped — this tolerates hand-editing
/// and a torn final line left by a crashed writer (spec.md §4.7, §5).
/// A missing file reads as an empty history.
pub(crate) fn read_all(path: &Path) -> Vec<ProcessedInvoiceRecord> {
    let Ok(file) = std::fs::File::open(path) else {
        return Vec::new();
    };
    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| {
            let json = line.trim().strip_prefix(LINE_PREFIX)?;
            match serde_json::from_str::<ProcessedInvoiceRecord>(json) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::debug!(error = %err, "processed-invoice log: skipping malformed line");
                    None
                }
            }
        })
        .collect()
}

/// Append `record` to the processed-invoice log at `path`, creating it
/// (and its parent directory) if necessary. A single `write_all` call
/// keeps the append atomic at record granularity, per spec.md §5.
pub(crate) fn append(path: &Path, record: &ProcessedInvoiceRecord) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::log_write(path, e))?;
    }
    let json = serde_json::to_string(record).map_err(|e| {
        PipelineError::log_write(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    let line = format!("{LINE_PREFIX}{json}\n");

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PipelineError::log_write(path, e))?;
    file.write_all(line.as_bytes())
        .map_err(|e| PipelineError::log_write(path, e))
}
