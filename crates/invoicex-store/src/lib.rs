// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-only access to the on-disk JSON document store (spec.md §4.2).
//!
//! Layout: one or more base directories (`json_files/` or its legacy
//! `json files/` spelling) under a repo root, each holding
//! case-insensitively-named `invoices/`, `POs/`, and `contracts/`
//! subdirectories. Invoices and contracts are one document per file;
//! PO files each wrap a `purchase_orders` array of many PO items.
//!
//! Every lookup is silent: a missing directory, a malformed document,
//! or an I/O error simply yields `None`/an empty list, logged at
//! `tracing::debug!`. Callers (the Resolver, the validation runner) are
//! responsible for turning "not found" into a reportable exception.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod contracts;
mod dirs;
mod invoices;
mod pos;
mod read;

use std::path::{Path, PathBuf};

use invoicex_core::{Contract, Invoice, PoItem};

/// Handle onto a repo root's document store.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    repo_root: PathBuf,
}

impl DocumentStore {
    /// Open a document store rooted at `repo_root`. Performs no I/O;
    /// directory resolution happens lazily on each call so the store
    /// tolerates directories appearing/disappearing between calls.
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// The repo root this store was opened with.
    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Every existing `invoices` subdirectory, across both base-dir spellings.
    #[must_use]
    pub fn invoice_dirs(&self) -> Vec<PathBuf> {
        dirs::resolve_subdirs(&self.repo_root, "invoices")
    }

    /// Every existing `POs` subdirectory, across both base-dir spellings.
    #[must_use]
    pub fn po_dirs(&self) -> Vec<PathBuf> {
        dirs::resolve_subdirs(&self.repo_root, "pos")
    }

    /// Every existing `contracts` subdirectory, across both base-dir spellings.
    #[must_use]
    pub fn contract_dirs(&self) -> Vec<PathBuf> {
        dirs::resolve_subdirs(&self.repo_root, "contracts")
    }

    /// Resolve and load the invoice named `filename`
    /// (bare name, searched in `invoice_dirs`; or an absolute/relative
    /// path, used verbatim).
    #[must_use]
    pub fn load_invoice(&self, filename: &str) -> Option<Invoice> {
        let path = invoices::find_invoice_path(&self.invoice_dirs(), filename)?;
        invoices::load_invoice(&path)
    }

    /// Every invoice path, lexicographically sorted within each directory.
    #[must_use]
    pub fn list_invoice_paths(&self) -> Vec<PathBuf> {
        invoices::list_invoice_paths(&self.invoice_dirs())
    }

    /// Every PO item across every PO file, flattened.
    #[must_use]
    pub fn list_po_items(&self) -> Vec<PoItem> {
        pos::enumerate_po_items(&self.po_dirs())
    }

    /// The single PO item whose normalized `po_number` equals
    /// `normalized_po` (already normalized by the caller).
    #[must_use]
    pub fn find_po_item_by_number(&self, normalized_po: &str) -> Option<PoItem> {
        pos::find_po_item_by_number(&self.po_dirs(), normalized_po)
    }

    /// The contract whose normalized `contract_id` equals
    /// `normalized_contract_id` (already normalized by the caller).
    #[must_use]
    pub fn find_contract_by_id(&self, normalized_contract_id: &str) -> Option<Contract> {
        contracts::find_contract_by_id(&self.contract_dirs(), normalized_contract_id)
    }
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
    fn loads_invoice_by_bare_name() {
        let repo = fixture_repo();
        let store = DocumentStore::new(repo.path());
        let invoice = store.load_invoice("inv-1.json").unwrap();
        assert_eq!(invoice.invoice_id, "INV-1");
    }

    #[test]
    fn finds_po_item_and_contract_through_store() {
        let repo = fixture_repo();
        let store = DocumentStore::new(repo.path());
        let po = store.find_po_item_by_number("PO1").unwrap();
        assert_eq!(po.contract_id, "C-1");
        let contract = store.find_contract_by_id("C1").unwrap();
        assert_eq!(contract.contract_id, "C-1");
    }

    #[test]
    fn missing_repo_root_yields_empty_results_not_panics() {
        let store = DocumentStore::new("/nonexistent/repo/root");
        assert!(store.load_invoice("inv-1.json").is_none());
        assert!(store.list_po_items().is_empty());
        assert!(store.find_contract_by_id("ANY").is_none());
    }
}
