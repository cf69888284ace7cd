// SPDX-License-Identifier: MIT OR Apache-2.0
//! PO-item enumeration. Each PO document on disk wraps a list of items
//! under a `purchase_orders` key — a single file covers many PO
//! numbers, unlike invoices and contracts which are one document per
//! file.

use std::path::Path;

use invoicex_core::PoItem;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::read::read_json_file;

#[derive(Debug, Deserialize)]
struct PoFile {
    #[serde(default)]
    purchase_orders: Vec<PoItem>,
}

/// Every PO item found across every `*.json` file in `po_dirs`, in
/// directory order, each file's items in file order. Uses `walkdir`
/// (unlike the single-level subdirectory lookup) because multiple base
/// directories make this genuinely an arbitrary-depth enumeration.
pub(crate) fn enumerate_po_items(po_dirs: &[std::path::PathBuf]) -> Vec<PoItem> {
    let mut items = Vec::new();
    for dir in po_dirs {
        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            if entry.path().extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(file) = read_json_file::<PoFile>(entry.path()) {
                items.extend(file.purchase_orders);
            }
        }
    }
    items
}

/// The single PO item whose normalized `po_number` equals
/// `normalized_po`, if any. `normalized_po` must already be normalized
/// by the caller via `invoicex-normalize`.
pub(crate) fn find_po_item_by_number(po_dirs: &[std::path::PathBuf], normalized_po: &str) -> Option<PoItem> {
    enumerate_po_items(po_dirs)
        .into_iter()
        .find(|item| invoicex_normalize::normalize_token_str(&item.po_number) == normalized_po)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_po_file(dir: &Path, name: &str, json: &str) {
        fs::write(dir.join(name), json).unwrap();
    }

    #[test]
    fn enumerates_items_across_multiple_files() {
        let dir = tempfile::tempdir().unwrap();
        write_po_file(
            dir.path(),
            "a.json",
            r#"{"purchase_orders": [{"po_number": "PO-1", "contract_id": "C-1", "total_value": 100.0, "description": "", "line_items": []}]}"#,
        );
        write_po_file(
            dir.path(),
            "b.json",
            r#"{"purchase_orders": [{"po_number": "PO-2", "contract_id": "C-2", "total_value": 200.0, "description": "", "line_items": []}]}"#,
        );
        let items = enumerate_po_items(&[dir.path().to_path_buf()]);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn finds_po_item_by_normalized_number() {
        let dir = tempfile::tempdir().unwrap();
        write_po_file(
            dir.path(),
            "a.json",
            r#"{"purchase_orders": [{"po_number": "PO-AEG-GA001", "contract_id": "C-1", "total_value": 100.0, "description": "", "line_items": []}]}"#,
        );
        let found = find_po_item_by_number(&[dir.path().to_path_buf()], "POAEGGA001");
        assert!(found.is_some());
    }

    #[test]
    fn malformed_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_po_file(dir.path(), "bad.json", "{not json");
        write_po_file(
            dir.path(),
            "good.json",
            r#"{"purchase_orders": [{"po_number": "PO-1", "contract_id": "C-1", "total_value": 100.0, "description": "", "line_items": []}]}"#,
        );
        let items = enumerate_po_items(&[dir.path().to_path_buf()]);
        assert_eq!(items.len(), 1);
    }
}
