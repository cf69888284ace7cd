// SPDX-License-Identifier: MIT OR Apache-2.0
//! Invoice lookup: one document per file.

use std::fs;
use std::path::{Path, PathBuf};

use invoicex_core::Invoice;

use crate::read::read_json_file;

/// Resolve `filename` to an on-disk path.
///
/// A filename containing a path separator, or starting with `.`, is
/// treated as an absolute or relative path and returned verbatim
/// (resolved to an absolute path) if it exists; otherwise it is
/// searched for by plain name within `invoice_dirs`, in order.
pub(crate) fn find_invoice_path(invoice_dirs: &[PathBuf], filename: &str) -> Option<PathBuf> {
    if filename.contains(std::path::MAIN_SEPARATOR) || filename.starts_with('.') {
        let path = Path::new(filename);
        let abs = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().ok()?.join(path)
        };
        return abs.is_file().then_some(abs);
    }

    invoice_dirs
        .iter()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

/// Load the invoice at `path`.
pub(crate) fn load_invoice(path: &Path) -> Option<Invoice> {
    read_json_file(path)
}

/// Every `*.json` file under `invoice_dirs`, lexicographically sorted
/// within each directory, directories in order.
pub(crate) fn list_invoice_paths(invoice_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for dir in invoice_dirs {
        let Ok(entries) = fs::read_dir(dir) else {
            continue;
        };
        let mut names: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        names.sort();
        paths.extend(names);
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_invoice_by_bare_name_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let invoice_path = dir.path().join("inv-1.json");
        fs::write(&invoice_path, "{}").unwrap();
        let found = find_invoice_path(&[dir.path().to_path_buf()], "inv-1.json");
        assert_eq!(found, Some(invoice_path));
    }

    #[test]
    fn accepts_absolute_path_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let invoice_path = dir.path().join("inv-1.json");
        fs::write(&invoice_path, "{}").unwrap();
        let as_str = invoice_path.to_str().unwrap();
        let found = find_invoice_path(&[], as_str);
        assert_eq!(found, Some(invoice_path));
    }

    #[test]
    fn missing_invoice_is_none() {
        assert!(find_invoice_path(&[], "does-not-exist.json").is_none());
    }

    #[test]
    fn listing_is_lexicographic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        let paths = list_invoice_paths(&[dir.path().to_path_buf()]);
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }
}
