// SPDX-License-Identifier: MIT OR Apache-2.0
//! Base-directory and subdirectory resolution.

use std::fs;
use std::path::{Path, PathBuf};

/// Both spellings of the base documents directory the source tooling
/// supports, tried in this order.
const BASE_DIR_NAMES: [&str; 2] = ["json_files", "json files"];

/// Every existing base directory under `repo_root`.
pub(crate) fn base_dirs(repo_root: &Path) -> Vec<PathBuf> {
    BASE_DIR_NAMES
        .iter()
        .map(|name| repo_root.join(name))
        .filter(|p| p.is_dir())
        .collect()
}

/// Find a subdirectory of `parent` whose name matches `target` case-
/// insensitively, by listing `parent` rather than walking arbitrarily
/// deep — the source layout is exactly one level.
pub(crate) fn find_subdir_case_insensitive(parent: &Path, target: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(parent).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.eq_ignore_ascii_case(target) {
            let candidate = entry.path();
            if candidate.is_dir() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Every base-dir's matching subdirectory, in base-dir order.
pub(crate) fn resolve_subdirs(repo_root: &Path, target: &str) -> Vec<PathBuf> {
    base_dirs(repo_root)
        .into_iter()
        .filter_map(|base| find_subdir_case_insensitive(&base, target))
        .collect()
}
