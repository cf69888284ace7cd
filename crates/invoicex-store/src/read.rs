// SPDX-License-Identifier: MIT OR Apache-2.0
//! BOM-tolerant JSON document reading. Any I/O or parse error is
//! swallowed to `None` at `tracing::debug!` — the store is silent by
//! design (spec.md §4.2).

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Read and parse a JSON document at `path`, tolerating a leading
/// UTF-8 BOM. Returns `None` (logged at debug) on any I/O, UTF-8, or
/// JSON error.
pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "document store: read failed");
            return None;
        }
    };
    let content = bytes.strip_prefix(&UTF8_BOM).unwrap_or(&bytes);
    let text = match std::str::from_utf8(content) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "document store: invalid utf-8");
            return None;
        }
    };
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "document store: json parse failed");
            None
        }
    }
}
