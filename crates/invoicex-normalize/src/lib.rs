// SPDX-License-Identifier: MIT OR Apache-2.0
//! Token normalization for PO numbers and contract IDs.

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Uppercase a token and strip every non-alphanumeric character.
///
/// Used for PO-number and contract-ID equality comparisons prior to
/// resolution. `None` passes through unchanged; an all-punctuation
/// input normalizes to an empty string, not `None`.
///
/// # Examples
///
/// ```
/// use invoicex_normalize::normalize_token;
///
/// assert_eq!(normalize_token(Some("PO-AEG-GA001")), Some("POAEGGA001".to_string()));
/// assert_eq!(normalize_token(None), None);
/// ```
#[must_use]
pub fn normalize_token(value: Option<&str>) -> Option<String> {
    value.map(|s| {
        s.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect()
    })
}

/// Like [`normalize_token`] but for a value already known to be present.
#[must_use]
pub fn normalize_token_str(value: &str) -> String {
    normalize_token(Some(value)).unwrap_or_default()
}
