// SPDX-License-Identifier: MIT OR Apache-2.0
//! Best-PO-match: pick the single purchase-order candidate whose
//! number most closely matches the invoice's stated PO number.

use serde::Serialize;

use crate::similarity::{normalize_for_fuzzy, similarity_ratio};

/// Default confidence floor for [`find_best_po_match`].
pub const DEFAULT_MIN_PO_CONFIDENCE: f64 = 0.7;

/// Outcome of a best-PO-match search.
#[derive(Debug, Clone, Serialize)]
pub struct PoMatchReport {
    /// Index into the candidate slice of the winning PO number, if any
    /// candidate cleared `min_confidence`.
    pub matched_index: Option<usize>,
    /// Similarity of the winning candidate, or of the best candidate
    /// considered if none cleared the threshold (useful for
    /// diagnostics in a `dependency_check` failure).
    pub confidence: f64,
    /// Number of candidates considered.
    pub candidates_considered: usize,
}

impl PoMatchReport {
    /// Whether a candidate cleared the confidence threshold.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.matched_index.is_some()
    }
}

/// Find the best match for `invoice_po` among `candidate_po_numbers`.
///
/// Each candidate is scored via [`crate::similarity_ratio`] over the
/// fuzzy-normalized strings; exact-after-normalization equality scores
/// `1.0`. The best-scoring candidate wins only if its score is `>=
/// min_confidence`; ties are broken by first occurrence in the slice.
///
/// # Examples
///
/// ```
/// use invoicex_match::{find_best_po_match, DEFAULT_MIN_PO_CONFIDENCE};
///
/// let candidates = ["PO-AEG-GA001", "PO-AEG-GA002"];
/// let report = find_best_po_match("po-aeg-ga001", &candidates, DEFAULT_MIN_PO_CONFIDENCE);
/// assert_eq!(report.matched_index, Some(0));
/// assert_eq!(report.confidence, 1.0);
/// ```
#[must_use]
pub fn find_best_po_match(
    invoice_po: &str,
    candidate_po_numbers: &[&str],
    min_confidence: f64,
) -> PoMatchReport {
    let normalized_invoice = normalize_for_fuzzy(invoice_po);

    let mut best_index = None;
    let mut best_score = 0.0f64;

    for (idx, candidate) in candidate_po_numbers.iter().enumerate() {
        let normalized_candidate = normalize_for_fuzzy(candidate);
        let score = similarity_ratio(&normalized_invoice, &normalized_candidate);
        if score > best_score {
            best_score = score;
            best_index = Some(idx);
        }
    }

    let matched_index = best_index.filter(|_| best_score >= min_confidence);

    PoMatchReport {
        matched_index,
        confidence: best_score,
        candidates_considered: candidate_po_numbers.len(),
    }
}
