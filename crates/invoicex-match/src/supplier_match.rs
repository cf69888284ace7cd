// SPDX-License-Identifier: MIT OR Apache-2.0
//! Best-supplier-match: weighted composite of name similarity and
//! vendor-ID exactness.

use serde::Serialize;

use crate::similarity::{normalize_for_fuzzy, similarity_ratio};

/// Default confidence floor for [`find_best_supplier_match`].
pub const DEFAULT_MIN_SUPPLIER_CONFIDENCE: f64 = 0.8;

const NAME_WEIGHT: f64 = 0.7;
const VENDOR_ID_WEIGHT: f64 = 0.3;
const VENDOR_ID_EXACT_FLOOR: f64 = 0.9;
const NAME_EXACT_THRESHOLD: f64 = 0.9;
const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// How a supplier candidate was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierMatchType {
    /// Vendor ID matched exactly after normalization.
    VendorIdExact,
    /// Name similarity exceeded [`NAME_EXACT_THRESHOLD`] (vendor ID did not match exactly).
    NameExact,
    /// Combined score exceeded [`FUZZY_MATCH_THRESHOLD`] but neither exact condition held.
    FuzzyMatch,
    /// Combined score did not clear the fuzzy-match threshold.
    None,
}

/// A supplier candidate under consideration: display name and vendor ID.
#[derive(Debug, Clone, Copy)]
pub struct SupplierCandidate<'a> {
    /// Supplier's name on file.
    pub name: &'a str,
    /// Supplier's vendor ID on file.
    pub vendor_id: &'a str,
}

/// Outcome of a best-supplier-match search against a single candidate.
#[derive(Debug, Clone, Serialize)]
pub struct SupplierMatchReport {
    /// Combined confidence: `0.7 * name_similarity + 0.3 * vendor_id_exact`,
    /// floored at `0.9` when the vendor ID matched exactly.
    pub confidence: f64,
    /// Raw name similarity component.
    pub name_similarity: f64,
    /// `1.0` if vendor IDs matched exactly after normalization, else `0.0`.
    pub vendor_id_exact: f64,
    /// Classification of the match.
    pub match_type: SupplierMatchType,
}

impl SupplierMatchReport {
    /// Whether this report clears `min_confidence`.
    #[must_use]
    pub fn is_match(&self, min_confidence: f64) -> bool {
        self.confidence >= min_confidence
    }
}

/// Score `invoice_name`/`invoice_vendor_id` against a single supplier
/// candidate.
///
/// # Examples
///
/// ```
/// use invoicex_match::{score_supplier_match, SupplierCandidate, SupplierMatchType};
///
/// let candidate = SupplierCandidate { name: "Acme Corp", vendor_id: "V-100" };
/// let report = score_supplier_match("Acme Corp", "V-100", &candidate);
/// assert_eq!(report.match_type, SupplierMatchType::VendorIdExact);
/// assert!(report.confidence >= 0.9);
/// ```
#[must_use]
pub fn score_supplier_match(
    invoice_name: &str,
    invoice_vendor_id: &str,
    candidate: &SupplierCandidate<'_>,
) -> SupplierMatchReport {
    let name_similarity = similarity_ratio(
        &normalize_for_fuzzy(invoice_name),
        &normalize_for_fuzzy(candidate.name),
    );
    let vendor_id_exact =
        if normalize_for_fuzzy(invoice_vendor_id) == normalize_for_fuzzy(candidate.vendor_id)
            && !invoice_vendor_id.trim().is_empty()
        {
            1.0
        } else {
            0.0
        };

    let mut confidence = NAME_WEIGHT * name_similarity + VENDOR_ID_WEIGHT * vendor_id_exact;
    if vendor_id_exact == 1.0 {
        confidence = confidence.max(VENDOR_ID_EXACT_FLOOR);
    }

    let match_type = if vendor_id_exact == 1.0 {
        SupplierMatchType::VendorIdExact
    } else if name_similarity > NAME_EXACT_THRESHOLD {
        SupplierMatchType::NameExact
    } else if confidence > FUZZY_MATCH_THRESHOLD {
        SupplierMatchType::FuzzyMatch
    } else {
        SupplierMatchType::None
    };

    SupplierMatchReport {
        confidence,
        name_similarity,
        vendor_id_exact,
        match_type,
    }
}

/// Find the best-scoring supplier candidate for an invoice.
///
/// Returns `None` if `candidates` is empty; otherwise always returns
/// the highest-scoring candidate's report together with its index —
/// callers check [`SupplierMatchReport::is_match`] against their own
/// `min_confidence` (default [`DEFAULT_MIN_SUPPLIER_CONFIDENCE`]) to
/// decide whether the match is usable.
#[must_use]
pub fn find_best_supplier_match(
    invoice_name: &str,
    invoice_vendor_id: &str,
    candidates: &[SupplierCandidate<'_>],
) -> Option<(usize, SupplierMatchReport)> {
    candidates
        .iter()
        .map(|c| score_supplier_match(invoice_name, invoice_vendor_id, c))
        .enumerate()
        .fold(None, |best, (idx, report)| match &best {
            Some((_, best_report)) if best_report.confidence >= report.confidence => best,
            _ => Some((idx, report)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_vendor_id_floors_at_point_nine() {
        let candidate = SupplierCandidate {
            name: "Totally Different Name",
            vendor_id: "V-100",
        };
        let report = score_supplier_match("Acme Corp", "V-100", &candidate);
        assert_eq!(report.match_type, SupplierMatchType::VendorIdExact);
        assert!(report.confidence >= 0.9);
    }

    #[test]
    fn exact_name_without_vendor_id_is_name_exact() {
        let candidate = SupplierCandidate {
            name: "Acme Corp",
            vendor_id: "V-999",
        };
        let report = score_supplier_match("Acme Corp", "V-100", &candidate);
        assert_eq!(report.match_type, SupplierMatchType::NameExact);
    }

    #[test]
    fn unrelated_values_are_none() {
        let candidate = SupplierCandidate {
            name: "Zephyr Holdings",
            vendor_id: "V-999",
        };
        let report = score_supplier_match("Acme Corp", "V-100", &candidate);
        assert_eq!(report.match_type, SupplierMatchType::None);
        assert!(!report.is_match(DEFAULT_MIN_SUPPLIER_CONFIDENCE));
    }

    #[test]
    fn empty_vendor_ids_never_count_as_exact_match() {
        let candidate = SupplierCandidate {
            name: "Unrelated",
            vendor_id: "",
        };
        let report = score_supplier_match("Acme Corp", "", &candidate);
        assert_eq!(report.vendor_id_exact, 0.0);
    }

    #[test]
    fn best_supplier_match_picks_highest_scoring_candidate() {
        let candidates = [
            SupplierCandidate {
                name: "Zephyr Holdings",
                vendor_id: "V-999",
            },
            SupplierCandidate {
                name: "Acme Corp",
                vendor_id: "V-100",
            },
        ];
        let (idx, report) = find_best_supplier_match("Acme Corp", "V-100", &candidates).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(report.match_type, SupplierMatchType::VendorIdExact);
    }

    #[test]
    fn no_candidates_returns_none() {
        assert!(find_best_supplier_match("Acme Corp", "V-100", &[]).is_none());
    }
}
