// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzzy string similarity and weighted composite match scoring for
//! invoice-to-PO and invoice-to-supplier resolution.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod po_match;
mod similarity;
mod supplier_match;

pub use po_match::{find_best_po_match, PoMatchReport, DEFAULT_MIN_PO_CONFIDENCE};
pub use similarity::{normalize_for_fuzzy, similarity_ratio};
pub use supplier_match::{
    find_best_supplier_match, score_supplier_match, SupplierCandidate, SupplierMatchReport,
    SupplierMatchType, DEFAULT_MIN_SUPPLIER_CONFIDENCE,
};
