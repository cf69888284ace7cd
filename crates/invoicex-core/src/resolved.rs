// SPDX-License-Identifier: MIT OR Apache-2.0
//! The Resolver's output (spec.md §3, §4.4).

use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::invoice::Invoice;
use crate::po::PoItem;

/// The Resolver's sole output type: a value record owning its three
/// optional members plus the match diagnostics that produced them.
/// Downstream code only ever borrows a `&ResolvedTriple` — nothing
/// downstream constructs or mutates one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedTriple {
    /// The invoice document, if the requested filename resolved to one.
    pub invoice: Option<Invoice>,
    /// The best-matching PO item, if any cleared the confidence floor.
    pub po_item: Option<PoItem>,
    /// The contract governing `po_item`, if its `contract_id` resolved.
    pub contract: Option<Contract>,
    /// Match-confidence diagnostics for the PO and supplier lookups.
    pub matching_details: MatchingDetails,
}

impl ResolvedTriple {
    /// Whether every member of the triple resolved. The validation
    /// runner short-circuits to a `dependency_check` failure unless
    /// this holds (spec.md §4.6).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.invoice.is_some() && self.po_item.is_some() && self.contract.is_some()
    }

    /// Which member is missing, in dependency-check priority order
    /// (invoice, then po_item, then contract) — the runner emits only
    /// the first.
    #[must_use]
    pub fn first_missing(&self) -> Option<MissingMember> {
        if self.invoice.is_none() {
            Some(MissingMember::Invoice)
        } else if self.po_item.is_none() {
            Some(MissingMember::PoItem)
        } else if self.contract.is_none() {
            Some(MissingMember::Contract)
        } else {
            None
        }
    }
}

/// Which member of a [`ResolvedTriple`] failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMember {
    /// The invoice document itself was not found.
    Invoice,
    /// No PO item cleared the best-PO-match confidence floor.
    PoItem,
    /// The PO's `contract_id` did not resolve to a contract document.
    Contract,
}

impl MissingMember {
    /// The exception kind string the dependency-check emits for this member.
    #[must_use]
    pub fn exception_kind(self) -> &'static str {
        match self {
            Self::Invoice => "invoice_not_found",
            Self::PoItem => "po_item_not_found",
            Self::Contract => "contract_not_found",
        }
    }
}

/// Confidence diagnostics produced alongside a [`ResolvedTriple`].
///
/// `overall_confidence = 0.6 * po_confidence + 0.4 * supplier_confidence`
/// (spec.md §4.4, GLOSSARY "Overall confidence").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MatchingDetails {
    /// Confidence of the best-PO-match, `0.0` if no PO matched.
    pub po_confidence: f64,
    /// Confidence of the best-supplier-match, `0.0` if no supplier matched.
    pub supplier_confidence: f64,
}

impl MatchingDetails {
    const PO_WEIGHT: f64 = 0.6;
    const SUPPLIER_WEIGHT: f64 = 0.4;

    /// Build from the two component confidences, computing the weighted overall score.
    #[must_use]
    pub fn new(po_confidence: f64, supplier_confidence: f64) -> Self {
        Self {
            po_confidence,
            supplier_confidence,
        }
    }

    /// The weighted composite confidence driving triage's high-value /
    /// low-confidence branches.
    #[must_use]
    pub fn overall_confidence(&self) -> f64 {
        Self::PO_WEIGHT * self.po_confidence + Self::SUPPLIER_WEIGHT * self.supplier_confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_confidence_is_weighted_composite() {
        let details = MatchingDetails::new(1.0, 0.5);
        assert!((details.overall_confidence() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn incomplete_triple_reports_first_missing_in_order() {
        let triple = ResolvedTriple::default();
        assert_eq!(triple.first_missing(), Some(MissingMember::Invoice));
    }

    #[test]
    fn complete_triple_has_no_missing_member() {
        let mut triple = ResolvedTriple::default();
        triple.invoice = None;
        assert!(!triple.is_complete());
    }
}
