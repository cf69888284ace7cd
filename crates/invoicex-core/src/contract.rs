// SPDX-License-Identifier: MIT OR Apache-2.0
//! The `Contract` entity (spec.md §3, §6.1).

use serde::{Deserialize, Serialize};

use crate::invoice::SupplierInfo;

/// A master agreement governing one or more [`crate::PoItem`]s, as read
/// from `json_files/contracts/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Identifier matched against [`crate::PoItem::contract_id`].
    pub contract_id: String,
    /// Supplier and client parties.
    pub parties: Parties,
    /// Validity window.
    pub contract_metadata: ContractMetadata,
    /// Governing payment terms, e.g. `"Net 30"`.
    #[serde(default)]
    pub payment_terms: Option<String>,
    /// Governing currency, e.g. `"USD"`.
    #[serde(default)]
    pub currency: Option<String>,
    /// Free-text clause sections; not otherwise interpreted by this pipeline.
    #[serde(default)]
    pub sections: Vec<String>,
}

/// The two named parties to a [`Contract`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parties {
    /// The supplier party; matched against [`crate::Invoice::supplier_info`].
    pub supplier: SupplierInfo,
    /// The client party; matched against [`crate::Invoice::bill_to_info`].
    pub client: ClientInfo,
}

/// Client (buyer) party on a [`Contract`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Display name.
    pub name: String,
}

/// Validity window and related metadata for a [`Contract`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractMetadata {
    /// `YYYY-MM-DD`; contract is not effective before this date.
    pub effective_date: String,
    /// `YYYY-MM-DD`; contract is not effective after this date.
    pub end_date: String,
}
