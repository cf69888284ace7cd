// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contract lookup: one document per file, matched by `contract_id`.

use std::path::PathBuf;

use invoicex_core::Contract;
use walkdir::WalkDir;

use crate::read::read_json_file;

/// The contract whose normalized `contract_id` equals
/// `normalized_contract_id`. `normalized_contract_id` must already be
/// normalized by the caller.
pub(crate) fn find_contract_by_id(
    contract_dirs: &[PathBuf],
    normalized_contract_id: &str,
) -> Option<Contract> {
    for dir in contract_dirs {
        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            if entry.path().extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(contract) = read_json_file::<Contract>(entry.path()) {
                if invoicex_normalize::normalize_token_str(&contract.contract_id)
                    == normalized_contract_id
                {
                    return Some(contract);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONTRACT_JSON: &str = r#"{
        "contract_id": "C-AEG-1",
        "parties": {"supplier": {"name": "Acme", "vendor_id": "V-1"}, "client": {"name": "Client"}},
        "contract_metadata": {"effective_date": "2024-01-01", "end_date": "2024-12-31"},
        "payment_terms": "Net 30",
        "currency": "USD",
        "sections": []
    }"#;

    #[test]
    fn finds_contract_by_normalized_id() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c.json"), CONTRACT_JSON).unwrap();
        let found = find_contract_by_id(&[dir.path().to_path_buf()], "CAEG1");
        assert!(found.is_some());
    }

    #[test]
    fn unmatched_contract_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c.json"), CONTRACT_JSON).unwrap();
        let found = find_contract_by_id(&[dir.path().to_path_buf()], "NOPE");
        assert!(found.is_none());
    }
}
