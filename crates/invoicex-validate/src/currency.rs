// SPDX-License-Identifier: MIT OR Apache-2.0
//! Supplemental currency validation (spec.md §4.5.6).

use invoicex_core::{Contract, Invoice, StructuredException, ValidationResult};

const SUPPORTED_CURRENCIES: &[&str] = &["USD"];

/// Invoice currency must be a supported 3-letter code, and must match
/// the contract's currency (defaulting to `"USD"` when the contract
/// doesn't specify one). A missing invoice currency short-circuits to
/// a single FAIL, mirroring the source tool's immediate return.
#[must_use]
pub fn validate_currency(invoice: &Invoice, contract: &Contract) -> ValidationResult {
    let invoice_currency = invoice
        .currency
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_uppercase();

    if invoice_currency.is_empty() {
        return ValidationResult::new(
            "currency_validation",
            vec![StructuredException::MissingCurrency],
        );
    }

    let mut exceptions = Vec::new();

    if invoice_currency.len() != 3 || !invoice_currency.chars().all(|c| c.is_ascii_alphabetic()) {
        exceptions.push(StructuredException::InvalidCurrencyFormat {
            value: invoice_currency.clone(),
        });
    }

    if !SUPPORTED_CURRENCIES.contains(&invoice_currency.as_str()) {
        exceptions.push(StructuredException::UnsupportedCurrency {
            value: invoice_currency.clone(),
        });
    }

    let contract_currency = contract
        .currency
        .as_deref()
        .unwrap_or("USD")
        .trim()
        .to_uppercase();
    if contract_currency != invoice_currency {
        exceptions.push(StructuredException::CurrencyMismatch {
            invoice_value: invoice_currency,
            expected_value: contract_currency,
        });
    }

    ValidationResult::new("currency_validation", exceptions)
}
