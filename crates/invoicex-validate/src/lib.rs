// SPDX-License-Identifier: MIT OR Apache-2.0
//! The five core validators (spec.md §4.5.1–§4.5.5), two supplemental
//! validators (currency, payment terms), and the validation runner
//! that orchestrates all seven plus the dependency check (spec.md
//! §4.6).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod billing;
mod currency;
mod dates;
mod duplicate;
mod line_items;
mod payment_terms;
mod runner;
mod supplier;

pub use billing::validate_billing;
pub use currency::validate_currency;
pub use dates::validate_dates;
pub use duplicate::check_for_duplicates;
pub use line_items::validate_line_items;
pub use payment_terms::validate_payment_terms;
pub use runner::{run_validations, ValidationRun};
pub use supplier::validate_supplier;

/// Round to 2 decimal places, matching the source tooling's
/// `round(x, 2)` everywhere a validator reports a derived amount.
#[must_use]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
