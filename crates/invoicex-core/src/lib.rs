// SPDX-License-Identifier: MIT OR Apache-2.0
//! Data model shared by every crate in the invoicex workspace: the
//! three source entities (`Invoice`, `PoItem`, `Contract`), the
//! resolver's output, typed validation exceptions, and the two durable
//! record types triage writes.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod contract;
mod exception;
mod invoice;
mod po;
mod records;
mod resolved;

pub use contract::{ClientInfo, Contract, ContractMetadata, Parties};
pub use exception::{Severity, StructuredException, ToolStatus, ValidationResult};
pub use invoice::{BillToInfo, Invoice, InvoiceSummary, LineItem, SupplierInfo};
pub use po::PoItem;
pub use records::{Disposition, ExceptionRecord, Priority, ProcessedInvoiceRecord, Queue};
pub use resolved::{MatchingDetails, MissingMember, ResolvedTriple};
