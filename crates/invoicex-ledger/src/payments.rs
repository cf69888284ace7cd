// SPDX-License-Identifier: MIT OR Apache-2.0
//! The payments log: `system_logs/payments.log` (spec.md §6.3).

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use invoicex_core::Invoice;
use invoicex_error::PipelineError;

/// Render the `[INFO]` approval line plus one `payment_item:` line per
/// invoice line item, exactly as spec.md §6.3 specifies.
#[must_use]
pub fn render(invoice: &Invoice, timestamp: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[INFO] [{timestamp}] Invoice {} approved. Routing to Payment System.",
        invoice.invoice_id
    );
    for item in &invoice.line_items {
        let _ = writeln!(
            out,
            "    payment_item: invoice_id={}, po_number={}, item_id={}, description={}, amount={}",
            invoice.invoice_id,
            invoice.purchase_order_number,
            item.item_id.as_deref().unwrap_or(""),
            item.description,
            item.line_total,
        );
    }
    out
}

/// Append the rendered payment entry for `invoice` to `path`.
pub(crate) fn append(path: &Path, invoice: &Invoice, timestamp: &str) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::log_write(path, e))?;
    }
    let block = render(invoice, timestamp);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PipelineError::log_write(path, e))?;
    file.write_all(block.as_bytes())
        .map_err(|e| PipelineError::log_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicex_core::{BillToInfo, InvoiceSummary, LineItem, SupplierInfo};

    fn invoice() -> Invoice {
        Invoice {
            invoice_id: "INV-1".into(),
            purchase_order_number: "PO-1".into(),
            supplier_info: SupplierInfo {
                name: "Acme".into(),
                vendor_id: "V-1".into(),
            },
            bill_to_info: BillToInfo { name: "Client".into() },
            issue_date: "2024-06-01".into(),
            due_date: "2024-07-01".into(),
            payment_terms: "Net 30".into(),
            currency: Some("USD".into()),
            summary: InvoiceSummary {
                subtotal: 900.0,
                tax_amount: 100.0,
                billing_amount: 1000.0,
            },
            line_items: vec![LineItem {
                item_id: Some("A".into()),
                description: "Widget".into(),
                quantity: 10.0,
                unit_price: 100.0,
                line_total: 1000.0,
            }],
        }
    }

    #[test]
    fn renders_info_line_then_one_payment_item_per_line() {
        let rendered = render(&invoice(), "2024-06-01T00:00:00Z");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "[INFO] [2024-06-01T00:00:00Z] Invoice INV-1 approved. Routing to Payment System."
        );
        assert!(lines[1].starts_with("    payment_item: invoice_id=INV-1"));
    }

    #[test]
    fn append_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_logs").join("payments.log");
        append(&path, &invoice(), "2024-06-01T00:00:00Z").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("INV-1 approved"));
    }
}
