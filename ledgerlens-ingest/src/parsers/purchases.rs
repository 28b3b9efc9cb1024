//! Purchase ledger normalizer.
//!
//! The sheet mixes two row layouts. Either the date sits in column 2 and the
//! total in column 3, or the date sits in column 3 and the total in column 10:
//!
//!   Cliente        | Venda    | Data       | Total
//!   Ana Souza      | Balcao   | 02/03/2024 | R$ 120,00
//!   Bruno Lima     | Delivery |            | 05/03/2024 | ... | R$ 450,50
//!
//! Header, subtotal and walk-in rows are interleaved and must be skipped.

use ledgerlens_core::PurchaseRecord;

use crate::cells::{is_date_like_cell, parse_currency, parse_date_cell};
use crate::types::cell;

const HEADER_TOKENS: [&str; 2] = ["Cliente", "Total"];
/// Walk-in sales are booked under this pseudo-customer.
const WALK_IN_MARKER: &str = "consumidor final";

/// Column pairs `(date, total)` tried in order.
const LAYOUTS: [(usize, usize); 2] = [(2, 3), (3, 10)];

fn is_noise(name: &str) -> bool {
    name.is_empty()
        || HEADER_TOKENS.iter().any(|t| name.starts_with(t))
        || name.to_lowercase().contains(WALK_IN_MARKER)
}

/// Parse one raw row; `None` for anything that is not a customer purchase.
pub fn normalize_purchase_row(row: &[String]) -> Option<PurchaseRecord> {
    let name = cell(row, 0);
    if is_noise(name) {
        return None;
    }

    let (date_col, total_col) = LAYOUTS
        .iter()
        .copied()
        .find(|(date_col, _)| is_date_like_cell(cell(row, *date_col)))?;
    let date = parse_date_cell(cell(row, date_col))?;

    Some(PurchaseRecord::new(
        name,
        cell(row, 1),
        date,
        parse_currency(cell(row, total_col)),
    ))
}

/// Normalize the raw ledger, preserving row order and silently dropping noise.
pub fn normalize_purchase_rows(rows: &[Vec<String>]) -> Vec<PurchaseRecord> {
    let out: Vec<PurchaseRecord> = rows
        .iter()
        .filter_map(|row| normalize_purchase_row(row))
        .collect();

    log::debug!(
        "normalized {} purchase rows ({} dropped)",
        out.len(),
        rows.len() - out.len()
    );
    out
}
