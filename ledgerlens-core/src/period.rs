//! Period filter: narrows the purchase history to an inclusive date range.

use chrono::NaiveDate;

use crate::record::PurchaseRecord;

/// Keep records dated within `[start, end]`, both bounds inclusive.
///
/// An inverted range (`start > end`) selects nothing.
pub fn filter_by_period(
    records: &[PurchaseRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<PurchaseRecord> {
    records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .cloned()
        .collect()
}
