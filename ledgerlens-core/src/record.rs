//! Typed records produced from the raw spreadsheet rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One validated line of the purchase ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    /// Trimmed display name; doubles as the customer identity.
    pub customer_name: String,
    /// Sales channel label (Balcao, Delivery, ...)
    pub channel: String,
    pub date: NaiveDate,
    /// Purchase total
    pub amount: Decimal,
}

impl PurchaseRecord {
    pub fn new(
        customer_name: impl Into<String>,
        channel: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            channel: channel.into(),
            date,
            amount,
        }
    }
}

/// A birthday registry row after boundary parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BirthdayRow {
    pub name: String,
    /// 1..=31
    pub day: u32,
    /// 1..=12
    pub month: u32,
}

impl BirthdayRow {
    pub fn new(name: impl Into<String>, day: u32, month: u32) -> Self {
        Self {
            name: name.into(),
            day,
            month,
        }
    }
}
