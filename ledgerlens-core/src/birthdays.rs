//! Upcoming-birthday reminders from the birthday registry.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::record::BirthdayRow;
use crate::time::{days_between, overflowing_date};

/// Birthdays further out than this many days are left out.
pub const BIRTHDAY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayEntry {
    pub name: String,
    pub day: u32,
    pub month: u32,
    /// `DD/MM`
    pub date_label: String,
    pub days_until: i64,
    pub is_today: bool,
    pub is_upcoming: bool,
}

/// Next anniversary of `day/month` on or after `today`.
pub fn next_anniversary(day: u32, month: u32, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = overflowing_date(today.year(), month, day)?;
    if this_year < today {
        overflowing_date(today.year() + 1, month, day)
    } else {
        Some(this_year)
    }
}

/// Project registry rows onto the upcoming window, soonest first.
///
/// Rows are expected deduplicated already; each one yields at most one entry.
pub fn resolve_birthdays(rows: &[BirthdayRow], today: NaiveDate) -> Vec<BirthdayEntry> {
    let mut out: Vec<BirthdayEntry> = rows
        .iter()
        .filter_map(|row| {
            let next = next_anniversary(row.day, row.month, today)?;
            let days_until = days_between(today, next);
            if days_until > BIRTHDAY_WINDOW_DAYS {
                return None;
            }
            Some(BirthdayEntry {
                name: row.name.clone(),
                day: row.day,
                month: row.month,
                date_label: format!("{:02}/{:02}", row.day, row.month),
                days_until,
                is_today: days_until == 0,
                is_upcoming: days_until > 0 && days_until <= BIRTHDAY_WINDOW_DAYS,
            })
        })
        .collect();

    out.sort_by_key(|e| e.days_until);
    out
}
