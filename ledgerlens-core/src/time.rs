//! Calendar helpers: timezone-aware "today", period defaults and the
//! display formats used across the analytics views.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Resolve the current calendar date in an IANA tz like "America/Sao_Paulo".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

/// First day of `today`'s month through `today`.
pub fn default_period(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    (start, today)
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// `DD/MM/YYYY`
pub fn format_dmy(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{}", date.day(), date.month(), date.year())
}

/// `MM/YYYY` bucket key for monthly views.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:02}/{}", date.month(), date.year())
}

/// Build `day/month/year`, letting a day past the end of the month spill into
/// the following month (29/02 on a non-leap year lands on 01/03).
pub fn overflowing_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if day == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::days(i64::from(day) - 1))
}
