//! Cell-level parsing primitives for the exported sheets.
//!
//! Money cells are Brazilian-real strings ("R$ 1.234,56"); date cells come as
//! `DD/MM/YYYY` (sometimes with a time), ISO dates, or the Google Sheets
//! `Date(2024,0,15)` literal with a zero-based month.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static DMY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<d>\d{1,2})/(?P<m>\d{1,2})/(?P<y>\d{2}|\d{4})",
        r"(?:[\sT]+\d{1,2}:\d{2}(?::\d{2})?)?$"
    ))
    .expect("valid regex")
});

static ISO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<y>\d{4})-(?P<m>\d{2})-(?P<d>\d{2})(?:[\sT].*)?$").expect("valid regex")
});

static GVIZ_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Date\((?P<y>\d{4}),\s*(?P<m>\d{1,2}),\s*(?P<d>\d{1,2})(?:,[\d,\s]*)?\)$")
        .expect("valid regex")
});

/// True when the cell has the shape of a date, valid or not.
pub fn is_date_like_cell(cell: &str) -> bool {
    let s = cell.trim();
    DMY_RE.is_match(s) || ISO_RE.is_match(s) || GVIZ_RE.is_match(s)
}

/// Parse a date cell. Shapes that are not calendar-valid yield `None`.
pub fn parse_date_cell(cell: &str) -> Option<NaiveDate> {
    let s = cell.trim();

    if let Some(caps) = DMY_RE.captures(s) {
        let day: u32 = caps["d"].parse().ok()?;
        let month: u32 = caps["m"].parse().ok()?;
        let y = &caps["y"];
        let mut year: i32 = y.parse().ok()?;
        if y.len() == 2 {
            year += 2000;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = ISO_RE.captures(s) {
        return NaiveDate::from_ymd_opt(
            caps["y"].parse().ok()?,
            caps["m"].parse().ok()?,
            caps["d"].parse().ok()?,
        );
    }

    if let Some(caps) = GVIZ_RE.captures(s) {
        let month0: u32 = caps["m"].parse().ok()?;
        return NaiveDate::from_ymd_opt(
            caps["y"].parse().ok()?,
            month0 + 1,
            caps["d"].parse().ok()?,
        );
    }

    None
}

/// Parse a money cell. Never fails: empty or garbage input is zero.
///
/// A comma marks the decimal separator and dots are thousands separators.
/// Without a comma, dots are still thousands separators for `R$` cells, for
/// cells with several dots, or when exactly three digits follow the last dot;
/// otherwise a lone dot is decimal ("89.9"). A minus anywhere before the first
/// digit, or surrounding parentheses, make the amount negative.
pub fn parse_currency(cell: &str) -> Decimal {
    let s = cell.trim();
    let prefix = s.split(|c: char| c.is_ascii_digit()).next().unwrap_or("");
    let negative = prefix.contains('-') || (s.starts_with('(') && s.ends_with(')'));

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if dots_are_thousands(s, &cleaned) {
        cleaned.replace('.', "")
    } else {
        cleaned
    };

    match Decimal::from_str(&normalized) {
        Ok(v) if negative => -v,
        Ok(v) => v,
        Err(_) => Decimal::ZERO,
    }
}

fn dots_are_thousands(raw: &str, cleaned: &str) -> bool {
    if raw.contains("R$") || cleaned.matches('.').count() > 1 {
        return true;
    }
    cleaned
        .rsplit_once('.')
        .is_some_and(|(_, tail)| tail.len() == 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_brl_amounts() {
        assert_eq!(parse_currency("R$ 1.234,56"), money("1234.56"));
        assert_eq!(parse_currency("R$\u{a0}5,00"), money("5"));
        assert_eq!(parse_currency("-R$ 10,90"), money("-10.90"));
        assert_eq!(parse_currency("(R$ 10,00)"), money("-10"));
        assert_eq!(parse_currency("R$ 1.000.000,00"), money("1000000"));
        assert_eq!(parse_currency("89.9"), money("89.9"));
        assert_eq!(parse_currency("150"), money("150"));
    }

    #[test]
    fn test_brl_amounts_without_cents() {
        assert_eq!(parse_currency("R$ 1.500"), money("1500"));
        assert_eq!(parse_currency("R$ 1.234.567"), money("1234567"));
        assert_eq!(parse_currency("R$ 89"), money("89"));
        assert_eq!(parse_currency("2.500"), money("2500"));
        assert_eq!(parse_currency("1.234.567"), money("1234567"));
        assert_eq!(parse_currency("12.50"), money("12.50"));
    }

    #[test]
    fn test_minus_after_currency_symbol() {
        assert_eq!(parse_currency("R$ -10,00"), money("-10"));
        assert_eq!(parse_currency("R$\u{a0}-1.500"), money("-1500"));
        // a dash after the digits is not a sign
        assert_eq!(parse_currency("R$ 10,00 -"), money("10"));
    }

    #[test]
    fn test_parse_currency_never_fails() {
        assert_eq!(parse_currency(""), Decimal::ZERO);
        assert_eq!(parse_currency("R$ -"), Decimal::ZERO);
        assert_eq!(parse_currency("n/a"), Decimal::ZERO);
    }

    #[test]
    fn test_date_like_shapes() {
        assert!(is_date_like_cell("15/03/2024"));
        assert!(is_date_like_cell(" 5/3/24 "));
        assert!(is_date_like_cell("15/03/2024 14:32:10"));
        assert!(is_date_like_cell("2024-03-15"));
        assert!(is_date_like_cell("Date(2024,2,15)"));
        assert!(!is_date_like_cell("Balcao"));
        assert!(!is_date_like_cell("R$ 15,00"));
        assert!(!is_date_like_cell(""));
    }

    #[test]
    fn test_parse_date_cell() {
        let mar15 = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date_cell("15/03/2024"), mar15);
        assert_eq!(parse_date_cell("15/3/24 09:00"), mar15);
        assert_eq!(parse_date_cell("2024-03-15"), mar15);
        assert_eq!(parse_date_cell("Date(2024,2,15)"), mar15);
        assert_eq!(parse_date_cell("Date(2024,2,15,10,30,0)"), mar15);
    }

    #[test]
    fn test_invalid_calendar_dates_are_none() {
        assert!(is_date_like_cell("31/02/2024"));
        assert_eq!(parse_date_cell("31/02/2024"), None);
        assert_eq!(parse_date_cell("Date(2024,11,32)"), None);
        assert_eq!(parse_date_cell("hoje"), None);
    }
}
