//! Birthday registry parser.
//!
//! Expected columns:
//!   Data de Registro | Nome | Dia | Mes (spelled out) | Ano

use ledgerlens_core::BirthdayRow;
use std::collections::HashSet;

use crate::types::cell;

const HEADER_LABELS: [&str; 2] = ["NOME", "DATA DE REGISTRO"];

/// Portuguese month name (lowercase) to 1..=12.
pub fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.trim().to_lowercase().as_str() {
        "janeiro" => 1,
        "fevereiro" => 2,
        "março" | "marco" => 3,
        "abril" => 4,
        "maio" => 5,
        "junho" => 6,
        "julho" => 7,
        "agosto" => 8,
        "setembro" => 9,
        "outubro" => 10,
        "novembro" => 11,
        "dezembro" => 12,
        _ => return None,
    };
    Some(month)
}

/// Leading integer of a day cell ("07", "7º", "12 "); zero counts as missing.
fn parse_day(s: &str) -> Option<u32> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    let day: u32 = digits.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

/// Parse registry rows into typed birthdays.
///
/// The first row seen for a name (uppercased, trimmed) claims it, even when
/// that row turns out unusable; later rows for the same name are ignored.
pub fn parse_birthday_rows(rows: &[Vec<String>]) -> Vec<BirthdayRow> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for row in rows {
        let name = cell(row, 1);
        if name.is_empty() {
            continue;
        }
        let key = name.to_uppercase();
        if HEADER_LABELS.contains(&key.as_str()) {
            continue;
        }
        if !seen.insert(key) {
            continue;
        }

        let (Some(day), Some(month)) = (parse_day(cell(row, 2)), month_from_name(cell(row, 3)))
        else {
            continue;
        };
        out.push(BirthdayRow::new(name, day, month));
    }

    log::debug!("parsed {} birthdays from {} rows", out.len(), rows.len());
    out
}
