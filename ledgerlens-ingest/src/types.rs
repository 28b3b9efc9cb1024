/// One spreadsheet row as fetched: positional string cells, possibly ragged.
pub type RawRow = Vec<String>;

/// Cell `idx` of a raw row, trimmed; absent cells read as empty.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}
