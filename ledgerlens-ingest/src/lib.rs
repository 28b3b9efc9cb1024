//! ledgerlens-ingest: cell primitives and row parsers for the exported sheets.

pub mod cells;
pub mod parsers;
pub mod types;

pub use cells::{is_date_like_cell, parse_currency, parse_date_cell};
pub use parsers::birthdays::{month_from_name, parse_birthday_rows};
pub use parsers::purchases::{normalize_purchase_row, normalize_purchase_rows};
pub use types::RawRow;
