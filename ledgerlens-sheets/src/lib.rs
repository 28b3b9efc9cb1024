//! ledgerlens-sheets: sheet sources and the customer analytics query.

pub mod error;
pub mod orchestrator;
pub mod source;

pub use error::{AnalyticsError, FetchError};
pub use orchestrator::{build_analytics, get_customer_analytics, get_upcoming_birthdays, SourceIds};
pub use source::{read_csv_rows, CsvDirSource, GoogleSheetSource, SheetSource};
