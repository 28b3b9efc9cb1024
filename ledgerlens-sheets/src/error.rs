use thiserror::Error;

/// Failure to obtain one tabular source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheet responded with status {status}")]
    Status { status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A whole analytics query failed; no partial result exists.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("failed to fetch {label} sheet ({source_id}): {error}")]
    Fetch {
        label: &'static str,
        source_id: String,
        #[source]
        error: FetchError,
    },
}
