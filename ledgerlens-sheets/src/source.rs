//! Tabular sources: a published Google Sheet (CSV export) or a local
//! directory of CSV files named after their source ids.

use async_trait::async_trait;
use std::path::PathBuf;

use ledgerlens_ingest::RawRow;

use crate::error::FetchError;

/// Fetches one tabular source by an opaque id (a sheet gid, a file stem).
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_rows(&self, source_id: &str) -> Result<Vec<RawRow>, FetchError>;
}

/// Read headerless, possibly ragged CSV into string rows.
pub fn read_csv_rows<R: std::io::Read>(reader: R) -> Result<Vec<RawRow>, FetchError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Google Sheets CSV export of one tab of a shared spreadsheet.
#[derive(Debug, Clone)]
pub struct GoogleSheetSource {
    client: reqwest::Client,
    spreadsheet_id: String,
    base_url: String,
}

impl GoogleSheetSource {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            base_url: "https://docs.google.com/spreadsheets/d".to_string(),
        }
    }

    /// Point at a different host (mirrors, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn export_url(&self, gid: &str) -> String {
        format!(
            "{}/{}/export?format=csv&gid={}",
            self.base_url, self.spreadsheet_id, gid
        )
    }
}

#[async_trait]
impl SheetSource for GoogleSheetSource {
    async fn fetch_rows(&self, source_id: &str) -> Result<Vec<RawRow>, FetchError> {
        let url = self.export_url(source_id);
        log::debug!("GET {url}");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            log::warn!("sheet gid={source_id} responded {status}");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        let rows = read_csv_rows(body.as_ref())?;
        log::debug!("sheet gid={source_id}: {} rows", rows.len());
        Ok(rows)
    }
}

/// `{dir}/{source_id}.csv` on disk.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, source_id: &str) -> PathBuf {
        self.dir.join(format!("{source_id}.csv"))
    }
}

#[async_trait]
impl SheetSource for CsvDirSource {
    async fn fetch_rows(&self, source_id: &str) -> Result<Vec<RawRow>, FetchError> {
        let path = self.path_for(source_id);
        let bytes = tokio::fs::read(&path).await?;
        let rows = read_csv_rows(bytes.as_slice())?;
        log::debug!("{}: {} rows", path.display(), rows.len());
        Ok(rows)
    }
}
