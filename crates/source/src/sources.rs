use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use platey_core::RawRow;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("source `{source_id}` is unavailable: {reason}")]
    Unavailable { source_id: String, reason: String },
}

impl SourceError {
    pub fn unavailable(source_id: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable { source_id: source_id.to_owned(), reason: reason.into() }
    }
}

/// Capability that yields the raw rows behind one catalog. Row order is
/// the source's order and is preserved all the way to the user.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Stable identifier used in logs and error reports.
    fn id(&self) -> &str;

    async fn fetch_rows(&self) -> Result<Vec<RawRow>, SourceError>;
}

/// Flat file with one plate per non-blank line — the legacy inventory
/// format. Region, price and comment are empty.
pub struct PlainTextSource {
    id: String,
    path: PathBuf,
}

impl PlainTextSource {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { id: id.into(), path: path.into() }
    }
}

#[async_trait]
impl RecordSource for PlainTextSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| SourceError::unavailable(&self.id, err.to_string()))?;

        Ok(body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(RawRow::plate_only)
            .collect())
    }
}

/// Delimited rows in `plate<sep>region<sep>price<sep>comment` order.
/// Missing trailing fields are allowed.
pub struct DelimitedFileSource {
    id: String,
    path: PathBuf,
    delimiter: char,
}

impl DelimitedFileSource {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, delimiter: char) -> Self {
        Self { id: id.into(), path: path.into(), delimiter }
    }
}

#[async_trait]
impl RecordSource for DelimitedFileSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| SourceError::unavailable(&self.id, err.to_string()))?;

        Ok(parse_delimited(&body, self.delimiter))
    }
}

/// Published-CSV sheet export fetched over HTTP. The whole export is
/// re-fetched on every load; there is no caching layer by design.
pub struct SheetCsvSource {
    id: String,
    url: String,
    timeout: Duration,
}

impl SheetCsvSource {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self { id: id.into(), url: url.into(), timeout: DEFAULT_FETCH_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl RecordSource for SheetCsvSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| SourceError::unavailable(&self.id, err.to_string()))?;

        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| SourceError::unavailable(&self.id, err.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::unavailable(
                &self.id,
                format!("unexpected status {}", response.status()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|err| SourceError::unavailable(&self.id, err.to_string()))?;

        Ok(parse_delimited(&body, ','))
    }
}

fn parse_delimited(body: &str, delimiter: char) -> Vec<RawRow> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| split_row(line, delimiter))
        .collect()
}

/// Fixed four-column split. Surrounding quotes (as sheet exports emit
/// them) are stripped; anything past the fourth field folds into the
/// comment.
fn split_row(line: &str, delimiter: char) -> RawRow {
    let mut fields = line.splitn(4, delimiter).map(clean_cell);

    RawRow {
        plate: fields.next().unwrap_or_default(),
        region: fields.next().unwrap_or_default(),
        price: fields.next().unwrap_or_default(),
        comment: fields.next().unwrap_or_default(),
    }
}

fn clean_cell(field: &str) -> String {
    field.trim().trim_matches('"').trim().to_owned()
}
