//! Published spreadsheets read as CSV.
//!
//! Each entity kind lives in its own sheet, fetched through the
//! visualization export endpoint. The backend is read-only.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use super::{csv, DataSource};
use crate::config::{Config, SheetConfig};
use crate::error::{Error, Result};
use crate::model::{record_id, EntityKind, Record};

/// Cell range requested from every sheet.
const RANGE: &str = "A:Z";

/// Read-only spreadsheet backend.
#[derive(Debug, Clone)]
pub struct SheetSource {
    client: Client,
    sheets: SheetConfig,
}

impl SheetSource {
    /// Create a backend reading the given sheets.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(sheets: SheetConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            sheets,
        })
    }

    /// Create a backend from the `[sheet]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.sheet.clone())
    }

    /// CSV export URL of the sheet holding `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if no sheet is configured for `kind`.
    pub fn sheet_url(&self, kind: EntityKind) -> Result<String> {
        let sheet_id = self
            .sheets
            .sheet_id(kind)
            .ok_or_else(|| Error::config(format!("no sheet configured for {kind}")))?;
        Ok(format!(
            "{}/{}/gviz/tq?tqx=out:csv&range={RANGE}",
            self.sheets.base_url.trim_end_matches('/'),
            sheet_id
        ))
    }

    async fn fetch(&self, kind: EntityKind) -> Result<String> {
        let url = self.sheet_url(kind)?;
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Sheet request to {url} failed with {status}");
            return Err(Error::HttpStatus {
                url,
                status: status.as_u16(),
                body,
            });
        }

        // Private sheets answer with a sign-in page instead of CSV.
        if body.trim_start().starts_with('<') {
            return Err(Error::CsvFormat {
                message: format!("{url} returned HTML instead of CSV"),
            });
        }

        debug!("Fetched {} bytes of CSV for {}", body.len(), kind);
        Ok(body)
    }

    fn read_only() -> Error {
        Error::ReadOnly { backend: "sheet" }
    }
}

#[async_trait]
impl DataSource for SheetSource {
    fn name(&self) -> &'static str {
        "sheet"
    }

    async fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
        let body = self.fetch(kind).await?;
        Ok(csv::sheet_to_records(&body))
    }

    async fn get(&self, kind: EntityKind, id: &str) -> Result<Record> {
        self.list(kind)
            .await?
            .into_iter()
            .find(|record| record_id(record).as_deref() == Some(id))
            .ok_or_else(|| Error::not_found(kind, id))
    }

    async fn create(&self, _kind: EntityKind, _record: Record) -> Result<Record> {
        Err(Self::read_only())
    }

    async fn update(&self, _kind: EntityKind, _id: &str, _patch: Record) -> Result<Record> {
        Err(Self::read_only())
    }

    async fn delete(&self, _kind: EntityKind, _id: &str) -> Result<()> {
        Err(Self::read_only())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SheetSource {
        let sheets = SheetConfig {
            content_sheet: "content-id".to_string(),
            ..SheetConfig::default()
        };
        SheetSource::new(sheets).unwrap()
    }

    #[test]
    fn test_sheet_url() {
        assert_eq!(
            source().sheet_url(EntityKind::Content).unwrap(),
            "https://docs.google.com/spreadsheets/d/content-id/gviz/tq?tqx=out:csv&range=A:Z"
        );
    }

    #[test]
    fn test_unconfigured_sheet() {
        let err = source().sheet_url(EntityKind::Blogs).unwrap_err();
        assert!(err.to_string().contains("no sheet configured for blogs"));
    }

    #[tokio::test]
    async fn test_writes_are_read_only() {
        let source = source();
        let err = source
            .create(EntityKind::Content, Record::new())
            .await
            .unwrap_err();
        assert!(err.is_read_only());
        assert!(source
            .update(EntityKind::Content, "1", Record::new())
            .await
            .unwrap_err()
            .is_read_only());
        assert!(source
            .delete(EntityKind::Content, "1")
            .await
            .unwrap_err()
            .is_read_only());
    }
}
