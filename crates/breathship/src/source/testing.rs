//! Data source doubles for unit tests.

use async_trait::async_trait;

use super::DataSource;
use crate::error::{Error, Result};
use crate::model::{EntityKind, Record};

/// Every operation fails with HTTP 500.
#[derive(Debug, Default)]
pub struct FailingSource;

impl FailingSource {
    fn error(kind: EntityKind) -> Error {
        Error::HttpStatus {
            url: format!("http://test/{kind}"),
            status: 500,
            body: "boom".to_string(),
        }
    }
}

#[async_trait]
impl DataSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
        Err(Self::error(kind))
    }

    async fn get(&self, kind: EntityKind, _id: &str) -> Result<Record> {
        Err(Self::error(kind))
    }

    async fn create(&self, kind: EntityKind, _record: Record) -> Result<Record> {
        Err(Self::error(kind))
    }

    async fn update(&self, kind: EntityKind, _id: &str, _patch: Record) -> Result<Record> {
        Err(Self::error(kind))
    }

    async fn delete(&self, kind: EntityKind, _id: &str) -> Result<()> {
        Err(Self::error(kind))
    }
}

/// Reads succeed with no rows; writes report the row missing.
#[derive(Debug, Default)]
pub struct EmptySource;

#[async_trait]
impl DataSource for EmptySource {
    fn name(&self) -> &'static str {
        "empty"
    }

    async fn list(&self, _kind: EntityKind) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }

    async fn get(&self, kind: EntityKind, id: &str) -> Result<Record> {
        Err(Error::not_found(kind, id))
    }

    async fn create(&self, _kind: EntityKind, record: Record) -> Result<Record> {
        Ok(record)
    }

    async fn update(&self, kind: EntityKind, id: &str, _patch: Record) -> Result<Record> {
        Err(Error::not_found(kind, id))
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()> {
        Err(Error::not_found(kind, id))
    }
}
