//! Data source adapters.
//!
//! Every backend exposes the same five operations over untyped
//! [`Record`]s. Exactly one backend is wired up at startup by [`connect`].

pub mod csv;
pub mod local;
pub mod rest;
pub mod sheet;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::model::{EntityKind, Record};

pub use local::LocalStore;
pub use rest::RestSource;
pub use sheet::SheetSource;

/// Uniform access to one backing store.
///
/// `list` returns rows in the kind's canonical order (see
/// [`EntityKind::order_clause`]). Operations addressing a missing row fail
/// with [`crate::Error::NotFound`].
#[async_trait]
pub trait DataSource: Send + Sync + std::fmt::Debug {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// All rows of an entity kind.
    async fn list(&self, kind: EntityKind) -> Result<Vec<Record>>;

    /// One row by id.
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Record>;

    /// Store a new row and return it as stored, id included.
    async fn create(&self, kind: EntityKind, record: Record) -> Result<Record>;

    /// Merge `patch` into the row with `id` and return the result.
    async fn update(&self, kind: EntityKind, id: &str, patch: Record) -> Result<Record>;

    /// Remove the row with `id`.
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()>;
}

/// Build the backend selected in the configuration.
///
/// # Errors
///
/// Returns an error if the backend cannot be initialized (HTTP client
/// construction or opening the local store).
pub fn connect(config: &Config) -> Result<Arc<dyn DataSource>> {
    let source: Arc<dyn DataSource> = match config.source.backend {
        Backend::Rest => Arc::new(RestSource::from_config(config)?),
        Backend::Local => Arc::new(LocalStore::open(config.database_path())?),
        Backend::Sheet => Arc::new(SheetSource::from_config(config)?),
    };
    info!("Using {} data source", source.name());
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.local.database_path = Some(dir.path().join("store.db"));

        let source = connect(&config).unwrap();
        assert_eq!(source.name(), "local");
    }

    #[test]
    fn test_connect_sheet_backend() {
        let mut config = Config::default();
        config.source.backend = Backend::Sheet;
        config.sheet.content_sheet = "abc".to_string();

        let source = connect(&config).unwrap();
        assert_eq!(source.name(), "sheet");
    }

    #[test]
    fn test_connect_rest_backend() {
        let mut config = Config::default();
        config.source.backend = Backend::Rest;
        config.rest.base_url = "https://project.example.co".to_string();
        config.rest.api_key = "key".to_string();

        let source = connect(&config).unwrap();
        assert_eq!(source.name(), "rest");
    }
}
