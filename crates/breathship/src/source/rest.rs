//! `PostgREST`-style REST backend.
//!
//! Tables live under `{base_url}/rest/v1/{table}`. Rows are selected with
//! `id=eq.{id}` filters and writes ask for `return=representation` so the
//! stored row comes back in the response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, error};

use super::DataSource;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{EntityKind, Record};

/// HTTP client for a `PostgREST` resource store.
#[derive(Debug, Clone)]
pub struct RestSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestSource {
    /// Create a client for the project at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a client from the `[rest]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.rest.base_url.clone(),
            config.rest.api_key.clone(),
            config.rest_timeout(),
        )
    }

    /// Endpoint of one table.
    #[must_use]
    pub fn table_url(&self, kind: EntityKind) -> String {
        format!("{}/rest/v1/{}", self.base_url, kind.table())
    }

    fn request(&self, method: Method, kind: EntityKind) -> RequestBuilder {
        self.client
            .request(method, self.table_url(kind))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn send(&self, request: RequestBuilder, kind: EntityKind) -> Result<Vec<Record>> {
        let url = self.table_url(kind);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("REST request to {url} failed with {status}");
            return Err(Error::HttpStatus {
                url,
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Err(Error::EmptyResponse { url });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|source| Error::ResponseParse { url: url.clone(), source })?;
        debug!("{url} returned {status}");
        rows(value, kind)
    }

    async fn single(&self, request: RequestBuilder, kind: EntityKind, id: &str) -> Result<Record> {
        self.send(request, kind)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(kind, id))
    }
}

/// Accept either an array of rows or a single row object.
fn rows(value: Value, kind: EntityKind) -> Result<Vec<Record>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(Error::invalid_record(
                    kind,
                    format!("expected a row object, got {other}"),
                )),
            })
            .collect(),
        Value::Object(map) => Ok(vec![map]),
        other => Err(Error::invalid_record(
            kind,
            format!("expected an array of rows, got {other}"),
        )),
    }
}

#[async_trait]
impl DataSource for RestSource {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
        let request = self
            .request(Method::GET, kind)
            .query(&[("select", "*"), ("order", kind.order_clause())]);
        self.send(request, kind).await
    }

    async fn get(&self, kind: EntityKind, id: &str) -> Result<Record> {
        let filter = format!("eq.{id}");
        let request = self
            .request(Method::GET, kind)
            .query(&[("select", "*"), ("id", filter.as_str())]);
        self.single(request, kind, id).await
    }

    async fn create(&self, kind: EntityKind, record: Record) -> Result<Record> {
        let request = self
            .request(Method::POST, kind)
            .header("Prefer", "return=representation")
            .json(&record);
        self.send(request, kind)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyResponse {
                url: self.table_url(kind),
            })
    }

    async fn update(&self, kind: EntityKind, id: &str, patch: Record) -> Result<Record> {
        let filter = format!("eq.{id}");
        let request = self
            .request(Method::PATCH, kind)
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation")
            .json(&patch);
        self.single(request, kind, id).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()> {
        let filter = format!("eq.{id}");
        let request = self
            .request(Method::DELETE, kind)
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation");
        self.single(request, kind, id).await.map(|_| ())
    }
}
