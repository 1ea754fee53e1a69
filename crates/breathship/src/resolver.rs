//! Content resolution.
//!
//! The resolver turns the content table into the flat `field_name → value`
//! map pages read from. Reads never fail: when the backend cannot be read,
//! or has no active field, the built-in table is served instead and the
//! failure is kept in [`ContentView::error`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::{debug, error, info, warn};

use crate::defaults;
use crate::error::{Error, Result};
use crate::events::{RefreshBus, RefreshEvent};
use crate::model::content::{flatten, sort_fields};
use crate::model::{record_id, ContentField, ContentMap, Entity, EntityKind, Record};
use crate::source::DataSource;

/// File name used when exporting without an explicit path.
pub const DEFAULT_EXPORT_FILE: &str = "breathship-content.json";

/// What a page sees: the map plus loading and error state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentView {
    /// Resolved content.
    pub content: ContentMap,
    /// True while a resolution is in flight.
    pub loading: bool,
    /// Why the backend could not be read, if it could not.
    pub error: Option<String>,
}

/// Result of a single field edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Whether the backend accepted the write.
    pub success: bool,
    /// Failure description.
    pub message: Option<String>,
}

impl UpdateOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Counts from replaying a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Items written to the backend.
    pub applied: usize,
    /// Items without a value, without an address, or whose write failed.
    pub skipped: usize,
}

/// Resolves, edits and snapshots site content.
#[derive(Debug)]
pub struct ContentResolver {
    source: Arc<dyn DataSource>,
    bus: RefreshBus,
    refreshes: broadcast::Receiver<RefreshEvent>,
    view: ContentView,
}

impl ContentResolver {
    /// Create a resolver subscribed to `bus`. Nothing is fetched until
    /// [`resolve`](Self::resolve) is called.
    #[must_use]
    pub fn new(source: Arc<dyn DataSource>, bus: RefreshBus) -> Self {
        let refreshes = bus.subscribe();
        Self {
            source,
            bus,
            refreshes,
            view: ContentView {
                loading: true,
                ..ContentView::default()
            },
        }
    }

    /// Current view.
    #[must_use]
    pub fn view(&self) -> &ContentView {
        &self.view
    }

    /// Current content map.
    #[must_use]
    pub fn content(&self) -> &ContentMap {
        &self.view.content
    }

    /// Fetch the content table and rebuild the map.
    pub async fn resolve(&mut self) -> &ContentView {
        self.view.loading = true;

        match self.fetch().await {
            Ok(content) if !content.is_empty() => {
                debug!("Resolved {} content fields", content.len());
                self.view.content = content;
                self.view.error = None;
            }
            Ok(_) => {
                warn!(
                    "No active content in the {} backend, serving defaults",
                    self.source.name()
                );
                self.view.content = defaults::content_map();
                self.view.error = None;
            }
            Err(e) => {
                warn!("Failed to resolve content, serving defaults: {e}");
                self.view.content = defaults::content_map();
                self.view.error = Some(e.to_string());
            }
        }

        self.view.loading = false;
        &self.view
    }

    async fn fetch(&self) -> Result<ContentMap> {
        let fields = self.fetch_fields().await?;
        Ok(flatten(&fields))
    }

    async fn fetch_fields(&self) -> Result<Vec<ContentField>> {
        let rows = self.source.list(EntityKind::Content).await?;
        let fields = rows
            .into_iter()
            .filter_map(|row| match ContentField::from_record(row) {
                Ok(field) => Some(field),
                Err(e) => {
                    warn!("Skipping content row: {e}");
                    None
                }
            })
            .collect();
        Ok(fields)
    }

    /// Value of `key`: resolved content first, then the built-in table,
    /// then the empty string.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.view
            .content
            .get(key)
            .map(String::as_str)
            .or_else(|| defaults::content_value(key))
            .unwrap_or_default()
            .to_string()
    }

    /// Every content row, active or not, sorted for the admin table.
    /// Falls back to the built-in rows when the backend cannot be read.
    pub async fn all_fields(&self) -> Vec<ContentField> {
        match self.fetch_fields().await {
            Ok(mut fields) => {
                sort_fields(&mut fields);
                fields
            }
            Err(e) => {
                warn!("Failed to list content fields, serving defaults: {e}");
                defaults::content_fields()
            }
        }
    }

    /// BLAKE3 hash of the resolved map. Equal maps hash equal.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(&self.view.content).unwrap_or_default();
        blake3::hash(&canonical).to_hex().to_string()
    }

    /// Write a new value for `field_name` and tell every other resolver.
    ///
    /// Failures are reported in the outcome, never as an error.
    pub async fn update(&mut self, field_name: &str, value: &str) -> UpdateOutcome {
        match self.write_by_name(field_name, value).await {
            Ok(()) => {
                self.apply_local(field_name, value);
                info!("Updated content field {field_name}");
                UpdateOutcome::ok()
            }
            Err(e) => {
                error!("Failed to update content field {field_name}: {e}");
                UpdateOutcome::failed(e.to_string())
            }
        }
    }

    fn apply_local(&mut self, field_name: &str, value: &str) {
        self.view
            .content
            .insert(field_name.to_string(), value.to_string());
        self.bus.publish(RefreshEvent::ContentUpdated {
            field: field_name.to_string(),
            value: value.to_string(),
        });
    }

    async fn write_by_name(&self, field_name: &str, value: &str) -> Result<()> {
        let rows = self.source.list(EntityKind::Content).await?;
        let row = rows
            .iter()
            .find(|row| row.get("field_name").and_then(Value::as_str) == Some(field_name))
            .ok_or_else(|| Error::FieldNotFound(field_name.to_string()))?;
        let id = record_id(row).ok_or_else(|| {
            Error::invalid_record(
                EntityKind::Content,
                format!("field '{field_name}' has no id"),
            )
        })?;
        self.write_by_id(&id, value).await.map(|_| ())
    }

    async fn write_by_id(&self, id: &str, value: &str) -> Result<Record> {
        let mut patch = Record::new();
        patch.insert("field_value".to_string(), Value::String(value.to_string()));
        self.source.update(EntityKind::Content, id, patch).await
    }

    /// Pretty JSON array of every content row as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub async fn export_snapshot(&self) -> Result<String> {
        let rows = self.source.list(EntityKind::Content).await?;
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    /// Write the snapshot to `path`, or to [`DEFAULT_EXPORT_FILE`] in the
    /// current directory. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the file cannot be written.
    pub async fn export_to(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE), Path::to_path_buf);
        let snapshot = self.export_snapshot().await?;
        tokio::fs::write(&path, snapshot).await?;
        info!("Exported content to {}", path.display());
        Ok(path)
    }

    /// Replay a snapshot produced by [`export_snapshot`](Self::export_snapshot).
    ///
    /// An item lands on the row carrying its `field_name`; its `id` only
    /// picks between rows of that name, so snapshots from a backend with
    /// different numbering still hit the right fields. Items without a
    /// `field_name` are written by `id`. The map is resolved again
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImportFormat`] if `json` is not a JSON array, or the
    /// backend error if the content table cannot be read.
    pub async fn import_snapshot(&mut self, json: &str) -> Result<ImportReport> {
        let items: Vec<Value> =
            serde_json::from_str(json).map_err(|e| Error::ImportFormat(e.to_string()))?;
        let rows = self.source.list(EntityKind::Content).await?;

        let mut report = ImportReport::default();
        for item in &items {
            let Some(row) = item.as_object() else {
                report.skipped += 1;
                continue;
            };
            let Some(value) = row.get("field_value").and_then(Value::as_str) else {
                report.skipped += 1;
                continue;
            };
            let id = record_id(row);
            let name = row.get("field_name").and_then(Value::as_str);
            if id.is_none() && name.is_none() {
                report.skipped += 1;
                continue;
            }

            let written = match import_target(&rows, id.as_deref(), name) {
                Some(target) => self.write_by_id(&target, value).await.map(|_| ()),
                None => Err(Error::FieldNotFound(name.unwrap_or_default().to_string())),
            };

            match written {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    warn!("Skipping imported field {}: {e}", name.unwrap_or("?"));
                    report.skipped += 1;
                }
            }
        }

        if report.applied > 0 {
            self.bus.publish(RefreshEvent::ContentReplaced);
        }
        info!(
            "Imported {} content fields ({} skipped)",
            report.applied, report.skipped
        );
        self.resolve().await;
        Ok(report)
    }

    /// Re-resolve once if any refresh signal arrived since the last call.
    /// Returns whether a refresh happened.
    pub async fn apply_pending_refreshes(&mut self) -> bool {
        let mut pending = false;
        loop {
            match self.refreshes.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => pending = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if pending {
            self.resolve().await;
        }
        pending
    }

    /// Wait for the next refresh signal, then re-resolve. Returns `false`
    /// if the bus closed.
    pub async fn wait_for_refresh(&mut self) -> bool {
        match self.refreshes.recv().await {
            Ok(_) | Err(RecvError::Lagged(_)) => {
                self.resolve().await;
                true
            }
            Err(RecvError::Closed) => false,
        }
    }
}

/// Id of the row an imported item should be written to.
fn import_target(rows: &[Record], id: Option<&str>, name: Option<&str>) -> Option<String> {
    let Some(name) = name else {
        return id.map(str::to_string);
    };
    let named: Vec<&Record> = rows
        .iter()
        .filter(|row| row.get("field_name").and_then(Value::as_str) == Some(name))
        .collect();
    named
        .iter()
        .find(|row| id.is_some() && record_id(row).as_deref() == id)
        .or_else(|| named.first())
        .and_then(|row| record_id(row))
}
