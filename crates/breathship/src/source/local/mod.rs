//! Local persisted store.
//!
//! An embedded `SQLite` database used as a key/value store: each entity kind
//! is one JSON array under its storage key (`breathship_content`, ...). A
//! key that has never been written is seeded with the built-in defaults on
//! first access, so a fresh store already serves the full site.

pub mod migrations;
pub mod schema;

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use tracing::{debug, info};

use super::DataSource;
use crate::defaults;
use crate::error::{Error, Result};
use crate::model::{merge_record, record_id, Entity, EntityKind, Record};

/// Key/value store holding one JSON collection per entity kind.
#[derive(Debug)]
pub struct LocalStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening local store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::StoreOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Local store opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StoreOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite a whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn replace(&self, kind: EntityKind, records: &[Record]) -> Result<()> {
        let conn = self.lock()?;
        save(&conn, kind, records)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("local store lock poisoned"))
    }
}

/// Read a collection, seeding it with defaults when the key is absent.
fn load(conn: &Connection, kind: EntityKind) -> Result<Vec<Record>> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM collections WHERE key = ?1",
            [kind.storage_key()],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => {
            let records = default_records(kind)?;
            save(conn, kind, &records)?;
            info!("Seeded {} with {} default rows", kind.storage_key(), records.len());
            Ok(records)
        }
    }
}

fn save(conn: &Connection, kind: EntityKind, records: &[Record]) -> Result<()> {
    let json = serde_json::to_string(records)?;
    conn.execute(
        r"
        INSERT INTO collections (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        ",
        (kind.storage_key(), json),
    )?;
    debug!("Saved {} rows under {}", records.len(), kind.storage_key());
    Ok(())
}

fn default_records(kind: EntityKind) -> Result<Vec<Record>> {
    fn to_records<E: Entity>(items: &[E]) -> Result<Vec<Record>> {
        items.iter().map(Entity::to_record).collect()
    }

    match kind {
        EntityKind::Content => to_records(&defaults::content_fields()),
        EntityKind::Sessions => to_records(&defaults::sessions()),
        EntityKind::Blogs => to_records(&defaults::blogs()),
        EntityKind::Testimonials => to_records(&defaults::testimonials()),
    }
}

fn text(record: &Record, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn number(record: &Record, key: &str) -> i64 {
    match record.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn canonical_order(kind: EntityKind, a: &Record, b: &Record) -> Ordering {
    match kind {
        EntityKind::Content => text(a, "section")
            .cmp(&text(b, "section"))
            .then_with(|| number(a, "display_order").cmp(&number(b, "display_order"))),
        EntityKind::Sessions => text(a, "date")
            .cmp(&text(b, "date"))
            .then_with(|| text(a, "time").cmp(&text(b, "time"))),
        EntityKind::Blogs | EntityKind::Testimonials => {
            text(b, "created_at").cmp(&text(a, "created_at"))
        }
    }
}

fn next_id(records: &[Record]) -> i64 {
    records
        .iter()
        .filter_map(|r| record_id(r)?.parse::<i64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

fn position(records: &[Record], id: &str) -> Option<usize> {
    records
        .iter()
        .position(|r| record_id(r).as_deref() == Some(id))
}

#[async_trait]
impl DataSource for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
        let conn = self.lock()?;
        let mut records = load(&conn, kind)?;
        records.sort_by(|a, b| canonical_order(kind, a, b));
        Ok(records)
    }

    async fn get(&self, kind: EntityKind, id: &str) -> Result<Record> {
        let conn = self.lock()?;
        let records = load(&conn, kind)?;
        position(&records, id)
            .map(|i| records[i].clone())
            .ok_or_else(|| Error::not_found(kind, id))
    }

    async fn create(&self, kind: EntityKind, mut record: Record) -> Result<Record> {
        let conn = self.lock()?;
        let mut records = load(&conn, kind)?;

        let id = next_id(&records);
        record.insert("id".to_string(), Value::String(id.to_string()));
        record
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        records.push(record.clone());
        save(&conn, kind, &records)?;
        debug!("Created {} record {}", kind, id);
        Ok(record)
    }

    async fn update(&self, kind: EntityKind, id: &str, mut patch: Record) -> Result<Record> {
        let conn = self.lock()?;
        let mut records = load(&conn, kind)?;
        let index = position(&records, id).ok_or_else(|| Error::not_found(kind, id))?;

        patch.remove("id");
        let row = &mut records[index];
        merge_record(row, &patch);
        row.insert(
            "updated_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        let updated = row.clone();

        save(&conn, kind, &records)?;
        debug!("Updated {} record {}", kind, id);
        Ok(updated)
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()> {
        let conn = self.lock()?;
        let mut records = load(&conn, kind)?;
        let index = position(&records, id).ok_or_else(|| Error::not_found(kind, id))?;

        records.remove(index);
        save(&conn, kind, &records)?;
        debug!("Deleted {} record {}", kind, id);
        Ok(())
    }
}
