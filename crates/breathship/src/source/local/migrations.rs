//! Schema versioning for the local store.
//!
//! Version 1 is the bare key/value layout. Version 2 rewrites stored
//! sessions that still carry the legacy `tag` column.

use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

use super::schema::SCHEMA_STATEMENTS;
use crate::error::{Error, Result};
use crate::model::{EntityKind, Record};

/// The current schema version.
pub const CURRENT_VERSION: i32 = 2;

const VERSION_KEY: &str = "schema_version";

/// Create the tables if missing and migrate up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if schema creation or migration fails, or if the store
/// was written by a newer build.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    match schema_version(conn)? {
        v if v > CURRENT_VERSION => Err(Error::StoreMigration {
            message: format!(
                "store was written by a newer version (schema {v}, supported {CURRENT_VERSION})"
            ),
        }),
        v if v < CURRENT_VERSION => migrate(conn, v),
        _ => Ok(()),
    }
}

/// Schema version recorded in the store; 0 for a fresh store.
fn schema_version(conn: &Connection) -> Result<i32> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    stored.map_or(Ok(0), |value| {
        value.parse().map_err(|_| Error::StoreMigration {
            message: format!("invalid schema version: {value}"),
        })
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Apply every step after `from`, all in one transaction.
fn migrate(conn: &Connection, from: i32) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for version in (from + 1)..=CURRENT_VERSION {
        apply(&tx, version)?;
    }
    set_schema_version(&tx, CURRENT_VERSION)?;
    tx.commit()?;

    if from > 0 {
        info!("Local store migrated from schema {from} to {CURRENT_VERSION}");
    }
    Ok(())
}

fn apply(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => Ok(()),
        2 => rename_legacy_session_tags(conn),
        _ => Err(Error::StoreMigration {
            message: format!("unknown migration version: {version}"),
        }),
    }
}

/// Move `tag` to `session_tag` on stored sessions. A `session_tag` already
/// present wins.
fn rename_legacy_session_tags(conn: &Connection) -> Result<()> {
    let key = EntityKind::Sessions.storage_key();
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM collections WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()?;
    let Some(json) = stored else {
        return Ok(());
    };

    // Unreadable collections are left alone; reads report them.
    let mut rows: Vec<Record> = match serde_json::from_str(&json) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Skipping session tag migration, {key} is not valid JSON: {e}");
            return Ok(());
        }
    };

    let mut renamed = 0;
    for row in &mut rows {
        if let Some(tag) = row.remove("tag") {
            row.entry("session_tag").or_insert(tag);
            renamed += 1;
        }
    }

    if renamed > 0 {
        conn.execute(
            "UPDATE collections SET value = ?1 WHERE key = ?2",
            (serde_json::to_string(&rows)?, key),
        )?;
        info!("Renamed the tag column on {renamed} stored sessions");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    fn stored_sessions(conn: &Connection) -> Vec<Value> {
        let json: String = conn
            .query_row(
                "SELECT value FROM collections WHERE key = ?1",
                [EntityKind::Sessions.storage_key()],
                |row| row.get(0),
            )
            .unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_fresh_store_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        assert!(table_exists(&conn, "collections"));
        assert!(table_exists(&conn, "metadata"));
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);

        initialize_schema(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_version_one_sessions_get_renamed() {
        let conn = Connection::open_in_memory().unwrap();
        for statement in SCHEMA_STATEMENTS {
            conn.execute(statement, []).unwrap();
        }
        set_schema_version(&conn, 1).unwrap();
        let legacy = json!([
            {"id": "1", "title": "Intro", "tag": "Group"},
            {"id": "2", "title": "Deep", "tag": "Old", "session_tag": "Advanced"},
            {"id": "3", "title": "Plain"}
        ]);
        conn.execute(
            "INSERT INTO collections (key, value) VALUES (?1, ?2)",
            (EntityKind::Sessions.storage_key(), legacy.to_string()),
        )
        .unwrap();

        initialize_schema(&conn).unwrap();

        let rows = stored_sessions(&conn);
        assert_eq!(rows[0]["session_tag"], "Group");
        assert!(rows[0].get("tag").is_none());
        assert_eq!(rows[1]["session_tag"], "Advanced");
        assert!(rows[2].get("session_tag").is_none());
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_corrupt_sessions_do_not_block_migration() {
        let conn = Connection::open_in_memory().unwrap();
        for statement in SCHEMA_STATEMENTS {
            conn.execute(statement, []).unwrap();
        }
        set_schema_version(&conn, 1).unwrap();
        conn.execute(
            "INSERT INTO collections (key, value) VALUES (?1, 'not json')",
            [EntityKind::Sessions.storage_key()],
        )
        .unwrap();

        initialize_schema(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_newer_store_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        set_schema_version(&conn, CURRENT_VERSION + 1).unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("newer version"));
    }

    #[test]
    fn test_invalid_version_value() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = 'abc' WHERE key = ?1",
            [VERSION_KEY],
        )
        .unwrap();

        let err = schema_version(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }

    #[test]
    fn test_unknown_step() {
        let conn = Connection::open_in_memory().unwrap();
        let err = apply(&conn, 999).unwrap_err();
        assert!(err.to_string().contains("unknown migration version"));
    }
}
