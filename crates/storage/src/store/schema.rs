#![forbid(unsafe_code)]

use super::StoreError;
use super::table::TableSpec;
use cl_core::EventCategory;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;

pub(crate) const SCHEMA_VERSION: i64 = 1;
const STATE_TABLE: &str = "partition_state";

/// Refuses partitions written by something else or by an incompatible
/// schema version. An empty file passes.
///
/// Returns whether every table and the current version row are already in
/// place, in which case provisioning can be skipped.
pub(crate) fn preflight_gate(conn: &Connection) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(false);
    }

    let known: BTreeSet<&str> = EventCategory::ALL
        .into_iter()
        .map(|category| TableSpec::for_category(category).name)
        .chain([STATE_TABLE])
        .collect();

    if tables.iter().any(|table| !known.contains(table.as_str())) {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }

    if !tables.contains(STATE_TABLE) {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state table is missing",
        ));
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM partition_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match version {
        Some(v) if v == SCHEMA_VERSION => {
            Ok(known.iter().all(|table| tables.contains(*table)))
        }
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
        // Provisioning was interrupted before the state row landed.
        None => Ok(false),
    }
}

pub(crate) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    let mut ddl = String::from(
        r#"
        CREATE TABLE IF NOT EXISTS partition_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL
        );
        "#,
    );
    for category in EventCategory::ALL {
        let spec = TableSpec::for_category(category);
        ddl.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (\n  {key} TEXT PRIMARY KEY NOT NULL,\n  event_id TEXT NOT NULL\n);\n",
            table = spec.name,
            key = spec.key_column,
        ));
    }
    conn.execute_batch(&ddl)?;

    conn.execute(
        "INSERT INTO partition_state(singleton, schema_version) VALUES (1, ?1) \
         ON CONFLICT(singleton) DO NOTHING",
        params![SCHEMA_VERSION],
    )?;
    Ok(())
}
