#![forbid(unsafe_code)]

use super::{EventStore, StoreError, check_event_id, check_key};
use cl_core::EventCategory;
use cl_core::ids::ProjectName;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

/// Physical layout of one category table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSpec {
    pub category: EventCategory,
    pub name: &'static str,
    pub key_column: &'static str,
}

impl TableSpec {
    pub fn for_category(category: EventCategory) -> Self {
        match category {
            EventCategory::SourceChangeCreated => Self {
                category,
                name: "source_change_created",
                key_column: "change_id",
            },
            EventCategory::SourceChangeSubmitted => Self {
                category,
                name: "source_change_submitted",
                key_column: "branch",
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreEntry {
    pub key: String,
    pub event_id: String,
}

/// One category's view of an [`EventStore`].
#[derive(Clone, Copy, Debug)]
pub struct KeyedTable<'a> {
    store: &'a EventStore,
    spec: TableSpec,
}

impl<'a> KeyedTable<'a> {
    pub(crate) fn new(store: &'a EventStore, spec: TableSpec) -> Self {
        Self { store, spec }
    }

    pub fn category(&self) -> EventCategory {
        self.spec.category
    }

    pub fn spec(&self) -> TableSpec {
        self.spec
    }

    /// Last recorded event id for `key`, or `NotFound`.
    ///
    /// A project without a partition file has no rows; it is reported as
    /// `NotFound` without creating the file.
    pub fn get(&self, project: &ProjectName, key: &str) -> Result<String, StoreError> {
        check_key(key)?;
        if !self.store.partition_exists(project) {
            return Err(StoreError::NotFound);
        }

        let conn = self.store.connect(project)?;
        select_event_id(&conn, self.spec, key)?.ok_or(StoreError::NotFound)
    }

    /// Inserts or overwrites the row for `key` in a single statement,
    /// creating the partition directory on first write.
    pub fn upsert(
        &self,
        project: &ProjectName,
        key: &str,
        event_id: &str,
    ) -> Result<(), StoreError> {
        check_key(key)?;
        check_event_id(event_id)?;

        self.store.ensure_partition_dir(project)?;
        let conn = self.store.connect(project)?;
        upsert_row(&conn, self.spec, key, event_id)
    }

    /// Upserts `event_id` and returns the id it replaced, read and written
    /// under one write lock so concurrent writers cannot interleave.
    pub fn replace(
        &self,
        project: &ProjectName,
        key: &str,
        event_id: &str,
    ) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        check_event_id(event_id)?;

        self.store.ensure_partition_dir(project)?;
        let mut conn = self.store.connect(project)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let previous = select_event_id(&tx, self.spec, key)?;
        upsert_row(&tx, self.spec, key, event_id)?;
        tx.commit()?;
        Ok(previous)
    }

    pub fn entries(&self, project: &ProjectName) -> Result<Vec<StoreEntry>, StoreError> {
        if !self.store.partition_exists(project) {
            return Ok(Vec::new());
        }

        let conn = self.store.connect(project)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {key}, event_id FROM {table} ORDER BY {key} ASC",
            key = self.spec.key_column,
            table = self.spec.name,
        ))?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(StoreEntry {
                key: row.get(0)?,
                event_id: row.get(1)?,
            });
        }
        Ok(out)
    }
}

fn select_event_id(
    conn: &Connection,
    spec: TableSpec,
    key: &str,
) -> Result<Option<String>, StoreError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT event_id FROM {table} WHERE {key}=?1",
                table = spec.name,
                key = spec.key_column,
            ),
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()?)
}

fn upsert_row(
    conn: &Connection,
    spec: TableSpec,
    key: &str,
    event_id: &str,
) -> Result<(), StoreError> {
    let affected = conn.execute(
        &format!(
            "INSERT INTO {table}({key}, event_id) VALUES (?1, ?2) \
             ON CONFLICT({key}) DO UPDATE SET event_id=excluded.event_id",
            table = spec.name,
            key = spec.key_column,
        ),
        params![key, event_id],
    )?;
    if affected == 0 {
        return Err(StoreError::NoRowsAffected { table: spec.name });
    }
    Ok(())
}
