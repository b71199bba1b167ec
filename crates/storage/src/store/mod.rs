#![forbid(unsafe_code)]

mod error;
mod schema;
mod state;
mod table;

pub use error::StoreError;
pub use state::*;
pub use table::*;

use cl_core::EventCategory;
use cl_core::ids::{ProjectName, validate_key};
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

const PARTITION_EXTENSION: &str = "db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable "last event id per key" store. Each project owns one SQLite file
/// under `data_root`, holding one table per [`EventCategory`].
///
/// Connections are opened per operation and dropped when it finishes.
#[derive(Clone, Debug)]
pub struct EventStore {
    data_root: PathBuf,
}

impl EventStore {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    /// `<data_root>/<project parent>/<leaf>.db`
    pub fn partition_path(&self, project: &ProjectName) -> PathBuf {
        let mut path = self.data_root.clone();
        if let Some(parent) = project.parent() {
            path.extend(parent.split('/'));
        }
        path.push(format!("{}.{PARTITION_EXTENSION}", project.leaf()));
        path
    }

    /// Creates the directory holding the project's partition. Idempotent.
    pub fn ensure_partition_dir(&self, project: &ProjectName) -> Result<PathBuf, StoreError> {
        let path = self.partition_path(project);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(path)
    }

    /// Opens the project's partition, provisioning its tables if absent.
    /// The containing directory must already exist.
    pub fn connect(&self, project: &ProjectName) -> Result<Connection, StoreError> {
        let partition = self.partition_path(project);
        let fail = |reason: String| StoreError::ConnectionFailure {
            partition: partition.clone(),
            reason,
        };

        let conn = Connection::open(&partition).map_err(|err| fail(err.to_string()))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|err| fail(err.to_string()))?;
        let current = schema::preflight_gate(&conn).map_err(|err| fail(err.to_string()))?;
        if !current {
            schema::install_schema(&conn).map_err(|err| fail(err.to_string()))?;
        }
        Ok(conn)
    }

    pub fn partition_exists(&self, project: &ProjectName) -> bool {
        self.partition_path(project).exists()
    }

    /// Routes a category to its table.
    pub fn table(&self, category: EventCategory) -> KeyedTable<'_> {
        KeyedTable::new(self, TableSpec::for_category(category))
    }

    /// Like [`EventStore::table`] for an untyped tag; unknown tags are a
    /// programming error and surface as `UnsupportedCategory`.
    pub fn table_for_tag(&self, tag: &str) -> Result<KeyedTable<'_>, StoreError> {
        let category = EventCategory::parse_tag(tag)
            .map_err(|err| StoreError::UnsupportedCategory(err.0))?;
        Ok(self.table(category))
    }

    pub fn get(
        &self,
        project: &ProjectName,
        category: EventCategory,
        key: &str,
    ) -> Result<String, StoreError> {
        self.table(category).get(project, key)
    }

    pub fn upsert(
        &self,
        project: &ProjectName,
        category: EventCategory,
        key: &str,
        event_id: &str,
    ) -> Result<(), StoreError> {
        self.table(category).upsert(project, key, event_id)
    }
}

fn check_key(value: &str) -> Result<(), StoreError> {
    validate_key(value).map_err(|err| StoreError::InvalidInput(err.message()))
}

fn check_event_id(value: &str) -> Result<(), StoreError> {
    validate_key(value).map_err(|_| StoreError::InvalidInput("invalid event id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_path_nests_under_project_parent() {
        let store = EventStore::new("/data");
        let nested = ProjectName::try_new("group/team/sub-project").unwrap();
        assert_eq!(
            store.partition_path(&nested),
            PathBuf::from("/data/group/team/sub-project.db")
        );

        let flat = ProjectName::try_new("plain").unwrap();
        assert_eq!(store.partition_path(&flat), PathBuf::from("/data/plain.db"));
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        let store = EventStore::new("/data");
        let err = store
            .table_for_tag("ArtifactPublished")
            .err()
            .expect("unknown tag must be rejected");
        assert_eq!(err.code(), "UNSUPPORTED_CATEGORY");
        assert!(matches!(err, StoreError::UnsupportedCategory(tag) if tag == "ArtifactPublished"));
    }

    #[test]
    fn tag_routes_to_category_table() {
        let store = EventStore::new("/data");
        let table = store.table_for_tag("EiffelSourceChangeCreatedEvent").unwrap();
        assert_eq!(table.category(), EventCategory::SourceChangeCreated);
        assert_eq!(table.spec().key_column, "change_id");
    }
}
