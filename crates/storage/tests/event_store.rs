use cl_core::EventCategory;
use cl_core::ids::ProjectName;
use cl_storage::{EventStore, StoreEntry, StoreError};
use rusqlite::{Connection, params};

fn project(name: &str) -> ProjectName {
    ProjectName::try_new(name).expect("valid project name")
}

fn table_names(store: &EventStore, project: &ProjectName) -> Vec<String> {
    let conn = Connection::open(store.partition_path(project)).expect("raw partition open");
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .expect("prepare");
    stmt.query_map([], |row| row.get::<_, String>(0))
        .expect("query")
        .collect::<Result<Vec<_>, _>>()
        .expect("rows")
}

fn row_count(store: &EventStore, project: &ProjectName, table: &str, key_column: &str, key: &str) -> i64 {
    let conn = Connection::open(store.partition_path(project)).expect("raw partition open");
    conn.query_row(
        &format!("SELECT COUNT(1) FROM {table} WHERE {key_column}=?1"),
        params![key],
        |row| row.get(0),
    )
    .expect("count")
}

#[test]
fn connect_is_idempotent() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("P");

    for _ in 0..5 {
        store.connect(&p).expect("connect must succeed repeatedly");
    }

    assert_eq!(
        table_names(&store, &p),
        vec![
            "partition_state".to_string(),
            "source_change_created".to_string(),
            "source_change_submitted".to_string(),
        ]
    );
    let partitions = std::fs::read_dir(root.path())
        .expect("read data root")
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "db"))
        .count();
    assert_eq!(partitions, 1);
}

#[test]
fn round_trip_overwrites_never_duplicates() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("P");

    store
        .upsert(&p, EventCategory::SourceChangeCreated, "change-9", "evt-1")
        .expect("insert");
    assert_eq!(
        store
            .get(&p, EventCategory::SourceChangeCreated, "change-9")
            .expect("get after insert"),
        "evt-1"
    );

    store
        .upsert(&p, EventCategory::SourceChangeCreated, "change-9", "evt-2")
        .expect("update");
    assert_eq!(
        store
            .get(&p, EventCategory::SourceChangeCreated, "change-9")
            .expect("get after update"),
        "evt-2"
    );

    store
        .upsert(&p, EventCategory::SourceChangeCreated, "change-9", "evt-3")
        .expect("second update");
    assert_eq!(
        row_count(&store, &p, "source_change_created", "change_id", "change-9"),
        1
    );
}

#[test]
fn categories_are_independent_tables() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("P");

    store
        .upsert(&p, EventCategory::SourceChangeSubmitted, "main", "evt-100")
        .expect("insert submitted");

    let err = store
        .get(&p, EventCategory::SourceChangeCreated, "main")
        .expect_err("created table has no such key");
    assert!(err.is_not_found());
    assert_eq!(
        store
            .get(&p, EventCategory::SourceChangeSubmitted, "main")
            .expect("submitted key"),
        "evt-100"
    );
}

#[test]
fn projects_are_separate_partitions() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let a = project("A");
    let b = project("B");

    store
        .upsert(&a, EventCategory::SourceChangeSubmitted, "main", "evt-a")
        .expect("insert A");
    store.connect(&b).expect("provision B");

    assert!(
        store
            .get(&b, EventCategory::SourceChangeSubmitted, "main")
            .expect_err("B has no rows")
            .is_not_found()
    );
}

#[test]
fn get_on_unprovisioned_project_is_not_found_and_creates_nothing() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("group/never-seen");

    let err = store
        .get(&p, EventCategory::SourceChangeCreated, "change-1")
        .expect_err("nothing recorded");
    assert!(matches!(err, StoreError::NotFound));
    assert!(!root.path().join("group").exists());
}

#[test]
fn connect_fails_when_partition_cannot_be_opened() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("P");

    // A directory squatting on the partition path.
    std::fs::create_dir_all(store.partition_path(&p)).expect("squat partition path");

    let err = store
        .get(&p, EventCategory::SourceChangeCreated, "change-1")
        .expect_err("directory is not a database");
    assert!(matches!(err, StoreError::ConnectionFailure { .. }), "{err}");
    assert_eq!(err.code(), "CONNECTION_FAILURE");
}

#[test]
fn first_upsert_into_nested_project_creates_directories() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("group/sub-project");

    store
        .upsert(&p, EventCategory::SourceChangeSubmitted, "main", "evt-1")
        .expect("first write provisions the partition directory");
    assert!(root.path().join("group").join("sub-project.db").is_file());
    assert_eq!(
        store
            .get(&p, EventCategory::SourceChangeSubmitted, "main")
            .expect("get after first write"),
        "evt-1"
    );

    let path = store.ensure_partition_dir(&p).expect("provisioning is idempotent");
    assert_eq!(path, root.path().join("group").join("sub-project.db"));
}

#[test]
fn first_write_creates_missing_data_root() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path().join("not-yet"));
    let p = project("P");

    let previous = store
        .table(EventCategory::SourceChangeCreated)
        .replace(&p, "I1", "evt-1")
        .expect("replace provisions the data root");
    assert_eq!(previous, None);
    assert!(root.path().join("not-yet").join("P.db").is_file());
}

#[test]
fn reads_do_not_wait_behind_a_writer() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("P");
    store
        .upsert(&p, EventCategory::SourceChangeCreated, "I1", "evt-1")
        .expect("seed");

    let mut writer = Connection::open(store.partition_path(&p)).expect("raw open");
    let tx = writer
        .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)
        .expect("hold the write lock");

    let started = std::time::Instant::now();
    assert_eq!(
        store
            .get(&p, EventCategory::SourceChangeCreated, "I1")
            .expect("read alongside a pending writer"),
        "evt-1"
    );
    assert!(started.elapsed() < std::time::Duration::from_secs(2));

    tx.rollback().expect("release the write lock");
}

#[test]
fn foreign_partition_is_rejected() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("P");

    let conn = Connection::open(store.partition_path(&p)).expect("raw open");
    conn.execute("CREATE TABLE legacy(id TEXT PRIMARY KEY)", [])
        .expect("legacy table");
    drop(conn);

    let err = store.connect(&p).expect_err("foreign tables must be rejected");
    match err {
        StoreError::ConnectionFailure { reason, .. } => {
            assert!(reason.contains("RESET_REQUIRED"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn keys_and_event_ids_are_validated_before_io() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("P");

    let err = store
        .upsert(&p, EventCategory::SourceChangeSubmitted, "", "evt-1")
        .expect_err("empty key");
    assert_eq!(err.code(), "INVALID_INPUT");

    let err = store
        .upsert(&p, EventCategory::SourceChangeSubmitted, "main", " ")
        .expect_err("blank event id");
    assert_eq!(err.code(), "INVALID_INPUT");

    assert!(!store.partition_exists(&p));
}

#[test]
fn entries_lists_rows_by_key() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("P");
    let table = store.table(EventCategory::SourceChangeSubmitted);

    assert!(table.entries(&p).expect("empty listing").is_empty());

    table.upsert(&p, "release", "evt-2").expect("insert release");
    table.upsert(&p, "main", "evt-1").expect("insert main");
    table.upsert(&p, "main", "evt-3").expect("update main");

    assert_eq!(
        table.entries(&p).expect("listing"),
        vec![
            StoreEntry {
                key: "main".to_string(),
                event_id: "evt-3".to_string(),
            },
            StoreEntry {
                key: "release".to_string(),
                event_id: "evt-2".to_string(),
            },
        ]
    );
}

#[test]
fn replace_returns_previous_id() {
    let root = tempfile::tempdir().expect("temp dir");
    let store = EventStore::new(root.path());
    let p = project("P");
    let table = store.table(EventCategory::SourceChangeCreated);

    assert_eq!(table.replace(&p, "change-1", "evt-1").expect("first"), None);
    assert_eq!(
        table.replace(&p, "change-1", "evt-2").expect("second"),
        Some("evt-1".to_string())
    );
    assert_eq!(table.get(&p, "change-1").expect("get"), "evt-2");
}
