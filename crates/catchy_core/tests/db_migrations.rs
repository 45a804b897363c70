use catchy_core::db::migrations::{apply_migrations, latest_version};
use catchy_core::db::{open_db, open_db_in_memory, schema_version, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "projects");
    assert_table_exists(&conn, "tasks");
    assert_table_exists(&conn, "task_comments");
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let orphan = conn.execute(
        "INSERT INTO tasks (id, project_id, user_id, title) VALUES ('t1', 'missing', 'u1', 'Orphan');",
        [],
    );
    assert!(orphan.is_err());
}

#[test]
fn task_status_and_priority_are_constrained_by_the_schema() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO projects (id, user_id, name) VALUES ('p1', 'u1', 'Website');",
        [],
    )
    .unwrap();

    let bad_status = conn.execute(
        "INSERT INTO tasks (id, project_id, user_id, title, status)
         VALUES ('t1', 'p1', 'u1', 'Blocked', 'blocked');",
        [],
    );
    assert!(bad_status.is_err());
    let bad_priority = conn.execute(
        "INSERT INTO tasks (id, project_id, user_id, title, priority)
         VALUES ('t2', 'p1', 'u1', 'Urgent', 'urgent');",
        [],
    );
    assert!(bad_priority.is_err());
    let valid = conn.execute(
        "INSERT INTO tasks (id, project_id, user_id, title, status, priority)
         VALUES ('t3', 'p1', 'u1', 'Fine', 'inProgress', 'high');",
        [],
    );
    assert_eq!(valid.unwrap(), 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catchy.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO projects (id, user_id, name) VALUES ('p1', 'u1', 'Kept');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM projects;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn migrating_a_current_store_applies_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
}

#[test]
fn failing_step_is_named_and_rolled_back() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE task_comments (id TEXT);")
        .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    match &err {
        DbError::Migration { version, name, .. } => {
            assert_eq!(*version, 2);
            assert_eq!(*name, "task_comments");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("migration 0002_task_comments failed"));
    assert_eq!(schema_version(&conn).unwrap(), 0);
    let projects_exists: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'projects';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(projects_exists, 0);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
