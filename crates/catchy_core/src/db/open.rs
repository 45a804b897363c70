//! Connection bootstrap for the task store.
//!
//! # Invariants
//! - Returned connections enforce foreign keys and wait on busy locks.
//! - Returned connections are migrated to `latest_version()`.

use super::migrations::{apply_migrations, schema_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating when missing) the task store file at `path`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a throwaway in-memory task store.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with<F>(mode: &'static str, opener: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    let fail = |stage: &str, err: &DbError| {
        error!(
            "event=db_open module=db status=error mode={mode} stage={stage} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        );
    };

    let mut conn = opener()
        .map_err(DbError::from)
        .inspect_err(|err| fail("connect", err))?;
    let applied = prepare(&mut conn).inspect_err(|err| fail("prepare", err))?;

    info!(
        "event=db_open module=db status=ok mode={mode} schema_version={} migrations_applied={applied} duration_ms={}",
        schema_version(&conn)?,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn prepare(conn: &mut Connection) -> DbResult<usize> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
