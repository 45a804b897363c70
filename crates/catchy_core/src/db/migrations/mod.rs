//! Ordered schema steps for the task store.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - Pending steps run in one transaction; `user_version` tracks the last one.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

impl Migration {
    fn run(&self, tx: &Transaction<'_>) -> DbResult<()> {
        let wrap = |source| DbError::Migration {
            version: self.version,
            name: self.name,
            source,
        };
        tx.execute_batch(self.sql).map_err(wrap)?;
        tx.pragma_update(None, "user_version", self.version)
            .map_err(wrap)?;
        Ok(())
    }
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "task_comments",
        sql: include_str!("0002_task_comments.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded in the store.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

/// Brings the store up to `latest_version()`.
///
/// Returns how many steps were applied (`0` when already current).
///
/// # Errors
/// - `SchemaTooNew` when a newer build wrote the store.
/// - `Migration` naming the failing step; nothing is applied then.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        warn!("event=db_migrate module=db status=refused found={found} supported={supported}");
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        migration.run(&tx)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from={found} to={supported} steps={}",
        pending.len()
    );
    Ok(pending.len())
}
