//! SQLite file layout for the durable key-value store.
//!
//! # Responsibility
//! - Open file or in-memory connections and bring them to `SCHEMA_VERSION`.
//!
//! # Invariants
//! - Step `n` of `SCHEMA_STEPS` moves the file from version `n` to `n + 1`.
//! - The version lives in `PRAGMA user_version` and only moves forward.
//! - All pending steps commit together or not at all.

use super::{KvError, KvResult};
use log::{info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const SCHEMA_STEPS: &[&str] = &[include_str!("migrations/0001_kv_items.sql")];

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = SCHEMA_STEPS.len() as u32;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the contact database at `path`.
pub fn open_sqlite(path: impl AsRef<Path>) -> KvResult<Connection> {
    let path = path.as_ref();
    prepare("file", Connection::open(path)?)
}

/// Opens a private in-memory database; contents die with the connection.
pub fn open_sqlite_in_memory() -> KvResult<Connection> {
    prepare("memory", Connection::open_in_memory()?)
}

/// Version recorded in the file header.
pub fn schema_version(conn: &Connection) -> KvResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

fn prepare(target: &'static str, mut conn: Connection) -> KvResult<Connection> {
    let started_at = Instant::now();
    conn.busy_timeout(BUSY_TIMEOUT)?;

    match upgrade(&mut conn) {
        Ok(from) => {
            info!(
                "event=kv_open module=contacts status=ok target={} schema_from={} schema={} duration_ms={}",
                target,
                from,
                SCHEMA_VERSION,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            warn!("event=kv_open module=contacts status=error target={target} error={err}");
            Err(err)
        }
    }
}

/// Applies every step past the stored version; returns the starting version.
fn upgrade(conn: &mut Connection) -> KvResult<u32> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(KvError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(found);
    }

    let tx = conn.transaction()?;
    for (index, sql) in SCHEMA_STEPS.iter().enumerate().skip(found as usize) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", index as u32 + 1)?;
    }
    tx.commit()?;
    Ok(found)
}
