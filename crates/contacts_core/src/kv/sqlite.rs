//! SQLite-backed key-value store over the `kv_items` table.
//!
//! # Invariants
//! - The connection must come from `open_sqlite*` so the schema is current.
//! - Each `set_item` is a single upsert statement.

use super::schema::{schema_version, SCHEMA_VERSION};
use super::{KeyValueStore, KvError, KvResult};
use rusqlite::{params, Connection, OptionalExtension};

const KV_TABLE: &str = "kv_items";

/// Durable `KeyValueStore` borrowing an open connection.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `SchemaMismatch` when the connection is not at `SCHEMA_VERSION`.
    /// - `MissingTable` when `kv_items` is absent.
    pub fn try_new(conn: &'conn Connection) -> KvResult<Self> {
        let found = schema_version(conn)?;
        if found != SCHEMA_VERSION {
            return Err(KvError::SchemaMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }

        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [KV_TABLE],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(KvError::MissingTable(KV_TABLE));
        }

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_items WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv_items (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> KvResult<()> {
        self.conn.execute("DELETE FROM kv_items WHERE key = ?1;", [key])?;
        Ok(())
    }
}
