//! Key-value persistence contracts with local-storage semantics.
//!
//! # Responsibility
//! - Define the string-keyed, string-valued storage primitive the record
//!   store persists through.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - `set_item` replaces the whole value for a key in one write.
//! - `get_item` returns `None` only when the key is absent.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use schema::{open_sqlite, open_sqlite_in_memory, schema_version, SCHEMA_VERSION};
pub use sqlite::SqliteKeyValueStore;

pub type KvResult<T> = Result<T, KvError>;

/// Storage-level failure raised by key-value implementations.
#[derive(Debug)]
pub enum KvError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build than this one.
    SchemaTooNew { found: u32, supported: u32 },
    /// The connection was not opened through `open_sqlite*`.
    SchemaMismatch { expected: u32, found: u32 },
    MissingTable(&'static str),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "contact database uses schema {found}, this build reads up to {supported}"
            ),
            Self::SchemaMismatch { expected, found } => write!(
                f,
                "connection is at schema {found}, expected {expected}; open it with open_sqlite"
            ),
            Self::MissingTable(table) => write!(f, "table `{table}` is missing"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Local-storage style persistence primitive.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> KvResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> KvResult<()>;
    fn remove_item(&self, key: &str) -> KvResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> KvResult<()> {
        (**self).remove_item(key)
    }
}
