//! Whole-list record store with local-storage semantics.
//!
//! # Responsibility
//! - Provide list/add/remove/update over one JSON array value.
//! - Apply the configured policy when the stored value cannot be parsed.
//!
//! # Invariants
//! - An absent key reads as an empty list.
//! - No-op mutations (nothing matched) do not write.
//! - Logs carry counts only, never names or emails.

use crate::kv::{KeyValueStore, KvError};
use crate::model::record::{Record, RecordValidationError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage key used by the browser-era data layout.
pub const DEFAULT_STORAGE_KEY: &str = "users";

pub type StoreResult<T> = Result<T, StoreError>;

/// What `list` does when the persisted value is not a valid record array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptionPolicy {
    /// Return `StoreError::Corrupted` and leave the stored value untouched.
    #[default]
    Surface,
    /// Treat the value as an empty list; the next write replaces it.
    ResetToEmpty,
}

impl CorruptionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Surface => "surface",
            Self::ResetToEmpty => "reset",
        }
    }
}

impl FromStr for CorruptionPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(Self::Surface),
            "reset" | "reset_to_empty" => Ok(Self::ResetToEmpty),
            other => Err(format!(
                "unsupported corruption policy `{other}`; expected surface|reset"
            )),
        }
    }
}

/// Record store failure.
#[derive(Debug)]
pub enum StoreError {
    Validation(RecordValidationError),
    Kv(KvError),
    Corrupted { key: String, message: String },
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Kv(err) => write!(f, "{err}"),
            Self::Corrupted { key, message } => {
                write!(f, "stored value under `{key}` is corrupted: {message}")
            }
            Self::Encode(err) => write!(f, "failed to encode record list: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Kv(err) => Some(err),
            Self::Corrupted { .. } => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Persisted contact list under one storage key.
pub struct RecordStore<K: KeyValueStore> {
    kv: K,
    key: String,
    corruption_policy: CorruptionPolicy,
}

impl<K: KeyValueStore> RecordStore<K> {
    /// Creates a store using `DEFAULT_STORAGE_KEY` and `CorruptionPolicy::Surface`.
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            corruption_policy: CorruptionPolicy::default(),
        }
    }

    pub fn with_corruption_policy(mut self, policy: CorruptionPolicy) -> Self {
        self.corruption_policy = policy;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the full persisted list in stored order.
    pub fn list(&self) -> StoreResult<Vec<Record>> {
        let Some(raw) = self.kv.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        let err = match serde_json::from_str::<Vec<Record>>(&raw) {
            Ok(records) => return Ok(records),
            Err(err) => err,
        };

        warn!(
            "event=store_read module=store status=error error_code=corrupted policy={} line={} column={}",
            self.corruption_policy.as_str(),
            err.line(),
            err.column()
        );
        match self.corruption_policy {
            CorruptionPolicy::Surface => Err(StoreError::Corrupted {
                key: self.key.clone(),
                message: err.to_string(),
            }),
            CorruptionPolicy::ResetToEmpty => Ok(Vec::new()),
        }
    }

    /// Returns the first record whose email matches exactly.
    pub fn find(&self, email: &str) -> StoreResult<Option<Record>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|record| record.email == email))
    }

    /// Appends one record and persists the whole list.
    ///
    /// Duplicate emails are accepted.
    pub fn add(&self, record: Record) -> StoreResult<()> {
        record.validate()?;

        let mut records = self.list()?;
        records.push(record);
        self.persist(&records)?;

        info!(
            "event=store_add module=store status=ok total={}",
            records.len()
        );
        Ok(())
    }

    /// Removes every record with `email`; returns how many were removed.
    pub fn remove(&self, email: &str) -> StoreResult<usize> {
        let mut records = self.list()?;
        let before = records.len();
        records.retain(|record| record.email != email);
        let removed = before - records.len();

        if removed == 0 {
            debug!("event=store_remove module=store status=noop removed=0");
            return Ok(0);
        }

        self.persist(&records)?;
        info!(
            "event=store_remove module=store status=ok removed={} total={}",
            removed,
            records.len()
        );
        Ok(removed)
    }

    /// Rewrites name and email of every record matching `original_email`.
    ///
    /// Matching records keep their position; returns how many changed.
    pub fn update(
        &self,
        original_email: &str,
        new_name: &str,
        new_email: &str,
    ) -> StoreResult<usize> {
        Record::new(new_name, new_email).validate()?;

        let mut records = self.list()?;
        let mut updated = 0;
        for record in records
            .iter_mut()
            .filter(|record| record.email == original_email)
        {
            record.name = new_name.to_string();
            record.email = new_email.to_string();
            updated += 1;
        }

        if updated == 0 {
            debug!("event=store_update module=store status=noop updated=0");
            return Ok(0);
        }

        self.persist(&records)?;
        info!(
            "event=store_update module=store status=ok updated={} total={}",
            updated,
            records.len()
        );
        Ok(updated)
    }

    /// Drops the storage key; the next `list` is empty.
    pub fn clear(&self) -> StoreResult<()> {
        self.kv.remove_item(&self.key)?;
        info!("event=store_clear module=store status=ok");
        Ok(())
    }

    fn persist(&self, records: &[Record]) -> StoreResult<()> {
        let encoded = serde_json::to_string(records).map_err(StoreError::Encode)?;
        self.kv.set_item(&self.key, &encoded)?;
        Ok(())
    }
}
