//! Contact record model.
//!
//! # Responsibility
//! - Define the `{name, email}` pair persisted by the record store.
//! - Validate required fields before records reach storage.
//!
//! # Invariants
//! - Serialized shape is exactly `{"name": .., "email": ..}`.
//! - Validation only checks for empty strings; values are never trimmed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One contact as shown on a card and stored in the persisted list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    /// Natural key used by update/remove lookups.
    pub email: String,
}

impl Record {
    /// Builds a record without validation.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Builds a record and rejects empty required fields.
    pub fn try_new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, RecordValidationError> {
        let record = Self::new(name, email);
        record.validate()?;
        Ok(record)
    }

    /// Checks that both name and email are non-empty.
    ///
    /// Name is checked first, so a record missing both fields reports
    /// `EmptyName`.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.name.is_empty() {
            return Err(RecordValidationError::EmptyName);
        }
        if self.email.is_empty() {
            return Err(RecordValidationError::EmptyEmail);
        }
        Ok(())
    }
}

/// Required-field violations for `Record`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyName,
    EmptyEmail,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
        }
    }
}

impl Error for RecordValidationError {}
