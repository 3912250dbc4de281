//! Record store over key-value persistence.
//!
//! # Responsibility
//! - Own the durable contact list stored under a single key.
//! - Keep JSON encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Every mutation rewrites the whole list (read-modify-write).
//! - Write paths must call `Record::validate()` before persisting.

pub mod record_store;
