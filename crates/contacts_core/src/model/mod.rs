//! Contact domain model.
//!
//! # Responsibility
//! - Define the persisted contact record and its validation rules.
//!
//! # Invariants
//! - Email is the natural key; duplicates are possible and not rejected here.

pub mod record;
