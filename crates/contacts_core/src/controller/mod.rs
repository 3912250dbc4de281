//! Interaction controller between user events, the record store and the view.
//!
//! # Responsibility
//! - Hold the transient form mode (adding vs editing).
//! - Turn submit/edit/delete/cancel events into store and view calls.
//!
//! # See also
//! - `crate::store::record_store` for persistence semantics.
//! - `crate::ui::view` for the presentation contract.

pub mod interaction;
