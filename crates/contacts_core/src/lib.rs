//! Core domain logic for the contact list manager.
//! This crate is the single source of truth for record persistence and
//! form interaction rules; front ends only forward user events.

pub mod config;
pub mod controller;
pub mod kv;
pub mod logging;
pub mod model;
pub mod store;
pub mod ui;

pub use config::{AppConfig, ConfigError, StorageTarget};
pub use controller::interaction::{
    Controller, ControllerError, ControllerResult, Mode, SubmitOutcome, MSG_FILL_ALL_FIELDS,
    MSG_USER_ADDED, MSG_USER_DELETED, MSG_USER_UPDATED,
};
pub use kv::{KeyValueStore, KvError, KvResult, MemoryKeyValueStore, SqliteKeyValueStore};
pub use logging::{default_log_level, init_logging, LogTarget, LoggingError};
pub use model::record::{Record, RecordValidationError};
pub use store::record_store::{
    CorruptionPolicy, RecordStore, StoreError, StoreResult, DEFAULT_STORAGE_KEY,
};
pub use ui::clock::{Clock, ManualClock, SystemClock};
pub use ui::render::render_view;
pub use ui::view::{
    Banner, BannerId, BannerMode, Card, CardId, FormState, Presentation, Severity, SubmitAction,
    ViewModel,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
