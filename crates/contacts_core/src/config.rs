//! Runtime configuration for contact list front ends.
//!
//! # Responsibility
//! - Provide defaults for storage, banner and logging settings.
//! - Read `CONTACTS_*` environment overrides.
//!
//! # Invariants
//! - Blank environment values are ignored, never treated as overrides.
//! - Invalid values are reported, not silently replaced by defaults.

use crate::logging::default_log_level;
use crate::store::record_store::{CorruptionPolicy, DEFAULT_STORAGE_KEY};
use crate::ui::view::{BannerMode, DEFAULT_BANNER_TTL};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "CONTACTS_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "CONTACTS_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "CONTACTS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CONTACTS_LOG_DIR";
pub const ENV_BANNER_MS: &str = "CONTACTS_BANNER_MS";
pub const ENV_CORRUPTION_POLICY: &str = "CONTACTS_CORRUPTION_POLICY";

const DEFAULT_DB_FILE_NAME: &str = "contacts.sqlite3";

/// Configuration value that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub setting: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.setting, self.message)
    }
}

impl Error for ConfigError {}

/// Where records are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    Sqlite(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageTarget,
    pub storage_key: String,
    pub banner_ttl: Duration,
    pub banner_mode: BannerMode,
    pub corruption_policy: CorruptionPolicy,
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageTarget::Sqlite(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            banner_ttl: DEFAULT_BANNER_TTL,
            banner_mode: BannerMode::default(),
            corruption_policy: CorruptionPolicy::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(ENV_DB_PATH) {
            config.storage = StorageTarget::Sqlite(PathBuf::from(path));
        }
        if let Some(key) = value(ENV_STORAGE_KEY) {
            config.storage_key = key;
        }
        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = value(ENV_BANNER_MS) {
            config.banner_ttl = parse_banner_ms(&raw)?;
        }
        if let Some(raw) = value(ENV_CORRUPTION_POLICY) {
            config.corruption_policy =
                raw.parse::<CorruptionPolicy>().map_err(|message| ConfigError {
                    setting: ENV_CORRUPTION_POLICY,
                    message,
                })?;
        }
        Ok(config)
    }
}

fn parse_banner_ms(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError {
            setting: ENV_BANNER_MS,
            message: "banner delay must be greater than zero".to_string(),
        }),
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(err) => Err(ConfigError {
            setting: ENV_BANNER_MS,
            message: format!("`{raw}` is not a millisecond count: {err}"),
        }),
    }
}
