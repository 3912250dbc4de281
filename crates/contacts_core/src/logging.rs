//! Rolling file logs for contact list front ends.
//!
//! Events are `key=value` lines tagged `module=contacts` (or the emitting
//! layer). Names and emails never appear in them; only counts, modes and
//! error text do.
//!
//! # Invariants
//! - At most one logger per process; repeating the same target is a no-op.
//! - A config without `log_dir` leaves logging off.

use crate::config::AppConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_BASENAME: &str = "contacts";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_FILES: usize = 3;

static ACTIVE: OnceCell<(LogTarget, LoggerHandle)> = OnceCell::new();

/// Where and how verbosely the process logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    pub level: LevelFilter,
    pub dir: PathBuf,
}

#[derive(Debug)]
pub enum LoggingError {
    UnknownLevel(String),
    RelativeDir(PathBuf),
    CreateDir(PathBuf, std::io::Error),
    Backend(FlexiLoggerError),
    /// A different target is already active in this process.
    AlreadyActive(LogTarget),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unknown log level `{level}`; use off|error|warn|info|debug|trace"
            ),
            Self::RelativeDir(dir) => {
                write!(f, "log directory must be absolute, got `{}`", dir.display())
            }
            Self::CreateDir(dir, err) => {
                write!(f, "cannot create log directory `{}`: {err}", dir.display())
            }
            Self::Backend(err) => write!(f, "logger failed to start: {err}"),
            Self::AlreadyActive(target) => write!(
                f,
                "already logging at {} to `{}`",
                target.level,
                target.dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir(_, err) => Some(err),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Starts file logging from `config.log_level` and `config.log_dir`.
///
/// Returns `Ok(None)` when `log_dir` is unset.
pub fn init_logging(config: &AppConfig) -> Result<Option<LogTarget>, LoggingError> {
    let Some(dir) = &config.log_dir else {
        return Ok(None);
    };
    let target = LogTarget {
        level: parse_level(&config.log_level)?,
        dir: dir.clone(),
    };
    if !target.dir.is_absolute() {
        return Err(LoggingError::RelativeDir(target.dir));
    }

    let (active, _) = ACTIVE.get_or_try_init(|| start(target.clone()))?;
    if *active != target {
        return Err(LoggingError::AlreadyActive(active.clone()));
    }
    Ok(Some(target))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, LoggingError> {
    raw.trim()
        .parse::<LevelFilter>()
        .map_err(|_| LoggingError::UnknownLevel(raw.trim().to_string()))
}

fn start(target: LogTarget) -> Result<(LogTarget, LoggerHandle), LoggingError> {
    std::fs::create_dir_all(&target.dir)
        .map_err(|err| LoggingError::CreateDir(target.dir.clone(), err))?;

    let handle = Logger::try_with_str(target.level.as_str().to_ascii_lowercase())
        .map_err(LoggingError::Backend)?
        .log_to_file(
            FileSpec::default()
                .directory(&target.dir)
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_FILES),
        )
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    info!(
        "event=logging_start module=contacts status=ok version={} level={}",
        env!("CARGO_PKG_VERSION"),
        target.level
    );
    Ok((target, handle))
}
