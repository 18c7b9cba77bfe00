//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so in that mode logs are written to a file
//! through a non-blocking appender; the one-shot `predict` command logs to
//! stderr. `RUST_LOG` overrides the default `info` filter.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

use crate::error::{AppError, EXIT_USAGE};

const DEFAULT_FILTER: &str = "info";
pub const LOG_FILE_NAME: &str = "loan-portal.log";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("cannot open log file {}: {reason}", .path.display())]
    LogFile { path: PathBuf, reason: String },
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        AppError::new(EXIT_USAGE, value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Log file used by the interactive UI.
    pub fn default_file() -> Self {
        LogTarget::File(std::env::temp_dir().join(LOG_FILE_NAME))
    }
}

/// Keeps the background log writer alive; drop it last to flush.
pub struct TelemetryGuard {
    _worker: Option<WorkerGuard>,
}

pub fn init(target: &LogTarget) -> Result<TelemetryGuard, TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER).map_err(|source| TelemetryError::EnvFilter {
            value: DEFAULT_FILTER.to_string(),
            source,
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false);

    match target {
        LogTarget::Stderr => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;
            Ok(TelemetryGuard { _worker: None })
        }
        LogTarget::File(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(LOG_FILE_NAME);
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(dir)
                .map_err(|e| TelemetryError::LogFile {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            let (writer, worker) = tracing_appender::non_blocking(appender);
            builder
                .with_writer(writer)
                .try_init()
                .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;
            Ok(TelemetryGuard {
                _worker: Some(worker),
            })
        }
    }
}
