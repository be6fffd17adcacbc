//! Logging infrastructure for hazardmap.
//!
//! Structured logging to a file and to stderr:
//! - Writes to the configured log file (default `~/.hazardmap/hazardmap.log`),
//!   cleared on session start
//! - Compact single-line format on stderr, pretty format in the file
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging from the `[logging]` config section.
pub fn init_logging(settings: &LoggingSettings) -> Result<LoggingGuard, io::Error> {
    init_logging_at(&settings.file)
}

/// Initialize logging to `log_path` and stderr.
///
/// Creates the parent directory if needed and clears any previous log.
/// Returns a [`LoggingGuard`] that must be kept alive for logging to work.
///
/// # Errors
///
/// Returns error if the directory cannot be created or the file cannot be cleared,
/// or if a global subscriber is already installed.
pub fn init_logging_at(log_path: &Path) -> Result<LoggingGuard, io::Error> {
    let (log_dir, log_file) = prepare_log_file(log_path)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .pretty();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    // Defaults to INFO if RUST_LOG not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Create the log directory and truncate the log file.
///
/// Returns the directory and file name for the appender.
fn prepare_log_file(log_path: &Path) -> Result<(PathBuf, PathBuf), io::Error> {
    let file_name = log_path
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?;
    let log_dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&log_dir)?;
    fs::write(log_dir.join(&file_name), "")?;

    Ok((log_dir, file_name))
}
