//! Process-wide logging: console plus an append-mode log file.

use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{EcfrError, Result};

/// Keeps the file writer flushing for the lifetime of the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber, once.
///
/// Logs go to stdout and to `log_file` (appended, never rotated). The level
/// defaults to `info` and follows `RUST_LOG` when set. Calls after a
/// successful initialisation do nothing.
pub fn init(log_file: &Path) -> Result<()> {
    if FILE_GUARD.get().is_some() {
        return Ok(());
    }

    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_file
        .file_name()
        .ok_or_else(|| EcfrError::Config(format!("log file '{}' has no file name", log_file.display())))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .map_err(|e| {
            EcfrError::Config(format!("cannot open log file '{}': {e}", log_file.display()))
        })?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .map_err(|e| EcfrError::Config(format!("logging already initialised: {e}")))?;

    // A concurrent winner already holds its own guard; ours flushes on drop.
    let _ = FILE_GUARD.set(guard);

    tracing::info!(log_file = %log_file.display(), "logging is configured");
    Ok(())
}
