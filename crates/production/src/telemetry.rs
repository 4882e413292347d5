//! Logging setup.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_level`. Logs go to stderr so command output
/// on stdout stays machine-readable, or to `log_file` if given. The returned
/// guard must be held until exit so buffered file logs are flushed.
pub fn init_logging(default_level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt();

    let Some(log_file) = log_file else {
        builder
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
        return Ok(None);
    };

    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = log_file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid log file name"))?
        .to_string_lossy()
        .to_string();
    let directory = log_file
        .parent()
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    builder
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_env_filter(filter)
        .init();
    Ok(Some(guard))
}
