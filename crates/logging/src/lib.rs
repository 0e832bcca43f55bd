//! Logging initialization for the reasoner.
//!
//! Two modes are supported:
//! - Cli mode: human-readable logs to STDERR (STDOUT carries the JSON event stream).
//! - Daemon mode: JSON logs to a rolling file in the data directory, plus a lossy STDERR copy.
//!
//! The daemon log is rolled over when it reaches 5 MB. Rotated logs are
//! compressed. The maximum number of rotated logs is 20.

use anyhow::Result;
use file_rotate::{ContentLimit, FileRotate, compression::Compression, suffix::AppendCount};
use insight_store::DataDirectory;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt::writer::MakeWriterExt};

const LOG_FILE_NAME: &str = "reasoner.log";
const MAX_LOG_BYTES: usize = 5 * 1024 * 1024;
const MAX_ROTATED_LOGS: usize = 20;

pub enum LogMode {
    Cli,
    Daemon { data_directory: DataDirectory },
}

/// Guard that keeps background logging workers alive.
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

pub fn log_file_path(logs_dir: &Path) -> PathBuf {
    logs_dir.join(LOG_FILE_NAME)
}

fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

pub fn init(mode: LogMode, verbose: bool) -> Result<Option<LoggingGuards>> {
    let filter = filter(verbose);

    match mode {
        LogMode::Cli => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
            Ok(None)
        }
        LogMode::Daemon { data_directory } => {
            let writer = FileRotate::new(
                log_file_path(&data_directory.logs_dir),
                AppendCount::new(MAX_ROTATED_LOGS),
                ContentLimit::Bytes(MAX_LOG_BYTES),
                Compression::OnRotate(1),
                None,
            );

            let (file_non_blocking, file_guard) = tracing_appender::non_blocking(writer);
            // The host may never drain our stderr; drop lines past the buffer limit.
            let (stderr_non_blocking, stderr_guard) = NonBlockingBuilder::default()
                .lossy(true)
                .buffered_lines_limit(10_000)
                .finish(std::io::stderr());

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(
                    file_non_blocking
                        .with_max_level(tracing::Level::INFO)
                        .and(stderr_non_blocking),
                )
                .with_ansi(false)
                .json()
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

            Ok(Some(LoggingGuards {
                _guards: vec![file_guard, stderr_guard],
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_lives_in_logs_dir() {
        let temp_dir = TempDir::new().unwrap();
        let data_directory = DataDirectory::new(temp_dir.path().to_path_buf()).unwrap();

        let path = log_file_path(&data_directory.logs_dir);

        assert_eq!(path, temp_dir.path().join("logs").join("reasoner.log"));
    }

    #[test]
    fn test_verbose_forces_debug() {
        assert_eq!(filter(true).to_string(), "debug");
    }
}
