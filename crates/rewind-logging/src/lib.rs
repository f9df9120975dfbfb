//! # rewind-logging
//!
//! Structured logging with `tracing` for the rewind host.
//!
//! The filter resolves as `REWIND_LOG` env var first, then the configured
//! default. Output goes to stderr, or to a file when one is configured, so
//! that host logs never interleave with a shell-mode terminal.

#![deny(unsafe_code)]

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `default_filter` is used when `REWIND_LOG` is unset or empty. When
/// `log_file` is given, output is appended there instead of stderr.
/// Returns an error message if a log file cannot be opened; the caller
/// decides whether that is fatal.
///
/// Must be called at most once per process; later calls are ignored by
/// `try_init` and reported as `Err`.
pub fn init(default_filter: &str, log_file: Option<&Path>) -> Result<(), String> {
    let filter = EnvFilter::try_from_env("REWIND_LOG")
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("cannot open log file {}: {e}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| e.to_string())?;
    info!(file = ?log_file, "logging initialized");
    Ok(())
}
