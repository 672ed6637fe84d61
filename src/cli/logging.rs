//! Logging initialization

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Initialize logging based on debug flag
///
/// Logs go to a temporary file so stdout carries only the report. `level`
/// is the filter used when `RUST_LOG` is unset. Returns the log file path
/// if debug logging is enabled.
pub fn init_logging(debug: bool, level: &str) -> Result<Option<PathBuf>> {
    if !debug {
        return Ok(None);
    }

    let temp_file = tempfile::Builder::new()
        .prefix("kstatus-")
        .suffix(".log")
        .tempfile()
        .map(|f| {
            let path = f.path().to_path_buf();
            // Keep the file once the process exits
            std::mem::forget(f);
            path
        })
        .unwrap_or_else(|_| std::env::temp_dir().join(format!("kstatus-{}.log", std::process::id())));

    let file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&temp_file)
        .with_context(|| format!("Failed to open log file: {}", temp_file.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(Some(temp_file))
}
