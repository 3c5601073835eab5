//! Diagnostics log setup

use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Environment, diagnostics_log_name};

/// Install the global subscriber writing to `<log_dir>/fleetscore_<env>.log`.
///
/// The level defaults to `info` and can be overridden with `RUST_LOG`.
/// Buffered records are flushed when the returned guard is dropped.
pub fn init(log_dir: &Path, environment: Environment) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

    let appender = tracing_appender::rolling::never(log_dir, diagnostics_log_name(environment));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(guard)
}
