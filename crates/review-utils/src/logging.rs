//! Logging and tracing utilities

use crate::clock::beijing_today;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing subscriber with default configuration
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn daily_log_name() -> String {
    format!("report_{}.log", beijing_today().format("%Y-%m-%d"))
}

/// Path of today's log file inside `log_dir`
pub fn daily_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(daily_log_name())
}

/// Initialize tracing with console output plus an appending daily log file
///
/// Returns the log file path and the guard of the background writer. Keep
/// the guard alive until exit or buffered lines are lost.
pub fn init_tracing_with_file(log_dir: &Path) -> anyhow::Result<(PathBuf, WorkerGuard)> {
    let appender = Builder::new()
        .rotation(Rotation::NEVER)
        .filename_prefix(daily_log_name())
        .build(log_dir)
        .with_context(|| format!("failed to open log file in {}", log_dir.display()))?;
    let (writer, guard) = non_blocking(appender);

    tracing_subscriber::registry()
        .with(default_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .context("tracing subscriber already initialized")?;

    Ok((daily_log_path(log_dir), guard))
}
