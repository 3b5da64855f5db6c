//! File-based logging
//!
//! The TUI owns the terminal, so tracing output goes to a daily-rotated
//! file under the user cache directory instead of stderr.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "tubetui.log";

/// Filter used when neither RUST_LOG nor the config sets one
pub const DEFAULT_FILTER: &str = "tubetui=info,warn";

/// Directory log files are written to (~/.cache/tubetui)
pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tubetui")
}

/// Pick the filter directive: RUST_LOG, then config, then the default
pub fn filter_directive(configured: Option<&str>) -> String {
    std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| configured.map(str::to_string).filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Initialize the logging system.
///
/// Logs are written to `~/.cache/tubetui/tubetui.log.YYYY-MM-DD`. The
/// returned guard flushes the writer when dropped, so `main` must hold it.
pub fn init_logging(configured_filter: Option<&str>) -> anyhow::Result<WorkerGuard> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let directive = filter_directive(configured_filter);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(dir = %dir.display(), filter = %directive, "logging initialized");
    Ok(guard)
}
