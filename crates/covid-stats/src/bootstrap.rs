use std::path::PathBuf;

use covid_core::config::AppConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the output directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing
/// parents): the output base, `reports/`, `exports/`, `graphics/` and the
/// store directory.
pub fn ensure_directories(config: &AppConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(config.output_base())?;
    std::fs::create_dir_all(config.reports_dir())?;
    std::fs::create_dir_all(config.exports_dir())?;
    std::fs::create_dir_all(config.graphics_dir())?;
    if let Some(store_dir) = config.store_path().parent() {
        std::fs::create_dir_all(store_dir)?;
    }
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
///
/// The `log_file` parameter is accepted for forward-compatibility but file
/// logging is not yet wired; all output currently goes to stderr.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
