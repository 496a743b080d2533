//! Tracing configuration for DailyDrop.
//!
//! Two outputs:
//! - a log file under `<app data>/logs/dailydrop.log`, filtered by
//!   `RUST_LOG` or the default directives
//! - stderr, warnings and errors only, so the terminal stays readable
//!
//! When the file cannot be opened, stderr takes the full filter instead.

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, registry, EnvFilter};

pub const LOG_FILE_NAME: &str = "dailydrop.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=info".to_string(),
        "rustls=warn".to_string(),
    ]
}

fn timer() -> fmt::time::ChronoUtc {
    fmt::time::ChronoUtc::new("%Y-%m-%d %H:%M:%S%.3f".to_string())
}

/// Initialize the global tracing subscriber. Call once, before wiring.
///
/// # Errors
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber(logs_dir: &Path) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives.join(",")));

    match build_file_writer(logs_dir) {
        Ok(writer) => {
            let file_layer = fmt::layer()
                .with_timer(timer())
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            let stderr_layer = fmt::layer()
                .with_timer(timer())
                .with_level(true)
                .with_target(true)
                .with_ansi(cfg!(not(test)))
                .with_writer(io::stderr);
            registry()
                .with(file_layer.with_filter(env_filter))
                .with(stderr_layer.with_filter(LevelFilter::WARN))
                .try_init()?;
        }
        Err(err) => {
            eprintln!("Failed to initialize file logging, logging to stderr only: {err}");
            let stderr_layer = fmt::layer()
                .with_timer(timer())
                .with_level(true)
                .with_target(true)
                .with_ansi(cfg!(not(test)))
                .with_writer(io::stderr);
            registry()
                .with(stderr_layer.with_filter(env_filter))
                .try_init()?;
        }
    }

    Ok(())
}

fn build_file_writer(logs_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
