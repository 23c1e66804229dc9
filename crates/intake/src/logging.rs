use std::path::Path;

use color_eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE: &str = "intake.log";

/// File layer (non-blocking, no ANSI) plus a console layer on stderr.
///
/// The returned guard flushes the file writer on drop and has to live until
/// the process exits.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::default()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(env_filter());

    // stdout is reserved for command output
    let console_layer = fmt::Layer::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(guard)
}

fn env_filter() -> EnvFilter {
    #[cfg(debug_assertions)]
    let default = "info";
    #[cfg(not(debug_assertions))]
    let default = "warn";

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
