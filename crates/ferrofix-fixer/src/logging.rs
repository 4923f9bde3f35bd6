//! Logging setup
//!
//! The library only emits `tracing` events. Embedders that want them
//! printed call [`init_logger`] once at startup, optionally with a log file.
//! Verbosity follows `RUST_LOG`, e.g. `RUST_LOG=ferrofix_fixer=debug`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_FILTER: &str = "ferrofix_core=info,ferrofix_fixer=info";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Local wall clock timestamps
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// Install the global subscriber.
///
/// Events go to stderr, or to `log_path` (truncated) when given. Calling it
/// again once a subscriber is installed does nothing.
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = match log_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
            Some(
                fmt::layer()
                    .with_timer(LocalTime)
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = log_path.is_none().then(|| {
        fmt::layer()
            .with_timer(LocalTime)
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();
    if !installed {
        tracing::debug!("a global subscriber is already installed");
    }
    Ok(())
}
