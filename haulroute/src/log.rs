//! Tracing initialization helpers.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! the embedding application's call. These helpers cover the two common
//! setups: stderr logging filtered by `RUST_LOG`, and the same with a
//! daily-rolling log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a stderr subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Install a subscriber writing to a daily-rolling file in `dir`.
///
/// The returned guard must be held for the process lifetime; dropping it
/// stops the background writer and loses buffered lines.
pub fn init_logging_with_file(dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(dir, "haulroute.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    guard
}
