//! Logger module
//!
//! Wires the `log` facade to the writer backend and provides the
//! per-request access log.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use log::LevelFilter;
use std::io;
use std::net::SocketAddr;
use std::str::FromStr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> io::Result<()> {
    let level = LevelFilter::from_str(&config.logging.level).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unknown log level '{}'", config.logging.level),
        )
    })?;

    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log::info!("listening on http://{addr}");
    log::info!("log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        log::info!("worker threads: {workers}");
    }
    match &config.storage.snapshot_path {
        Some(path) => log::info!("document store: memory, snapshot at {path}"),
        None => log::info!("document store: memory only (nothing is persisted)"),
    }
    if let Some(ref path) = config.logging.access_log_file {
        log::info!("access log: {path}");
    }
    if let Some(ref path) = config.logging.error_log_file {
        log::info!("error log: {path}");
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log::error!("failed to serve connection: {err:?}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
