//! Logger module
//!
//! Provides logging utilities for the debug server including:
//! - Server lifecycle logging
//! - Access logging in `common` or `json` format
//! - Error and warning logging, optionally to a file
//!
//! Request dumps are not routed through here; they go to the dispatcher's
//! dump sink.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use crate::handler::DispatcherOptions;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(config.logging.error_log_file.as_deref())
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, options: &DispatcherOptions) {
    write_info("======================================");
    write_info("CORS debug server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!(
        "Request dumps: {}",
        match (options.debug_enabled(), config.logging.dump_file.as_deref()) {
            (false, _) => "off",
            (true, None) => "stdout",
            (true, Some(path)) => path,
        }
    ));
    if config.logging.access_log {
        write_info(&format!("Access log format: {}", config.logging.access_log_format));
    }
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("CORS: allow any origin (development only)");
    write_info("======================================\n");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_shutdown() {
    write_info("\n[Shutdown] Signal received, no longer accepting connections");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
