// Configuration types module
// Defines the startup configuration read once before the listener is bound

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads (CPU cores when unset)
    #[serde(default)]
    pub workers: Option<usize>,
    pub keep_alive: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Dump every request (headers and body) before answering it
    pub debug: bool,
    /// Request dump file path (optional, stdout if not set)
    #[serde(default)]
    pub dump_file: Option<String>,
    pub access_log: bool,
    /// Access log format (common or json)
    pub access_log_format: String,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}
