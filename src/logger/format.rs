//! Access log format module
//!
//! Supports two formats:
//! - `common` (Common Log Format plus request time)
//! - `json` (one JSON object per line)

use chrono::{DateTime, Local};
use serde::Serialize;

/// Access log entry for one completed request
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    /// Client socket address
    pub remote_addr: String,
    /// Request timestamp
    pub time: DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI (path and query)
    pub uri: String,
    /// HTTP version (HTTP/1.1)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: u64,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new entry stamped with the current time
    pub fn new(remote_addr: String, method: String, uri: String, http_version: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            uri,
            http_version,
            status: 200,
            body_bytes: 0,
            request_time_us: 0,
        }
    }

    /// Format the entry; unknown formats fall back to `common`
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            _ => self.format_common(),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent $request_time_us`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} {}\" {} {} {}us",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.uri,
            self.http_version,
            self.status,
            self.body_bytes,
            self.request_time_us,
        )
    }

    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}
