// Application state module
// Everything a connection task needs, shared behind one Arc

use super::types::Config;
use crate::handler::{Dispatcher, DispatcherOptions};

/// Application state
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub keep_alive: bool,
    /// Access log format, `None` when access logging is off
    pub access_log_format: Option<String>,
}

impl AppState {
    pub fn new(config: &Config, options: DispatcherOptions) -> Self {
        Self {
            dispatcher: Dispatcher::new(options),
            keep_alive: config.server.keep_alive,
            access_log_format: config
                .logging
                .access_log
                .then(|| config.logging.access_log_format.clone()),
        }
    }
}
