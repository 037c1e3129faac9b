// Configuration module entry point
// Layers built-in defaults, an optional config.toml and DEVSERVER_* variables

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::Config;

use crate::handler::{DispatcherOptions, DumpSink};

/// Default config file (extension resolved by the `config` crate)
const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from `config.toml` in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path
    ///
    /// A missing file is not an error: the defaults reproduce the plain
    /// "debug server on port 3000" behaviour.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.keep_alive", true)?
            .set_default("logging.debug", true)?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "common")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Translate the logging section into dispatcher options
    pub fn dispatcher_options(&self) -> std::io::Result<DispatcherOptions> {
        let mut options = DispatcherOptions::new();
        if self.logging.debug {
            options = options.enable_debug_logging();
        }
        if let Some(ref path) = self.logging.dump_file {
            options = options.dump_to(DumpSink::file(path)?);
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cors-debug-server-{}-{name}.toml",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely/not/here/config").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.server.workers.is_none());
        assert!(cfg.server.keep_alive);
        assert!(cfg.logging.debug);
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.logging.dump_file.is_none());
        assert!(cfg.logging.error_log_file.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = temp_config(
            "override",
            "[server]\nhost = \"127.0.0.1\"\nport = 4000\nworkers = 2\n\n[logging]\ndebug = false\naccess_log = true\naccess_log_format = \"json\"\n",
        );
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.server.workers, Some(2));
        assert!(cfg.server.keep_alive);
        assert!(!cfg.logging.debug);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "json");
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("definitely/not/here/config").unwrap();
        assert_eq!(
            cfg.socket_addr().unwrap(),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );

        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }

    #[test]
    fn test_app_state_access_log_format() {
        let mut cfg = Config::load_from("definitely/not/here/config").unwrap();
        let state = AppState::new(&cfg, DispatcherOptions::new());
        assert!(state.access_log_format.is_none());
        assert!(state.keep_alive);

        cfg.logging.access_log = true;
        cfg.logging.access_log_format = "json".to_string();
        let state = AppState::new(&cfg, DispatcherOptions::new());
        assert_eq!(state.access_log_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_dispatcher_options_follow_debug_flag() {
        let mut cfg = Config::load_from("definitely/not/here/config").unwrap();
        assert!(cfg.dispatcher_options().unwrap().debug_enabled());

        cfg.logging.debug = false;
        assert!(!cfg.dispatcher_options().unwrap().debug_enabled());
    }
}
