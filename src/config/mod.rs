// Configuration module entry point
// Manages application configuration, runtime state, and region detection

pub mod region;
mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    CacheConfig, Config, HttpConfig, IconsConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

impl Config {
    /// Load configuration from the default file path
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; every setting has a default, and any value can
    /// be overridden through `ICONCDN_`-prefixed environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("ICONCDN"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.mount_path", "/")?
            .set_default("cache.ttl", 604_800)? // one week
            .set_default("cache.min_refresh", 86_400)? // one day
            .set_default("cache.private", false)?
            .set_default("icons.serve_default_icons", true)?
            .set_default("icons.default_icons_dir", "icons")?
            .set_default("icons.custom_icons_dirs", vec!["json".to_string()])?
            .set_default("http.home_redirect", "https://simplesvg.com/")?
            .set_default("http.product_name", "SimpleSVG CDN")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
