// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub icons: IconsConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Deployment prefix stripped from every request path before parsing,
    /// so routing is independent of where the service is mounted.
    pub mount_path: String,
}

/// Cache configuration
///
/// Loaded once at startup, never mutated. Drives both the outgoing
/// `Cache-Control` header and the `If-Modified-Since` short-circuit window.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Cache time in seconds (`max-age`)
    pub ttl: u64,
    /// Minimum cache refresh time in seconds; 0 omits the `min-refresh` token
    pub min_refresh: u64,
    /// True if cache is private. Used in the Cache-Control response header
    pub private: bool,
}

/// Icon collection locations for the filesystem resolver
#[derive(Debug, Deserialize, Clone)]
pub struct IconsConfig {
    /// True if the premade icon collections should be served
    pub serve_default_icons: bool,
    /// Directory holding the premade collections
    pub default_icons_dir: String,
    /// Directories with json files for custom icon sets
    pub custom_icons_dirs: Vec<String>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Fixed external URL the empty path redirects to
    pub home_redirect: String,
    /// Product label used in the version banner
    pub product_name: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    #[serde(default)]
    pub access_log_file: Option<String>,
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}
