//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Default request body limit (10 MiB).
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"127.0.0.1"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `APP_MODE`: mode reported by `GET /` (default: `"development"`)
/// - `CATALOG_SEED_PATH`: JSON product seed; bundled catalog when unset
/// - `MAX_REQUEST_BYTES`: request body limit (default: 10 MiB)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub mode: String,
    pub seed_path: Option<PathBuf>,
    pub max_request_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            mode: lookup("APP_MODE").unwrap_or(defaults.mode),
            seed_path: lookup("CATALOG_SEED_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            max_request_bytes: lookup("MAX_REQUEST_BYTES")
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_request_bytes),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            mode: "development".to_string(),
            seed_path: None,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}
