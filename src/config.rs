//! Application configuration loaded from environment variables.
//!
//! The core only needs to know where the local cache lives and which key
//! prefix namespaces its entries; everything else is wired by the caller.

use std::env;
use std::path::PathBuf;

/// Default namespace prefix for local cache entries.
const DEFAULT_CACHE_PREFIX: &str = "portfolio_";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the local cache files
    pub cache_dir: PathBuf,
    /// Key prefix namespacing cache entries
    pub cache_prefix: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            cache_dir: std::env::temp_dir().join("portfolio-builder-cache"),
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `PORTFOLIO_CACHE_DIR` overrides the cache location; the prefix is
    /// rarely changed but `PORTFOLIO_CACHE_PREFIX` is honored for tests
    /// running against a shared directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let cache_dir = match env::var("PORTFOLIO_CACHE_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => dirs_fallback(),
        };

        let cache_prefix = env::var("PORTFOLIO_CACHE_PREFIX")
            .unwrap_or_else(|_| DEFAULT_CACHE_PREFIX.to_string());

        if cache_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("PORTFOLIO_CACHE_PREFIX"));
        }

        Ok(Self {
            cache_dir,
            cache_prefix,
        })
    }
}

/// Cache location when no override is set: a dot-directory under the user's
/// home, or the current directory when HOME is unset.
fn dirs_fallback() -> PathBuf {
    match env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(".portfolio-builder"),
        _ => PathBuf::from(".portfolio-builder"),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
