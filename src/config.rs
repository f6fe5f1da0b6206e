//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::cache::{CacheOptions, Ttl, DEFAULT_TIMEOUT_SECS};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Object store URL (`s3://bucket/root`, `file:///path`, `memory://`)
    pub store_url: String,
    /// Global prefix for every storage path
    pub key_prefix: Option<String>,
    /// Version used when a request does not pass one
    pub version: Option<u64>,
    /// Timeout applied when a request does not pass one
    pub default_timeout: Ttl,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_STORE_URL` - Object store URL (default: `memory://`)
    /// - `CACHE_KEY_PREFIX` - Global key prefix (default: none)
    /// - `CACHE_VERSION` - Default key version (default: none)
    /// - `DEFAULT_TIMEOUT` - Seconds, or `none` for persistent (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            store_url: env::var("CACHE_STORE_URL").unwrap_or_else(|_| "memory://".to_string()),
            key_prefix: env::var("CACHE_KEY_PREFIX")
                .ok()
                .map(|v| v.trim_matches('/').to_string())
                .filter(|v| !v.is_empty()),
            version: env::var("CACHE_VERSION").ok().and_then(|v| v.parse().ok()),
            default_timeout: env::var("DEFAULT_TIMEOUT")
                .ok()
                .and_then(|v| parse_timeout(&v))
                .unwrap_or(Ttl::Seconds(DEFAULT_TIMEOUT_SECS)),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Cache settings derived from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            key_prefix: self.key_prefix.clone(),
            version: self.version,
            default_timeout: self.default_timeout,
        }
    }
}

/// Parses `DEFAULT_TIMEOUT`: `none` means persistent, negatives clamp to zero.
fn parse_timeout(raw: &str) -> Option<Ttl> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") {
        return Some(Ttl::Persistent);
    }
    raw.parse::<i64>()
        .ok()
        .map(|seconds| Ttl::Seconds(seconds.max(0) as u64))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: "memory://".to_string(),
            key_prefix: None,
            version: None,
            default_timeout: Ttl::Seconds(DEFAULT_TIMEOUT_SECS),
            server_port: 3000,
        }
    }
}
