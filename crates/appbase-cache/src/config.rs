//! Redis cache configuration.
//!
//! This module provides configuration for the Redis connection and the
//! default entry lifetime, loaded from environment variables.

use std::env;
use std::time::Duration;

/// Redis cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `REDIS_HOST`: Redis server host (default: `localhost`)
/// - `REDIS_PORT`: Redis server port (default: `6379`)
/// - `REDIS_DB`: Redis database index (default: `0`)
/// - `CACHE_DEFAULT_TTL`: Default TTL for cached items in seconds (default: `3600`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Redis server hostname or IP address.
    pub host: String,

    /// Redis server port.
    pub port: u16,

    /// Redis logical database index.
    pub db: i64,

    /// Lifetime applied to scalar and structured entries when the caller
    /// gives no TTL.
    pub default_ttl_seconds: u64,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values fall back to the defaults, as does a zero
    /// `CACHE_DEFAULT_TTL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("REDIS_HOST").unwrap_or(defaults.host),
            port: env::var("REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            db: env::var("REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db),
            default_ttl_seconds: positive_secs(env::var("CACHE_DEFAULT_TTL").ok())
                .unwrap_or(defaults.default_ttl_seconds),
        }
    }

    /// Build the connection URL, e.g. `redis://localhost:6379/0`.
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}

fn positive_secs(raw: Option<String>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse().ok()).filter(|secs| *secs > 0)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 6379,
            db: 0,
            default_ttl_seconds: 3600,
        }
    }
}
