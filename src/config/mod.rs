//! Application settings.
//!
//! [`Settings`] gathers everything the service needs at startup:
//!
//! - [`AppSettings`] and [`LogSettings`] from the TOML config file
//! - [`CorsConfig`] from `ALLOWED_*` / `IS_ALLOWED_CREDENTIALS`
//! - [`CacheConfig`] from `REDIS_*` / `CACHE_DEFAULT_TTL`
//! - any extra top-level tables of the config file
//!
//! # Example
//!
//! ```ignore
//! use appbase::config::Settings;
//!
//! let settings = Settings::load("config.toml")?;
//! println!("{} listening on {}", settings.app.project_name, settings.app.bind_address());
//! ```

use std::path::Path;

use appbase_cache::CacheConfig;
use appbase_config::{AppSettings, ConfigError, ConfigFile, CorsConfig, LogSettings};

#[derive(Clone, Debug)]
pub struct Settings {
    pub app: AppSettings,
    pub log: LogSettings,
    pub cors: CorsConfig,
    pub cache: CacheConfig,
    /// Config file tables with no dedicated settings type.
    pub extra: toml::Table,
}

impl Settings {
    /// Loads the config file at `path` and the environment-driven settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = ConfigFile::load(path)?;
        Ok(Self::from_file(file))
    }

    /// Combines an already parsed config file with environment settings.
    pub fn from_file(file: ConfigFile) -> Self {
        Self {
            app: file.app,
            log: file.log,
            cors: CorsConfig::from_env(),
            cache: CacheConfig::from_env(),
            extra: file.extra,
        }
    }
}
