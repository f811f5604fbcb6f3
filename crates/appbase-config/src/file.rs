//! TOML configuration file loading.
//!
//! The file holds an `[app_settings]` table, an optional `[log_settings]`
//! table and any number of extra top-level entries, which are kept verbatim
//! for application code:
//!
//! ```toml
//! [app_settings]
//! project_name = "Base API"
//! host = "0.0.0.0"
//! port = 8000
//!
//! [log_settings]
//! level = "DEBUG"
//!
//! [feature_flags]
//! beta = true
//! ```
//!
//! `LOCAL_HOST` and `LOCAL_PORT` override `app_settings.host` / `port`.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml::{Table, Value};
use tracing::debug;

use crate::{AppSettings, LogSettings};

const APP_TABLE: &str = "app_settings";
const LOG_TABLE: &str = "log_settings";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    InvalidOverride { var: &'static str, value: String },
}

/// Environment overrides applied on top of the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub host: Option<String>,
    pub port: Option<String>,
}

impl EnvOverrides {
    /// Reads `LOCAL_HOST` and `LOCAL_PORT`. Empty values are ignored.
    pub fn from_env() -> Self {
        Self {
            host: env::var("LOCAL_HOST").ok().filter(|v| !v.is_empty()),
            port: env::var("LOCAL_PORT").ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Parsed contents of the configuration file.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigFile {
    pub app: AppSettings,
    pub log: LogSettings,
    /// Top-level entries other than the known tables.
    pub extra: Table,
}

impl ConfigFile {
    /// Reads and parses the file at `path`, applying environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(config.path = %path.display(), "Loaded config file");

        Self::parse(&text, &EnvOverrides::from_env())
    }

    /// Parses configuration text with the given overrides.
    pub fn parse(text: &str, overrides: &EnvOverrides) -> Result<Self, ConfigError> {
        let mut root: Table = text.parse()?;

        let mut app_table = match root.remove(APP_TABLE) {
            Some(Value::Table(table)) => table,
            Some(_) | None => Table::new(),
        };
        if let Some(host) = &overrides.host {
            app_table.insert("host".into(), Value::String(host.clone()));
        }
        if let Some(port) = &overrides.port {
            let port: i64 = port.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                var: "LOCAL_PORT",
                value: port.clone(),
            })?;
            app_table.insert("port".into(), Value::Integer(port));
        }
        let app: AppSettings = Value::Table(app_table).try_into()?;

        let log: LogSettings = match root.remove(LOG_TABLE) {
            Some(value) => value.try_into()?,
            None => LogSettings::default(),
        };

        Ok(Self {
            app,
            log,
            extra: root,
        })
    }
}
