//! # Appbase Config
//!
//! Configuration types for the Appbase API.
//!
//! - [`app`]: core application settings (`[app_settings]`)
//! - [`logging`]: console and file logging settings (`[log_settings]`)
//! - [`file`]: TOML config file loading with environment overrides
//! - [`cors`]: CORS configuration from environment variables
//!
//! # Example
//!
//! ```ignore
//! use appbase_config::{ConfigFile, CorsConfig};
//!
//! let config = ConfigFile::load("config.toml")?;
//! let cors = CorsConfig::from_env();
//! println!("listening on {}", config.app.bind_address());
//! ```

pub mod app;
pub mod cors;
pub mod file;
pub mod logging;

pub use app::AppSettings;
pub use cors::CorsConfig;
pub use file::{ConfigError, ConfigFile, EnvOverrides};
pub use logging::{LogSettings, Rotation};
