//! Appbase Observability
//!
//! Logging and request timing for the Appbase API:
//! - Console and rolling file logging configured from [`LogSettings`](appbase_config::LogSettings)
//! - Request timing middleware that logs every request and sets `X-Response-Time`
//!
//! # Examples
//!
//! ```no_run
//! use appbase_config::LogSettings;
//! use appbase_observability::init_logging;
//!
//! let _guard = init_logging(&LogSettings::default());
//! tracing::info!("ready");
//! ```

pub mod basic_logging;
pub mod logging;
pub mod timing;

pub use basic_logging::init_basic_console_logging;
pub use logging::init_logging;
pub use timing::{RESPONSE_TIME_HEADER, timing_middleware};
