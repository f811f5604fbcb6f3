//! # Appbase
//!
//! A base HTTP service built with Axum, with a Redis-backed key-value cache.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── config/       # Settings aggregation (file + environment)
//! ├── middleware/   # Panic-to-JSON handling
//! ├── modules/
//! │   └── base/    # Welcome route and cache key inspection
//! └── utils/       # Shared utilities (errors)
//! ```
//!
//! Workspace crates:
//!
//! - [`appbase_cache`]: the cache, its stores and memoization
//! - [`appbase_config`]: settings types and config file loading
//! - [`appbase_observability`]: logging setup and request timing
//!
//! ## Configuration
//!
//! ```toml
//! [app_settings]
//! project_name = "Base API"
//! host = "0.0.0.0"
//! port = 8000
//!
//! [log_settings]
//! level = "INFO"
//! ```
//!
//! Redis is configured with `REDIS_HOST`, `REDIS_PORT`, `REDIS_DB` and
//! `CACHE_DEFAULT_TTL`; CORS with `ALLOWED_ORIGINS`, `ALLOWED_METHODS`,
//! `ALLOWED_HEADERS` and `IS_ALLOWED_CREDENTIALS`.
//!
//! ## API Documentation
//!
//! - Swagger UI: `docs_url` (default `/docs`), document at `openapi_url`
//! - Scalar: `redoc_url` (default `/redoc`)

pub mod config;
pub mod docs;
pub mod events;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;

// Re-export workspace crates for convenience
pub use appbase_cache;
pub use appbase_config;
pub use appbase_observability;
