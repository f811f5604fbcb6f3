//! # Appbase Cache
//!
//! Redis-backed caching for the Appbase API.
//!
//! This crate provides:
//! - Typed cache values: structured JSON, sets and scalars ([`CacheValue`])
//! - Cache operations (get, set, get-or-compute, prefix key discovery)
//! - Function-result memoization keyed off bound call arguments
//! - Cache configuration from environment variables
//! - A lazily connecting Redis store and an in-memory store for tests
//!
//! # Example
//!
//! ```ignore
//! use appbase_cache::{CacheConfig, KeyValueCache, ValueKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), appbase_cache::CacheError> {
//!     let cache = KeyValueCache::connect(&CacheConfig::from_env())?;
//!
//!     // Set a value
//!     cache.set("user:1", serde_json::json!({"name": "Ada"}), None).await?;
//!
//!     // Get a value
//!     let user = cache.get("user:1", ValueKind::Map).await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod memoize;
pub mod memory;
pub mod redis;
pub mod store;
pub mod value;

pub use cache::KeyValueCache;
pub use config::CacheConfig;
pub use error::CacheError;
pub use keys::{BoundArgs, CallArgs, Signature, derive_key};
pub use memoize::{Memoize, Memoized};
pub use memory::{MemoryStore, StoreCall};
pub use redis::RedisStore;
pub use store::KeyValueStore;
pub use value::{CacheValue, IntoCacheValue, Json, ValueKind};
