//! Backing store abstraction.
//!
//! [`KeyValueCache`](crate::KeyValueCache) only ever talks to the store through
//! these primitives, so any server offering string set-with-expiry, string get,
//! set add/members, key expiry and pattern scan can back the cache.

use async_trait::async_trait;

use crate::CacheError;

/// Primitive operations of a remote key-value store.
///
/// Implementations must be safe to share between concurrent callers; the
/// cache adds no locking of its own. Each method is one store round trip and
/// is atomic only as far as the store makes that single command atomic.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Stores a string entry that expires after `ttl_secs` (Redis `SETEX`).
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;

    /// Reads a string entry (Redis `GET`). `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Removes a key of any type (Redis `DEL`). Absent keys are not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Adds members to a set entry (Redis `SADD`). `members` is never empty.
    async fn sadd(&self, key: &str, members: &[String]) -> Result<(), CacheError>;

    /// Sets an expiry on an existing key (Redis `EXPIRE`).
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), CacheError>;

    /// Reads all members of a set entry (Redis `SMEMBERS`). Empty when absent.
    async fn smembers(&self, key: &str) -> Result<Vec<Vec<u8>>, CacheError>;

    /// Lists every key matching a glob-style pattern (Redis `SCAN MATCH`).
    async fn scan_match(&self, pattern: &str) -> Result<Vec<String>, CacheError>;
}
