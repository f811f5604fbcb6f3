//! Read-through key-value cache.
//!
//! Provides typed get/set over a [`KeyValueStore`], the get-or-compute
//! pattern and prefix-based key discovery.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::memoize::Memoize;
use crate::value::Encoded;
use crate::{
    CacheConfig, CacheError, CacheValue, IntoCacheValue, KeyValueStore, RedisStore, ValueKind,
};

/// Cache handle. Cloning is cheap and clones share the same store.
#[derive(Clone)]
pub struct KeyValueCache {
    store: Arc<dyn KeyValueStore>,
    default_ttl: Duration,
}

impl std::fmt::Debug for KeyValueCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValueCache")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl KeyValueCache {
    /// Creates a cache over the given store.
    pub fn new(store: impl KeyValueStore, default_ttl: Duration) -> Self {
        Self::from_shared(Arc::new(store), default_ttl)
    }

    /// Creates a cache over a store that is also held elsewhere.
    pub fn from_shared(store: Arc<dyn KeyValueStore>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// Creates a Redis-backed cache from configuration.
    ///
    /// No connection is made here; connection failures surface on first use.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the configuration does not form a
    /// valid Redis URL.
    pub fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let store = RedisStore::from_config(config)?;
        Ok(Self::new(store, config.default_ttl()))
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Stores a value, replacing any existing entry under `key`.
    ///
    /// Structured and scalar values are written with `ttl`, or the default
    /// TTL when `ttl` is `None` or zero. Sub-second remainders round up to
    /// the next whole second. Sets are written member by member and only
    /// expire when `ttl` is given; the expiry is a separate store command,
    /// so a reader may briefly observe the set without one.
    ///
    /// # Errors
    ///
    /// `UnsupportedType` if the value cannot be cached (no store command is
    /// issued), `EmptyKey` for an empty key, or `Connection` on store failure.
    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    pub async fn set(
        &self,
        key: &str,
        value: impl IntoCacheValue,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        let value = value.into_cache_value()?;
        let ttl = ttl.filter(|ttl| !ttl.is_zero());

        match value.encode()? {
            Encoded::Text(text) => {
                let ttl_secs = whole_secs(ttl.unwrap_or(self.default_ttl));
                self.store.set_ex(key, &text, ttl_secs).await?;
                debug!(cache.key = %key, cache.ttl_secs = %ttl_secs, "Cache set");
            }
            Encoded::Members(members) => {
                self.store.delete(key).await?;
                if !members.is_empty() {
                    self.store.sadd(key, &members).await?;
                }
                if let Some(ttl) = ttl {
                    self.store.expire(key, whole_secs(ttl)).await?;
                }
                debug!(
                    cache.key = %key,
                    cache.members = members.len(),
                    cache.ttl_secs = ?ttl.map(whole_secs),
                    "Cache set (members)"
                );
            }
        }

        Ok(())
    }

    /// Reads the value stored under `key` as `kind`.
    ///
    /// Returns `None` when the key is absent. Sets never return `None`: an
    /// absent set reads as an empty one, exactly like the store reports it.
    ///
    /// # Errors
    ///
    /// `Deserialization` when the stored text does not decode into `kind`,
    /// or `Connection` on store failure.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get(&self, key: &str, kind: ValueKind) -> Result<Option<CacheValue>, CacheError> {
        if kind == ValueKind::Set {
            let members = self
                .store
                .smembers(key)
                .await?
                .into_iter()
                .map(|raw| String::from_utf8(raw).map_err(|e| CacheError::deserialization(key, e)))
                .collect::<Result<HashSet<_>, _>>()?;
            return Ok(Some(CacheValue::Set(members)));
        }

        let Some(raw) = self.store.get(key).await? else {
            debug!(cache.key = %key, "Cache miss");
            return Ok(None);
        };
        debug!(cache.key = %key, "Cache hit");

        let text = String::from_utf8(raw).map_err(|e| CacheError::deserialization(key, e))?;
        CacheValue::decode(key, kind, &text).map(Some)
    }

    /// Returns the cached value, or computes, stores and returns it.
    ///
    /// With `override_cached` the lookup is skipped and `supplier` always
    /// runs. Concurrent misses on the same key may each run `supplier`; the
    /// last write wins. Supplier errors are returned as-is and nothing is
    /// stored.
    #[instrument(skip(self, supplier), fields(cache.operation = "GET_OR_COMPUTE"))]
    pub async fn get_or_compute<F, Fut, V, E>(
        &self,
        key: &str,
        supplier: F,
        override_cached: bool,
        ttl: Option<Duration>,
        kind: ValueKind,
    ) -> Result<CacheValue, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        V: IntoCacheValue,
        E: From<CacheError>,
    {
        if !override_cached {
            if let Some(cached) = self.get(key, kind).await? {
                return Ok(cached);
            }
        }

        let value = supplier().await?.into_cache_value()?;
        self.set(key, value.clone(), ttl).await?;

        Ok(value)
    }

    /// Starts building a memoizing wrapper bound to this cache.
    pub fn memoize(&self) -> Memoize {
        Memoize::new(self.clone())
    }

    /// Lists every key, of any entry type, that starts with `prefix`.
    ///
    /// Scans the whole keyspace; not meant for very large databases.
    #[instrument(skip(self), fields(cache.operation = "SCAN"))]
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<HashSet<String>, CacheError> {
        let pattern = format!("{}*", escape_glob(prefix));
        let keys = self.store.scan_match(&pattern).await?;

        Ok(keys.into_iter().filter(|key| key.starts_with(prefix)).collect())
    }
}

/// Whole seconds for a store TTL, rounding any sub-second remainder up.
fn whole_secs(ttl: Duration) -> u64 {
    ttl.as_secs().saturating_add(u64::from(ttl.subsec_nanos() > 0))
}

/// Escapes Redis glob metacharacters so `text` matches literally.
fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
