//! Function-result memoization.
//!
//! [`Memoize`] holds the caching options and turns a target function plus
//! its declared [`Signature`] into a [`Memoized`] callable. Every call binds
//! its arguments, derives a key from them and goes through
//! [`KeyValueCache::get_or_compute`].
//!
//! ```ignore
//! let fetch_user = cache
//!     .memoize()
//!     .ttl(Duration::from_secs(300))
//!     .ignore_params(["verbose"])
//!     .wrap(
//!         Signature::new("fetch_user").required("user_id").optional("verbose", false),
//!         |args: BoundArgs| async move {
//!             let user_id: u64 = args.get("user_id")?;
//!             Ok::<_, CacheError>(json!({"user_id": user_id}))
//!         },
//!     );
//!
//! let user = fetch_user.call(CallArgs::new().arg(123)).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::keys::{BoundArgs, CallArgs, Signature, derive_key};
use crate::{CacheError, CacheValue, IntoCacheValue, KeyValueCache, ValueKind};

/// Memoization options: TTL, expected value kind and ignored parameters.
#[derive(Debug, Clone)]
pub struct Memoize {
    cache: KeyValueCache,
    ttl: Option<Duration>,
    kind: ValueKind,
    ignore_params: Vec<String>,
}

impl Memoize {
    pub fn new(cache: KeyValueCache) -> Self {
        Self {
            cache,
            ttl: None,
            kind: ValueKind::default(),
            ignore_params: Vec::new(),
        }
    }

    /// Lifetime of memoized results. Defaults to the cache's default TTL.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Kind used when reading memoized results back. Defaults to [`ValueKind::Map`].
    pub fn expected(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Parameters left out of the derived key.
    pub fn ignore_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Wraps `target`, whose parameters are described by `signature`.
    pub fn wrap<F>(self, signature: Signature, target: F) -> Memoized<F> {
        Memoized {
            options: self,
            signature,
            target,
        }
    }
}

/// A target function wrapped with read-through caching.
#[derive(Debug, Clone)]
pub struct Memoized<F> {
    options: Memoize,
    signature: Signature,
    target: F,
}

impl<F> Memoized<F> {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Derives the cache key `args` map to, without calling anything.
    pub fn key_for(&self, args: &CallArgs) -> Result<String, CacheError> {
        let bound = self.signature.bind(args)?;
        Ok(derive_key(&self.signature, &bound, &self.options.ignore_params))
    }

    /// Returns the cached result for `args`, calling the target on a miss.
    ///
    /// # Errors
    ///
    /// A binding failure is reported before the cache is consulted. Target
    /// and cache errors propagate unchanged.
    pub async fn call<Fut, V, E>(&self, args: CallArgs) -> Result<CacheValue, E>
    where
        F: Fn(BoundArgs) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        V: IntoCacheValue,
        E: From<CacheError>,
    {
        let bound = self.signature.bind(&args)?;
        let key = derive_key(&self.signature, &bound, &self.options.ignore_params);
        debug!(cache.key = %key, function = %self.signature.name(), "Memoized call");

        self.options
            .cache
            .get_or_compute(
                &key,
                || (self.target)(bound),
                false,
                self.options.ttl,
                self.options.kind,
            )
            .await
    }
}
