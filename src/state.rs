use std::sync::Arc;

use appbase_cache::{CacheError, KeyValueCache};

use crate::config::Settings;

#[derive(Clone, Debug)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub cache: KeyValueCache,
}

impl AppState {
    pub fn new(settings: Settings, cache: KeyValueCache) -> Self {
        Self {
            settings: Arc::new(settings),
            cache,
        }
    }

    /// Builds the state with a Redis-backed cache.
    ///
    /// The Redis connection is opened on first use, so this succeeds while
    /// Redis is still starting up.
    pub fn from_settings(settings: Settings) -> Result<Self, CacheError> {
        let cache = KeyValueCache::connect(&settings.cache)?;
        Ok(Self::new(settings, cache))
    }
}
