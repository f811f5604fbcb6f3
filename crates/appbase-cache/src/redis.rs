//! Redis implementation of [`KeyValueStore`].
//!
//! The connection is established lazily on the first command, so building a
//! [`RedisStore`] never fails because the server is down; that failure is
//! reported by the first operation instead.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{CacheConfig, CacheError, KeyValueStore};

/// Number of keys requested per `SCAN` round trip.
const SCAN_BATCH: usize = 100;

/// Redis-backed store with a lazily created, auto-reconnecting connection.
pub struct RedisStore {
    client: Client,
    conn: OnceCell<ConnectionManager>,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("addr", &self.client.get_connection_info().addr)
            .field("connected", &self.conn.initialized())
            .finish()
    }
}

impl RedisStore {
    /// Creates a store for the given Redis URL without connecting.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL cannot be parsed.
    pub fn open(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;

        Ok(Self {
            client,
            conn: OnceCell::new(),
        })
    }

    /// Creates a store from host, port and database index.
    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        Self::open(&config.redis_url())
    }

    async fn conn(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let manager = ConnectionManager::new(self.client.clone()).await?;
                info!(redis.addr = %self.client.get_connection_info().addr, "Connected to Redis");
                Ok::<_, redis::RedisError>(manager)
            })
            .await?;

        Ok(conn.clone())
    }
}

fn expiry_secs(ttl_secs: u64) -> i64 {
    i64::try_from(ttl_secs).unwrap_or(i64::MAX)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn().await?;
        Ok(conn.get(key).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn sadd(&self, key: &str, members: &[String]) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.sadd::<_, _, ()>(key, members.to_vec()).await?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.expire::<_, ()>(key, expiry_secs(ttl_secs)).await?;
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<Vec<u8>>, CacheError> {
        let mut conn = self.conn().await?;
        Ok(conn.smembers(key).await?)
    }

    async fn scan_match(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn().await?;
        let mut cursor: u64 = 0;
        let mut found = Vec::new();

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            found.extend(keys);

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(cache.pattern = %pattern, cache.matched = found.len(), "Pattern scan complete");

        Ok(found)
    }
}
