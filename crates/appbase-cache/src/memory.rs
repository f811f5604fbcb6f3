//! In-process [`KeyValueStore`] with Redis semantics.
//!
//! Useful for tests and for running the application without a Redis server.
//! Entries expire lazily on access. Every primitive call is recorded so tests
//! can assert exactly which store operations a cache operation issued.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{CacheError, KeyValueStore};

/// A single primitive operation received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    SetEx {
        key: String,
        value: String,
        ttl_secs: u64,
    },
    Get {
        key: String,
    },
    Delete {
        key: String,
    },
    SAdd {
        key: String,
        members: Vec<String>,
    },
    Expire {
        key: String,
        ttl_secs: u64,
    },
    SMembers {
        key: String,
    },
    Scan {
        pattern: String,
    },
}

#[derive(Debug)]
enum Data {
    Text(Vec<u8>),
    Set(HashSet<String>),
}

#[derive(Debug)]
struct Entry {
    data: Data,
    ttl_secs: Option<u64>,
    expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    calls: Vec<StoreCall>,
}

impl Inner {
    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| entry.expires_at.is_none_or(|deadline| deadline > now));
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

fn wrong_type() -> CacheError {
    CacheError::Connection(redis::RedisError::from((
        redis::ErrorKind::TypeError,
        "WRONGTYPE Operation against a key holding the wrong kind of value",
    )))
}

/// Expiry instant for a TTL. `None` when it lies beyond what `Instant` can
/// represent, which for any practical purpose means the entry never expires.
fn deadline(ttl_secs: u64) -> Option<Instant> {
    Instant::now().checked_add(Duration::from_secs(ttl_secs))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every primitive call received so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Returns the expiry (in seconds) last applied to a live key.
    ///
    /// `None` when the key is absent or never expires.
    pub fn ttl(&self, key: &str) -> Option<u64> {
        let mut inner = self.inner.lock();
        inner.purge_expired();
        inner.entries.get(key).and_then(|entry| entry.ttl_secs)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();
        inner.purge_expired();
        inner.entries.contains_key(key)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::SetEx {
            key: key.to_string(),
            value: value.to_string(),
            ttl_secs,
        });
        inner.entries.insert(
            key.to_string(),
            Entry {
                data: Data::Text(value.as_bytes().to_vec()),
                ttl_secs: Some(ttl_secs),
                expires_at: deadline(ttl_secs),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Get {
            key: key.to_string(),
        });
        inner.purge_expired();
        match inner.entries.get(key) {
            Some(Entry {
                data: Data::Text(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(wrong_type()),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Delete {
            key: key.to_string(),
        });
        inner.entries.remove(key);
        Ok(())
    }

    async fn sadd(&self, key: &str, members: &[String]) -> Result<(), CacheError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::SAdd {
            key: key.to_string(),
            members: members.to_vec(),
        });
        inner.purge_expired();
        let entry = inner.entries.entry(key.to_string()).or_insert_with(|| Entry {
            data: Data::Set(HashSet::new()),
            ttl_secs: None,
            expires_at: None,
        });
        match &mut entry.data {
            Data::Set(set) => {
                set.extend(members.iter().cloned());
                Ok(())
            }
            Data::Text(_) => Err(wrong_type()),
        }
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Expire {
            key: key.to_string(),
            ttl_secs,
        });
        inner.purge_expired();
        if let Some(entry) = inner.entries.get_mut(key) {
            entry.ttl_secs = Some(ttl_secs);
            entry.expires_at = deadline(ttl_secs);
        }
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<Vec<u8>>, CacheError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::SMembers {
            key: key.to_string(),
        });
        inner.purge_expired();
        match inner.entries.get(key) {
            Some(Entry {
                data: Data::Set(set),
                ..
            }) => Ok(set.iter().map(|m| m.as_bytes().to_vec()).collect()),
            Some(_) => Err(wrong_type()),
            None => Ok(Vec::new()),
        }
    }

    async fn scan_match(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Scan {
            pattern: pattern.to_string(),
        });
        inner.purge_expired();
        Ok(inner
            .entries
            .keys()
            .filter(|key| glob_match(pattern.as_bytes(), key.as_bytes()))
            .cloned()
            .collect())
    }
}

/// Redis-style glob matching: `*`, `?`, `[abc]`, `[^a-z]` and `\` escapes.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((b'*', rest)) => (0..=text.len()).any(|skip| glob_match(rest, &text[skip..])),
        Some((b'?', rest)) => !text.is_empty() && glob_match(rest, &text[1..]),
        Some((b'[', rest)) => {
            let Some((&c, text_rest)) = text.split_first() else {
                return false;
            };
            match match_class(rest, c) {
                Some((true, after)) => glob_match(after, text_rest),
                _ => false,
            }
        }
        Some((b'\\', rest)) if !rest.is_empty() => {
            text.first() == Some(&rest[0]) && glob_match(&rest[1..], &text[1..])
        }
        Some((&p, rest)) => text.first() == Some(&p) && glob_match(rest, &text[1..]),
    }
}

/// Matches `c` against a character class body (after `[`). Returns whether it
/// matched and the pattern remaining after the closing `]`.
fn match_class(mut class: &[u8], c: u8) -> Option<(bool, &[u8])> {
    let negate = class.first() == Some(&b'^');
    if negate {
        class = &class[1..];
    }

    let mut matched = false;
    loop {
        match class {
            [] => return None,
            [b']', rest @ ..] => return Some((matched != negate, rest)),
            [b'\\', escaped, rest @ ..] => {
                matched |= *escaped == c;
                class = rest;
            }
            [lo, b'-', hi, rest @ ..] if *hi != b']' => {
                let (lo, hi) = if lo <= hi { (*lo, *hi) } else { (*hi, *lo) };
                matched |= (lo..=hi).contains(&c);
                class = rest;
            }
            [single, rest @ ..] => {
                matched |= *single == c;
                class = rest;
            }
        }
    }
}
