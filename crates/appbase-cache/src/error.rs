//! Error type for cache operations.

/// Error type for cache operations.
///
/// A cache miss is never an error: `get` reports it as `None` (or an empty
/// set for [`ValueKind::Set`](crate::ValueKind::Set)).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failure reaching or talking to the backing store. Propagated as-is,
    /// no retry is attempted.
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Unsupported data type for caching: {0}")]
    UnsupportedType(String),

    #[error("Failed to deserialize cached value for key '{key}': {reason}")]
    Deserialization { key: String, reason: String },

    #[error("Failed to bind arguments for '{function}': {reason}")]
    Binding { function: String, reason: String },

    #[error("Cache key must not be empty")]
    EmptyKey,
}

impl CacheError {
    pub(crate) fn deserialization(key: &str, reason: impl ToString) -> Self {
        Self::Deserialization {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn binding(function: &str, reason: impl Into<String>) -> Self {
        Self::Binding {
            function: function.to_string(),
            reason: reason.into(),
        }
    }
}
