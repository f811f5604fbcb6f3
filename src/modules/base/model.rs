use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CacheKeysQuery {
    /// Key prefix to match; empty lists every key.
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheKeysResponse {
    pub prefix: String,
    /// Matching keys in ascending order.
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}
