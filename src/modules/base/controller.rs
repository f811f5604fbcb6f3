use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::modules::base::model::{
    CacheKeysQuery, CacheKeysResponse, ErrorResponse, MessageResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub const WELCOME_MESSAGE: &str = "Welcome to the Base API!";

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = MessageResponse)
    ),
    tag = "Base"
)]
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// List cache keys starting with a prefix
#[utoipa::path(
    get,
    path = "/cache/keys",
    params(CacheKeysQuery),
    responses(
        (status = 200, description = "Matching cache keys", body = CacheKeysResponse),
        (status = 500, description = "Cache unavailable", body = ErrorResponse)
    ),
    tag = "Cache"
)]
#[instrument(skip(state))]
pub async fn list_cache_keys(
    State(state): State<AppState>,
    Query(query): Query<CacheKeysQuery>,
) -> Result<Json<CacheKeysResponse>, AppError> {
    let mut keys: Vec<String> = state
        .cache
        .keys_with_prefix(&query.prefix)
        .await?
        .into_iter()
        .collect();
    keys.sort();

    Ok(Json(CacheKeysResponse {
        prefix: query.prefix,
        keys,
    }))
}
