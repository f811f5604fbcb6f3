use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{list_cache_keys, welcome};

pub fn init_base_router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/cache/keys", get(list_cache_keys))
}
