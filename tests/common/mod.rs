use std::sync::Arc;
use std::time::Duration;

use appbase::config::Settings;
use appbase::router::init_router;
use appbase::state::AppState;
use appbase_cache::{CacheConfig, KeyValueCache, MemoryStore};
use appbase_config::{AppSettings, CorsConfig, LogSettings};
use axum::Router;
use axum::body::Body;
use axum::http::Response;
use http_body_util::BodyExt;

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

pub fn test_settings() -> Settings {
    let app: AppSettings = toml::from_str(
        r#"
        project_name = "Base API"
        host = "127.0.0.1"
        port = 8000
        "#,
    )
    .unwrap();

    Settings {
        app,
        log: LogSettings::default(),
        cors: CorsConfig::default(),
        cache: CacheConfig::default(),
        extra: toml::Table::new(),
    }
}

/// State over an in-memory store; the store handle is returned for assertions.
pub fn test_state(settings: Settings) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cache = KeyValueCache::from_shared(store.clone(), DEFAULT_TTL);
    (AppState::new(settings, cache), store)
}

#[allow(dead_code)]
pub fn setup_test_app() -> (Router, AppState, Arc<MemoryStore>) {
    let (state, store) = test_state(test_settings());
    (init_router(state.clone(), Vec::new()), state, store)
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
