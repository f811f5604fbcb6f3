mod common;

use appbase::router::init_router;
use appbase::state::AppState;
use appbase_cache::{KeyValueCache, MemoryStore};
use appbase_config::CorsConfig;
use appbase_observability::RESPONSE_TIME_HEADER;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use common::{DEFAULT_TTL, body_json, setup_test_app, test_settings, test_state};
use serde_json::json;
use tower::ServiceExt;

async fn boom() -> &'static str {
    panic!("something broke")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_welcome_message() {
    let (app, _, _) = setup_test_app();

    let response = app.oneshot(get_request("/api")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Welcome to the Base API!"})
    );
}

#[tokio::test]
async fn test_response_time_header() {
    let (app, _, _) = setup_test_app();

    let response = app.oneshot(get_request("/api")).await.unwrap();

    let value = response
        .headers()
        .get(RESPONSE_TIME_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(value.ends_with("ms"));
}

#[tokio::test]
async fn test_unknown_route_is_404_with_timing() {
    let (app, _, _) = setup_test_app();

    let response = app.oneshot(get_request("/api/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key(RESPONSE_TIME_HEADER));
}

#[tokio::test]
async fn test_custom_api_prefix() {
    let mut settings = test_settings();
    settings.app.api_prefix = "/v1/".to_string();
    let (state, _) = test_state(settings);
    let app = init_router(state, Vec::new());

    let response = app.clone().oneshot(get_request("/v1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/api")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_additional_routers_share_prefix() {
    let (state, _) = test_state(test_settings());
    let extra: Router<AppState> = Router::new().route("/ping", get(|| async { "pong" }));
    let app = init_router(state, vec![extra]);

    let response = app.oneshot(get_request("/api/ping")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_panic_becomes_json_500() {
    let (state, _) = test_state(test_settings());
    let failing: Router<AppState> = Router::new().route("/boom", get(boom));
    let app = init_router(state, vec![failing]);

    let response = app.oneshot(get_request("/api/boom")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key(RESPONSE_TIME_HEADER));
    assert_eq!(body_json(response).await, json!({"detail": "something broke"}));
}

#[tokio::test]
async fn test_cors_wildcard_with_credentials_mirrors_origin() {
    let (app, _, _) = setup_test_app();

    let request = Request::builder()
        .uri("/api")
        .header(header::ORIGIN, "http://frontend.test")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://frontend.test"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_explicit_origins() {
    let mut settings = test_settings();
    settings.cors = CorsConfig {
        allowed_origins: vec!["http://allowed.test".to_string()],
        allowed_methods: vec!["GET".to_string()],
        allowed_headers: vec!["content-type".to_string()],
        allow_credentials: false,
    };
    let (state, _) = test_state(settings);
    let app = init_router(state, Vec::new());

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/api")
        .header(header::ORIGIN, "http://allowed.test")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://allowed.test"
    );

    let request = Request::builder()
        .uri("/api")
        .header(header::ORIGIN, "http://other.test")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[tokio::test]
async fn test_openapi_document_uses_settings() {
    let (app, _, _) = setup_test_app();

    let response = app.oneshot(get_request("/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert_eq!(doc["info"]["title"], "Base API");
    assert_eq!(doc["info"]["version"], "0.1.0");
    assert!(doc["paths"].get("/api/cache/keys").is_some());
    assert!(doc["paths"].get("/api").is_some());
}

#[tokio::test]
async fn test_openapi_paths_follow_api_prefix() {
    let mut settings = test_settings();
    settings.app.api_prefix = "/v1/".to_string();
    let (state, _) = test_state(settings);
    let app = init_router(state, Vec::new());

    let response = app.oneshot(get_request("/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/v1"));
    assert!(paths.contains_key("/v1/cache/keys"));
    assert!(!paths.keys().any(|path| path.starts_with("/api")));
}

#[tokio::test]
async fn test_cache_keys_sorted_by_prefix() {
    let (app, state, _) = setup_test_app();
    let cache = &state.cache;
    cache.set("user:2", "b", None).await.unwrap();
    cache.set("user:1", "a", None).await.unwrap();
    cache.set("order:1", "c", None).await.unwrap();

    let response = app
        .oneshot(get_request("/api/cache/keys?prefix=user:"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"prefix": "user:", "keys": ["user:1", "user:2"]})
    );
}

#[tokio::test]
async fn test_cache_keys_without_prefix_lists_everything() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let cache = KeyValueCache::from_shared(store.clone(), DEFAULT_TTL);
    cache.set("b", 1, None).await.unwrap();
    cache.set("a", 2, None).await.unwrap();
    let app = init_router(AppState::new(test_settings(), cache), Vec::new());

    let response = app.oneshot(get_request("/api/cache/keys")).await.unwrap();

    assert_eq!(
        body_json(response).await,
        json!({"prefix": "", "keys": ["a", "b"]})
    );
}
