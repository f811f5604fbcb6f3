use appbase_config::{CorsConfig, cors::is_wildcard};
use appbase_observability::timing_middleware;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::warn;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::api_doc;
use crate::middleware::handle_panic;
use crate::modules::base::init_base_router;
use crate::state::AppState;

/// Builds the application router.
///
/// The base router and every router in `routers` are served under the
/// configured `api_prefix`. Swagger UI and Scalar are mounted at the
/// configured documentation paths.
pub fn init_router(state: AppState, routers: Vec<Router<AppState>>) -> Router {
    let settings = state.settings.clone();
    let app = &settings.app;

    let api = routers
        .into_iter()
        .fold(init_base_router(), |api, router| api.merge(router));

    let prefix = app.api_prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(prefix, api)
    };

    let openapi = api_doc(app);

    router
        .merge(SwaggerUi::new(app.docs_url.clone()).url(app.openapi_url.clone(), openapi.clone()))
        .merge(Scalar::with_url(app.redoc_url.clone(), openapi))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&settings.cors))
        .layer(middleware::from_fn(timing_middleware))
}

/// CORS layer for the configured origins, methods and headers.
///
/// Browsers reject `*` on credentialed requests, so with credentials enabled
/// a wildcard mirrors whatever the request asked for.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let credentials = config.allow_credentials;

    let origins = if is_wildcard(&config.allowed_origins) {
        if credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::from(Any)
        }
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| parse_or_warn(origin, "origin", |o| o.parse().ok()))
            .collect();
        AllowOrigin::from(origins)
    };

    let methods = if is_wildcard(&config.allowed_methods) {
        if credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::from(Any)
        }
    } else {
        let methods: Vec<Method> = config
            .allowed_methods
            .iter()
            .filter_map(|method| {
                parse_or_warn(method, "method", |m| {
                    Method::from_bytes(m.to_ascii_uppercase().as_bytes()).ok()
                })
            })
            .collect();
        AllowMethods::from(methods)
    };

    let headers = if is_wildcard(&config.allowed_headers) {
        if credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::from(Any)
        }
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|header| parse_or_warn(header, "header", |h| h.parse().ok()))
            .collect();
        AllowHeaders::from(headers)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials)
}

fn parse_or_warn<T>(raw: &str, what: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let parsed = parse(raw);
    if parsed.is_none() {
        warn!(value = %raw, kind = %what, "Ignoring invalid CORS entry");
    }
    parsed
}
