use appbase_config::AppSettings;
use utoipa::OpenApi;

use crate::modules::base::model::{CacheKeysResponse, ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::base::controller::welcome,
        crate::modules::base::controller::list_cache_keys,
    ),
    components(
        schemas(
            MessageResponse,
            CacheKeysResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Base", description = "Service root"),
        (name = "Cache", description = "Cache inspection endpoints")
    ),
    info(
        title = "Appbase API",
        version = "0.1.0",
        description = "Base API scaffold with a Redis-backed cache.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// OpenAPI document carrying the configured project name, version and description.
///
/// Handler paths are declared relative to the API root and are served under
/// `api_prefix`, so they are rewritten with it here.
pub fn api_doc(settings: &AppSettings) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let prefix = settings.api_prefix.trim_end_matches('/');
    doc.paths.paths = std::mem::take(&mut doc.paths.paths)
        .into_iter()
        .map(|(path, item)| (prefixed(prefix, &path), item))
        .collect();
    doc.info.title = settings.project_name.clone();
    doc.info.version = settings.version.clone();
    if let Some(description) = &settings.description {
        doc.info.description = Some(description.clone());
    }
    doc
}

fn prefixed(prefix: &str, path: &str) -> String {
    match (prefix, path) {
        ("", path) => path.to_string(),
        (prefix, "/") => prefix.to_string(),
        (prefix, path) => format!("{prefix}{path}"),
    }
}
