//! Application settings.

use serde::Deserialize;

/// Core application settings, read from the `[app_settings]` table.
///
/// `project_name`, `host` and `port` are required; everything else has a
/// default.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AppSettings {
    #[serde(default = "default_environment")]
    pub environment: String,

    pub project_name: String,

    /// Prefix every API router is nested under.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Swagger UI location.
    #[serde(default = "default_docs_url")]
    pub docs_url: String,

    /// OpenAPI document location.
    #[serde(default = "default_openapi_url")]
    pub openapi_url: String,

    /// Scalar API reference location.
    #[serde(default = "default_redoc_url")]
    pub redoc_url: String,

    pub host: String,

    pub port: u16,

    /// Tokio worker threads.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl AppSettings {
    /// Address the server binds to, e.g. `0.0.0.0:8000`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_docs_url() -> String {
    "/docs".to_string()
}

fn default_openapi_url() -> String {
    "/openapi.json".to_string()
}

fn default_redoc_url() -> String {
    "/redoc".to_string()
}

fn default_workers() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let settings: AppSettings = toml::from_str(
            r#"
            project_name = "demo"
            host = "127.0.0.1"
            port = 8000
            "#,
        )
        .unwrap();

        assert_eq!(settings.environment, "dev");
        assert_eq!(settings.api_prefix, "/api");
        assert_eq!(settings.version, "0.1.0");
        assert_eq!(settings.description, None);
        assert_eq!(settings.docs_url, "/docs");
        assert_eq!(settings.openapi_url, "/openapi.json");
        assert_eq!(settings.redoc_url, "/redoc");
        assert_eq!(settings.workers, 1);
        assert_eq!(settings.bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_project_name_required() {
        let result: Result<AppSettings, _> = toml::from_str(
            r#"
            host = "127.0.0.1"
            port = 8000
            "#,
        );
        assert!(result.is_err());
    }
}
