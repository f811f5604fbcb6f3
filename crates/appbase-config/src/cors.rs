//! CORS (Cross-Origin Resource Sharing) configuration.

use std::env;

/// Allowed origins, methods and headers for cross-origin requests.
///
/// A single `*` entry means "any". When credentials are allowed together
/// with a wildcard, the router mirrors the request's origin instead, since
/// browsers reject `*` for credentialed requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["*".to_string()],
            allowed_headers: vec!["*".to_string()],
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Loads CORS settings from the environment.
    ///
    /// - `ALLOWED_ORIGINS`, `ALLOWED_METHODS`, `ALLOWED_HEADERS`: comma
    ///   separated lists (default `*`)
    /// - `IS_ALLOWED_CREDENTIALS`: `true` / `false` (default `true`)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            allowed_origins: list_var("ALLOWED_ORIGINS").unwrap_or(defaults.allowed_origins),
            allowed_methods: list_var("ALLOWED_METHODS").unwrap_or(defaults.allowed_methods),
            allowed_headers: list_var("ALLOWED_HEADERS").unwrap_or(defaults.allowed_headers),
            allow_credentials: env::var("IS_ALLOWED_CREDENTIALS")
                .ok()
                .and_then(|v| v.trim().to_ascii_lowercase().parse().ok())
                .unwrap_or(defaults.allow_credentials),
        }
    }
}

/// Returns `true` when a list means "allow anything".
pub fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|value| value == "*")
}

fn list_var(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| parse_list(&raw))
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
