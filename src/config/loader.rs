//! Load the registry document and the adapter settings.

use crate::config::resolved::{Registry, ResourceOverride, SearchRules};
use crate::config::{validate, RegistryConfig};
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

pub const ENV_API_URL: &str = "RESOURCE_API_URL";
pub const ENV_REGISTRY_PATH: &str = "RESOURCE_REGISTRY_PATH";

/// Build the runtime registry from a parsed document (validates first).
pub fn resolve(config: &RegistryConfig) -> Result<Registry, ConfigError> {
    validate(config)?;
    let mut registry = Registry::new();
    for (resource, entry) in &config.resources {
        registry.insert(
            resource.clone(),
            ResourceOverride {
                path: entry.path.clone(),
                id_field: entry.id_field.clone(),
                search: entry.search.clone().map(SearchRules::Declarative),
                sort: entry.sort.clone(),
            },
        );
    }
    tracing::debug!(resources = registry.len(), "registry resolved");
    Ok(registry)
}

pub fn registry_from_str(document: &str) -> Result<Registry, ConfigError> {
    let config: RegistryConfig = serde_json::from_str(document)?;
    resolve(&config)
}

pub async fn load_registry(path: impl AsRef<Path>) -> Result<Registry, ConfigError> {
    let path = path.as_ref();
    let document = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    registry_from_str(&document)
}

/// Settings supplied at process start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Remote API base URL without a trailing `/`.
    pub base_url: String,
    pub registry_path: Option<PathBuf>,
}

impl AdapterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        AdapterConfig {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            registry_path: None,
        }
    }

    /// Read `RESOURCE_API_URL` and optional `RESOURCE_REGISTRY_PATH`, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(ENV_API_URL).map_err(|_| ConfigError::MissingVar(ENV_API_URL))?;
        let mut config = AdapterConfig::new(base_url);
        config.registry_path = std::env::var(ENV_REGISTRY_PATH).ok().map(PathBuf::from);
        Ok(config)
    }

    /// Load the configured registry, or an empty one when no path is set.
    pub async fn registry(&self) -> Result<Registry, ConfigError> {
        match &self.registry_path {
            Some(path) => load_registry(path).await,
            None => Ok(Registry::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "hrTrades": {"path": "hiddenroad/trades", "idField": "trade_id"},
        "strategy": {"idField": "source"},
        "quotes": {
            "search": {"address": {"operator": "=~~"}},
            "sort": {"createdAt.value": "-createdAt.value"}
        }
    }"#;

    #[test]
    fn resolves_partial_overrides() {
        let registry = registry_from_str(DOCUMENT).unwrap();
        assert_eq!(registry.len(), 3);

        let strategy = registry.lookup("strategy").unwrap();
        assert_eq!(strategy.id_field(), Some("source"));
        assert_eq!(strategy.path(), None);
        assert!(strategy.search.is_none());
        assert!(strategy.sort.is_empty());

        let quotes = registry.lookup("quotes").unwrap();
        assert!(quotes.search_table().unwrap().contains_key("address"));
        assert_eq!(quotes.sort_name("createdAt.value"), Some("-createdAt.value"));

        assert!(registry.lookup("things").is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = registry_from_str(r#"{"things": {"paht": "x"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        assert_eq!(AdapterConfig::new("http://localhost:8080/").base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn missing_registry_file_is_load_error() {
        let err = load_registry("/nonexistent/registry.json").await.unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
