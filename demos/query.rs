//! Compile (and optionally fetch) one list query from environment settings.
//!
//! `RESOURCE_API_URL=http://localhost:8080 RESOURCE_REGISTRY_PATH=sample/registry.json \
//!  RESOURCE=quotes FILTER='{"address":"main"}' SORT=createdAt.value:DESC cargo run --example query`

use resource_adapter::{AdapterConfig, DataProvider, FilterTree, ListParams, Pagination, Sort, SortOrder};
use tracing_subscriber::EnvFilter;

fn parse_sort(raw: &str) -> Sort {
    match raw.rsplit_once(':') {
        Some((field, order)) if order.eq_ignore_ascii_case("desc") => Sort { field: field.to_string(), order: SortOrder::Desc },
        Some((field, _)) => Sort::asc(field),
        None => Sort::asc(raw),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("resource_adapter=debug".parse()?))
        .init();

    let config = AdapterConfig::from_env()?;
    let registry = config.registry().await?;
    tracing::info!(resources = registry.len(), "registry loaded");

    let resource = std::env::var("RESOURCE").unwrap_or_else(|_| "things".into());
    let filter: FilterTree = match std::env::var("FILTER") {
        Ok(raw) => serde_json::from_str(&raw)?,
        Err(_) => FilterTree::new(),
    };
    let mut params = ListParams::new(filter);
    if let Ok(raw) = std::env::var("SORT") {
        params.sort = Some(parse_sort(&raw));
    }
    if let Ok(page) = std::env::var("PAGE") {
        let per_page = std::env::var("PER_PAGE").unwrap_or_else(|_| "25".into());
        params.pagination = Some(Pagination::new(page.parse()?, per_page.parse()?));
    }

    let provider = DataProvider::from_config(&config, registry);
    let query = provider.compiler().compile_list(&resource, &params);
    tracing::info!(url = %query.url(provider.base_url()), "compiled");

    if std::env::var("FETCH").map(|v| v == "1").unwrap_or(false) {
        let result = provider.get_list(&resource, &params).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}
