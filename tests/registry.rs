use resource_adapter::{load_registry, FilterTree, ListParams, QueryCompiler, Sort};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sample/registry.json")
}

#[tokio::test]
async fn sample_registry_loads_and_compiles() {
    let registry = load_registry(sample_path()).await.unwrap();
    assert!(registry.lookup("quotes").is_some());
    assert!(registry.lookup("things").is_none());

    let compiler = QueryCompiler::new(Arc::new(registry));
    assert_eq!(compiler.resolve_path("rfqConfig"), "rfq/config");
    assert_eq!(compiler.resolve_path("strategy"), "strategy");

    let filter: FilterTree = serde_json::from_value(json!({"name": "fx", "option": ["count"]})).unwrap();
    let q = compiler.compile_list("assetClasses", &ListParams::new(filter).sorted(Sort::asc("name")).paginated(1, 50));
    assert_eq!(q.path, "assets/class");
    assert_eq!(q.query_string, "option=count&name=~~\"fx\"&sort=name&offset=0&limit=50");
}

#[test]
fn compiler_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<QueryCompiler>();
}
