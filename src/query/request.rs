//! Generic query requests accepted from callers and the compiled wire descriptor.

use crate::query::{FilterTree, Leaf};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Sort { field: field.into(), order: SortOrder::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Sort { field: field.into(), order: SortOrder::Desc }
    }
}

/// Page numbers start at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Pagination { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub filter: FilterTree,
    #[serde(default)]
    pub sort: Option<Sort>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl ListParams {
    pub fn new(filter: FilterTree) -> Self {
        ListParams { filter, ..Default::default() }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paginated(mut self, page: u32, per_page: u32) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}

/// Records related to a parent: `target` is the field on this resource that holds the parent id.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReferenceParams {
    pub target: String,
    pub id: Leaf,
    #[serde(default)]
    pub filter: FilterTree,
    #[serde(default)]
    pub sort: Option<Sort>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Final wire request descriptor: resolved path plus query string without a leading `&`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledQuery {
    pub path: String,
    pub query_string: String,
}

impl CompiledQuery {
    /// Build from an `&`-prefixed fragment as produced by the term builders.
    pub(crate) fn from_fragment(path: String, fragment: &str) -> Self {
        CompiledQuery {
            path,
            query_string: fragment.strip_prefix('&').unwrap_or(fragment).to_string(),
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        if self.query_string.is_empty() {
            format!("{}/{}", base_url, self.path)
        } else {
            format!("{}/{}?{}", base_url, self.path, self.query_string)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_params_from_caller_json() {
        let p: ListParams = serde_json::from_value(json!({
            "filter": {"status": "open"},
            "sort": {"field": "name", "order": "DESC"},
            "pagination": {"page": 2, "perPage": 25}
        }))
        .unwrap();
        assert_eq!(p.sort, Some(Sort::desc("name")));
        assert_eq!(p.pagination, Some(Pagination::new(2, 25)));
        assert_eq!(p.filter.len(), 1);
    }

    #[test]
    fn missing_sections_default() {
        let p: ListParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p, ListParams::default());
    }

    #[test]
    fn url_omits_empty_query() {
        let q = CompiledQuery::from_fragment("things".into(), "");
        assert_eq!(q.url("http://api"), "http://api/things");
        let q = CompiledQuery::from_fragment("things".into(), "&limit=5");
        assert_eq!(q.url("http://api"), "http://api/things?limit=5");
    }
}
