//! Stateless query compiler: resource requests in, wire path and query string out.

use crate::config::{Registry, ResourceOverride};
use crate::query::{
    filter_terms, id_list_term, pagination_terms, reference_terms, sort_term, CompiledQuery, FilterTree,
    ListParams, ReferenceParams, Scalar, Sort,
};
use serde_json::Value;
use std::sync::Arc;

/// Holds only a shared, read-only registry, so it can be cloned and used from any task.
#[derive(Clone, Debug, Default)]
pub struct QueryCompiler {
    registry: Arc<Registry>,
}

impl QueryCompiler {
    pub fn new(registry: Arc<Registry>) -> Self {
        QueryCompiler { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn entry(&self, resource: &str) -> Option<&ResourceOverride> {
        self.registry.lookup(resource)
    }

    pub fn resolve_path<'a>(&'a self, resource: &'a str) -> &'a str {
        self.entry(resource).and_then(ResourceOverride::path).unwrap_or(resource)
    }

    /// Filter fragment for declarative search. Custom builders are dispatched by [`Self::filter_clause`].
    pub fn build_filter_clause(&self, resource: &str, filter: &FilterTree) -> String {
        let table = self.entry(resource).and_then(ResourceOverride::search_table);
        filter_terms(filter, table)
    }

    /// Filter fragment for a list request, delegating to a custom builder when one is registered.
    pub fn filter_clause(&self, resource: &str, params: &ListParams) -> String {
        match self.entry(resource).and_then(ResourceOverride::clause_builder) {
            Some(builder) => builder.build_clause(params),
            None => self.build_filter_clause(resource, &params.filter),
        }
    }

    pub fn sort_clause(&self, resource: &str, sort: &Sort) -> String {
        sort_term(sort, self.entry(resource))
    }

    pub fn compile_list(&self, resource: &str, params: &ListParams) -> CompiledQuery {
        let mut query = self.filter_clause(resource, params);
        if let Some(sort) = &params.sort {
            query.push_str(&self.sort_clause(resource, sort));
        }
        if let Some(pagination) = &params.pagination {
            query.push_str(&pagination_terms(pagination));
        }
        CompiledQuery::from_fragment(self.resolve_path(resource).to_string(), &query)
    }

    pub fn compile_reference(&self, resource: &str, params: &ReferenceParams) -> CompiledQuery {
        let mut query = reference_terms(&params.filter, &params.target, &params.id);
        if let Some(sort) = &params.sort {
            query.push_str(&self.sort_clause(resource, sort));
        }
        if let Some(pagination) = &params.pagination {
            query.push_str(&pagination_terms(pagination));
        }
        CompiledQuery::from_fragment(self.resolve_path(resource).to_string(), &query)
    }

    pub fn compile_get_many(&self, resource: &str, ids: &[Scalar]) -> CompiledQuery {
        CompiledQuery::from_fragment(self.resolve_path(resource).to_string(), &id_list_term(ids))
    }

    /// Path of a single record; the id is percent-encoded as one segment.
    pub fn record_path(&self, resource: &str, id: &Scalar) -> String {
        format!("{}/{}", self.resolve_path(resource), urlencoding::encode(&id.to_string()))
    }

    /// Copy the resource's identifier field into `id` on every record.
    pub fn normalize_records(&self, resource: &str, records: &mut [Value]) {
        if let Some(field) = self.entry(resource).and_then(ResourceOverride::id_field) {
            for record in records.iter_mut() {
                normalize_identifier(record, field);
            }
        }
    }

    pub fn normalize_record(&self, resource: &str, record: &mut Value) {
        self.normalize_records(resource, std::slice::from_mut(record));
    }
}

/// Literal key first; a dotted field falls back to a nested lookup.
fn normalize_identifier(record: &mut Value, field: &str) {
    let Some(obj) = record.as_object_mut() else { return };
    let value = obj.get(field).cloned().or_else(|| lookup_dotted(&*obj, field));
    if let Some(v) = value {
        obj.insert("id".to_string(), v);
    }
}

fn lookup_dotted(obj: &serde_json::Map<String, Value>, field: &str) -> Option<Value> {
    if !field.contains('.') {
        return None;
    }
    let mut parts = field.split('.');
    let mut cur = obj.get(parts.next()?)?;
    for part in parts {
        cur = cur.get(part)?;
    }
    Some(cur.clone())
}
