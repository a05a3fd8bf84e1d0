//! Resolved override registry: immutable after construction, shared by reference.

use crate::config::SearchRule;
use crate::query::ListParams;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds the complete filter fragment for a resource whose search cannot be expressed declaratively.
pub trait ClauseBuilder: Send + Sync {
    fn build_clause(&self, params: &ListParams) -> String;
}

impl<F> ClauseBuilder for F
where
    F: Fn(&ListParams) -> String + Send + Sync,
{
    fn build_clause(&self, params: &ListParams) -> String {
        self(params)
    }
}

#[derive(Clone)]
pub enum SearchRules {
    /// Per-field rules; fields without an entry use the default `field=` term.
    Declarative(HashMap<String, SearchRule>),
    Custom(Arc<dyn ClauseBuilder>),
}

impl fmt::Debug for SearchRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchRules::Declarative(table) => f.debug_tuple("Declarative").field(table).finish(),
            SearchRules::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResourceOverride {
    pub path: Option<String>,
    pub id_field: Option<String>,
    pub search: Option<SearchRules>,
    pub sort: HashMap<String, String>,
}

impl ResourceOverride {
    /// Wire path, ignoring an empty override.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    pub fn id_field(&self) -> Option<&str> {
        self.id_field.as_deref().filter(|f| !f.is_empty())
    }

    /// Declarative search table, if the resource has one.
    pub fn search_table(&self) -> Option<&HashMap<String, SearchRule>> {
        match &self.search {
            Some(SearchRules::Declarative(table)) => Some(table),
            _ => None,
        }
    }

    pub fn clause_builder(&self) -> Option<&Arc<dyn ClauseBuilder>> {
        match &self.search {
            Some(SearchRules::Custom(builder)) => Some(builder),
            _ => None,
        }
    }

    pub fn sort_name(&self, field: &str) -> Option<&str> {
        self.sort.get(field).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Registry {
    overrides: HashMap<String, ResourceOverride>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: impl Into<String>, entry: ResourceOverride) {
        self.overrides.insert(resource.into(), entry);
    }

    pub fn with(mut self, resource: impl Into<String>, entry: ResourceOverride) -> Self {
        self.insert(resource, entry);
        self
    }

    /// Replace the resource's search behavior with a custom builder, creating the entry if needed.
    pub fn with_clause_builder(mut self, resource: impl Into<String>, builder: Arc<dyn ClauseBuilder>) -> Self {
        self.overrides.entry(resource.into()).or_default().search = Some(SearchRules::Custom(builder));
        self
    }

    /// Absent means defaults everywhere.
    pub fn lookup(&self, resource: &str) -> Option<&ResourceOverride> {
        self.overrides.get(resource)
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
