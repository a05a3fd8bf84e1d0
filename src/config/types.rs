//! Raw registry document types, one entry per logical resource name.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Declarative search override for one filter field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchRule {
    /// Wire field name to send instead of the caller's field path.
    #[serde(default)]
    pub field: Option<String>,
    /// Wire comparison operator; `=` when absent.
    #[serde(default)]
    pub operator: Option<String>,
}

impl SearchRule {
    pub fn operator(op: impl Into<String>) -> Self {
        SearchRule { field: None, operator: Some(op.into()) }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OverrideConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub id_field: Option<String>,
    /// Absent means the resource has no search table at all, which changes list value encoding.
    #[serde(default)]
    pub search: Option<HashMap<String, SearchRule>>,
    #[serde(default)]
    pub sort: HashMap<String, String>,
}

/// Whole registry document: `{ "<resource>": { ...override } }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryConfig {
    pub resources: BTreeMap<String, OverrideConfig>,
}
