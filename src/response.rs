//! Remote response envelopes and the result shapes returned to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List-style body from the remote API.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListEnvelope {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Returned instead of a total when the remote API does not count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult {
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OneResult {
    pub data: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ManyResult {
    pub data: Vec<Value>,
}
