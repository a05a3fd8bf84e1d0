//! Generic resource operations against the remote API, one wire request per call.

use crate::config::{AdapterConfig, Registry};
use crate::error::AdapterError;
use crate::query::{ListParams, QueryCompiler, ReferenceParams, Scalar};
use crate::response::{ListEnvelope, ListResult, ManyResult, OneResult, PageInfo};
use crate::transport::{HttpTransport, Transport, WireRequest};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UpdateParams {
    /// Not sent: updates post `data` to the collection path. Kept so callers pass the same payload shape as other record operations.
    pub id: Scalar,
    pub data: Value,
}

#[derive(Clone)]
pub struct DataProvider {
    compiler: QueryCompiler,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl DataProvider {
    pub fn new(compiler: QueryCompiler, base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        DataProvider {
            compiler,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Provider over HTTP for the configured base URL.
    pub fn from_config(config: &AdapterConfig, registry: Registry) -> Self {
        Self::new(
            QueryCompiler::new(Arc::new(registry)),
            config.base_url.clone(),
            Arc::new(HttpTransport::new()),
        )
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: WireRequest) -> Result<Value, AdapterError> {
        tracing::debug!(method = %request.method, url = %request.url, "request");
        let resp = self.transport.send(request).await?;
        if !resp.is_success() {
            let err = AdapterError::from_response(resp.status, resp.body);
            tracing::warn!(status = resp.status, error = %err, "remote error");
            return Err(err);
        }
        Ok(resp.body)
    }

    async fn fetch_list(&self, url: String) -> Result<ListEnvelope, AdapterError> {
        let body = self.send(WireRequest::get(url)).await?;
        if body.is_null() {
            return Ok(ListEnvelope::default());
        }
        serde_json::from_value(body).map_err(|e| AdapterError::Decode(format!("list response: {}", e)))
    }

    pub async fn get_list(&self, resource: &str, params: &ListParams) -> Result<ListResult, AdapterError> {
        let query = self.compiler.compile_list(resource, params);
        let mut envelope = self.fetch_list(query.url(&self.base_url)).await?;
        self.compiler.normalize_records(resource, &mut envelope.results);

        let uncounted = envelope.count.unwrap_or(0) == 0;
        if let Some(pagination) = params.pagination.filter(|_| uncounted && !envelope.results.is_empty()) {
            let page_info = PageInfo {
                has_previous_page: pagination.page > 1,
                has_next_page: envelope.results.len() == pagination.per_page as usize,
            };
            return Ok(ListResult { data: envelope.results, total: None, page_info: Some(page_info) });
        }
        Ok(ListResult { data: envelope.results, total: envelope.count, page_info: None })
    }

    pub async fn get_one(&self, resource: &str, id: &Scalar) -> Result<OneResult, AdapterError> {
        let url = self.url(&self.compiler.record_path(resource, id));
        let mut data = self.send(WireRequest::get(url)).await?;
        self.compiler.normalize_record(resource, &mut data);
        Ok(OneResult { data })
    }

    pub async fn get_many(&self, resource: &str, ids: &[Scalar]) -> Result<ManyResult, AdapterError> {
        let query = self.compiler.compile_get_many(resource, ids);
        let mut envelope = self.fetch_list(query.url(&self.base_url)).await?;
        self.compiler.normalize_records(resource, &mut envelope.results);
        Ok(ManyResult { data: envelope.results })
    }

    pub async fn get_many_reference(
        &self,
        resource: &str,
        params: &ReferenceParams,
    ) -> Result<ListResult, AdapterError> {
        let query = self.compiler.compile_reference(resource, params);
        let mut envelope = self.fetch_list(query.url(&self.base_url)).await?;
        self.compiler.normalize_records(resource, &mut envelope.results);
        Ok(ListResult { data: envelope.results, total: envelope.count, page_info: None })
    }

    async fn post_record(&self, resource: &str, data: Value) -> Result<OneResult, AdapterError> {
        if !data.is_object() {
            return Err(AdapterError::BadRequest("record body must be a JSON object".into()));
        }
        let url = self.url(self.compiler.resolve_path(resource));
        let mut data = self.send(WireRequest::post(url, data)).await?;
        self.compiler.normalize_record(resource, &mut data);
        Ok(OneResult { data })
    }

    pub async fn create(&self, resource: &str, data: Value) -> Result<OneResult, AdapterError> {
        self.post_record(resource, data).await
    }

    /// Updates are posted to the collection path; the record body carries its own key.
    pub async fn update(&self, resource: &str, params: UpdateParams) -> Result<OneResult, AdapterError> {
        self.post_record(resource, params.data).await
    }

    /// Result is `{id, ...response}`; fields in the response win.
    pub async fn delete(&self, resource: &str, id: &Scalar) -> Result<OneResult, AdapterError> {
        let url = self.url(&self.compiler.record_path(resource, id));
        let body = self.send(WireRequest::delete(url)).await?;
        let mut data = Map::new();
        data.insert("id".to_string(), id.to_value());
        if let Value::Object(fields) = body {
            data.extend(fields);
        }
        Ok(OneResult { data: Value::Object(data) })
    }

    /// Not supported by the remote API: succeeds with no data and sends nothing.
    pub async fn update_many(&self, resource: &str, ids: &[Scalar], _data: Value) -> Result<ManyResult, AdapterError> {
        tracing::debug!(resource, ids = ids.len(), "update_many not supported, skipping");
        Ok(ManyResult::default())
    }

    /// Not supported by the remote API: succeeds with no data and sends nothing.
    pub async fn delete_many(&self, resource: &str, ids: &[Scalar]) -> Result<ManyResult, AdapterError> {
        tracing::debug!(resource, ids = ids.len(), "delete_many not supported, skipping");
        Ok(ManyResult::default())
    }

    /// Raw GET of any path under the base URL.
    pub async fn get(&self, path: &str) -> Result<Value, AdapterError> {
        self.send(WireRequest::get(self.url(path.trim_start_matches('/')))).await
    }
}
