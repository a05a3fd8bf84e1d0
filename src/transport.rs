//! HTTP transport seam. The provider only ever talks to a [`Transport`].

use crate::error::AdapterError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl WireRequest {
    pub fn get(url: String) -> Self {
        WireRequest { method: Method::Get, url, body: None }
    }

    pub fn post(url: String, body: Value) -> Self {
        WireRequest { method: Method::Post, url, body: Some(body) }
    }

    pub fn delete(url: String) -> Self {
        WireRequest { method: Method::Delete, url, body: None }
    }
}

/// Any status is returned as-is; error translation belongs to the provider.
#[derive(Clone, Debug, PartialEq)]
pub struct WireResponse {
    pub status: u16,
    pub body: Value,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, AdapterError>;
}

/// `reqwest` backed transport with JSON bodies.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        HttpTransport { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, AdapterError> {
        let builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
            Method::Delete => self.http.delete(&request.url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(v) => v,
                // keep non-JSON error pages so the status still reaches the caller
                Err(_) if !(200..300).contains(&status) => Value::String(text),
                Err(e) => {
                    return Err(AdapterError::Decode(format!("response body from {}: {}", request.url, e)))
                }
            }
        };
        Ok(WireResponse { status, body })
    }
}
