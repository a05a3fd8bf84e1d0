//! Typed errors for registry loading and remote calls.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("registry load: {0}")]
    Load(String),
    #[error("registry parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("validation: resource '{resource}': {message}")]
    Validation { resource: String, message: String },
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
}

impl ConfigError {
    pub(crate) fn invalid(resource: &str, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            resource: resource.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Remote error response that carried a structured `error` message.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Remote error response without a structured message, body kept as received.
    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: Value },
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),
    #[error("decode: {0}")]
    Decode(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AdapterError {
    /// Translate a non-success response body into a typed failure.
    pub fn from_response(status: u16, body: Value) -> Self {
        match body.get("error").and_then(Value::as_str) {
            Some(message) => AdapterError::Http {
                status,
                message: message.to_string(),
            },
            None => AdapterError::Remote { status, body },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AdapterError::Http { status, .. } | AdapterError::Remote { status, .. } => Some(*status),
            AdapterError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
