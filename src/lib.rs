//! Resource adapter: compiles generic resource queries into a REST query-string dialect.

pub mod config;
pub mod error;
pub mod query;
pub mod response;
pub mod service;
pub mod transport;

pub use config::{load_registry, registry_from_str, resolve, AdapterConfig, ClauseBuilder, Registry, ResourceOverride, SearchRule, SearchRules};
pub use error::{AdapterError, ConfigError};
pub use query::{flatten, CompiledQuery, FilterTree, FilterValue, FlatFilter, Leaf, ListParams, Pagination, QueryCompiler, ReferenceParams, Scalar, Sort, SortOrder};
pub use response::{ListResult, ManyResult, OneResult, PageInfo};
pub use service::{DataProvider, UpdateParams};
pub use transport::{HttpTransport, Method, Transport, WireRequest, WireResponse};
