//! Query compilation: caller filters, sort, and pagination to the remote query-string dialect.

mod builder;
mod compiler;
pub mod filter;
pub mod request;
pub use builder::*;
pub use compiler::*;
pub use filter::*;
pub use request::*;
