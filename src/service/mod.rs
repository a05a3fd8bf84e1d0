//! DataProvider: generic resource operations over the query compiler and a transport.

mod provider;
pub use provider::{DataProvider, UpdateParams};
