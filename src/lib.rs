//! Freight console metapackage
//!
//! Re-exports the workspace crates so cross-crate tests and tools can reach
//! them through one dependency.

pub use api_gateway;
pub use common;
pub use pricing_engine;
pub use quotation_service;
