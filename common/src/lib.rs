//! Common types and utilities for the freight console
//!
//! This library contains the shared types used by the pricing engine, the
//! quotation service and the API gateway. It provides a unified approach to
//! error handling, decimal input coercion, and the quotation domain models.

pub mod error;
pub mod model;
pub mod decimal;

/// Re-export important types
pub use error::{Error, Result, ErrorExt};
pub use decimal::*;

// Re-export utoipa for use in model ToSchema derives
#[cfg(feature = "utoipa")]
pub use utoipa;
