//! Error types for the freight console
//!
//! This module provides the error type shared by every crate in the
//! workspace. Pricing problems on a single line (a zero exchange rate, an
//! overflowing amount) are not errors: they are reported as
//! [`LineIssue`](crate::model::quotation::LineIssue) values on the line itself.

use std::fmt::Display;
use thiserror::Error;

/// Freight console error type
#[derive(Debug, Error)]
pub enum Error {
    /// Generic validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error when a quotation editing session cannot be found
    #[error("Quotation not found: {0}")]
    QuotationNotFound(String),

    /// Error when a line index does not address an existing line
    #[error("Line not found: {0}")]
    LineNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::ValidationError(msg) => Error::ValidationError(format!("{}: {}", context, msg)),
                Error::QuotationNotFound(msg) => Error::QuotationNotFound(format!("{}: {}", context, msg)),
                Error::LineNotFound(msg) => Error::LineNotFound(format!("{}: {}", context, msg)),
                Error::ConfigurationError(msg) => Error::ConfigurationError(format!("{}: {}", context, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
            }
        })
    }
}
