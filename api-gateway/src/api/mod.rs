//! API handlers
//!
//! This module contains all the API endpoint handlers organized by resource.
//! Each handler follows a consistent pattern:
//! - Extract state and parameters using Axum extractors
//! - Turn JSON field values into the raw input the quotation form expects
//! - Call the appropriate service methods
//! - Map the result to a standardized response format

pub mod pricing;
pub mod quotation;
pub mod response;

// Re-export the response module for easy access
pub use response::{ApiResponse, ApiListResponse};
