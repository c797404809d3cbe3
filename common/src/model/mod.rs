//! Domain models for quotation pricing

pub mod quotation;
pub mod summary;
