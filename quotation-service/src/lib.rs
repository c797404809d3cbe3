//! Quotation service for editing and pricing quotations

pub mod form;
pub mod service;
pub mod repository;
pub mod config;

pub use form::QuotationForm;
pub use service::QuotationService;
pub use repository::{QuotationRepository, InMemoryQuotationRepository};
pub use config::QuotationServiceConfig;
