//! Repository for open quotation editing sessions
//!
//! Sessions live in memory only. Nothing is persisted until a quotation is
//! submitted, at which point the document is handed to the backend.

use std::sync::Mutex;

use async_trait::async_trait;
use common::error::{Error, Result};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::form::QuotationForm;

/// An edit applied to one stored quotation
pub type FormEdit<'a> = Box<dyn FnOnce(&mut QuotationForm) -> Result<()> + Send + 'a>;

/// Quotation repository trait defining the interface for session storage
#[async_trait]
pub trait QuotationRepository: Send + Sync {
    /// Store a newly opened quotation unless `max_open` sessions are already
    /// open (0 means no limit)
    async fn insert(&self, form: QuotationForm, max_open: usize) -> Result<QuotationForm>;

    /// Get a quotation by ID
    async fn get(&self, id: Uuid) -> Result<Option<QuotationForm>>;

    /// Apply an edit to a stored quotation and return the result. Edits to
    /// the same quotation never interleave, and a failed edit leaves the
    /// stored quotation unchanged.
    async fn modify<'a>(&self, id: Uuid, edit: FormEdit<'a>) -> Result<QuotationForm>;

    /// Remove a quotation, returning it if it existed
    async fn remove(&self, id: Uuid) -> Result<Option<QuotationForm>>;

    /// Number of open quotations
    async fn count(&self) -> Result<usize>;
}

/// In-memory repository for quotation sessions
pub struct InMemoryQuotationRepository {
    /// Quotations by ID
    pub quotations: DashMap<Uuid, QuotationForm>,
    /// Held while checking the session limit and inserting
    open_lock: Mutex<()>,
}

impl InMemoryQuotationRepository {
    /// Create a new in-memory quotation repository
    pub fn new() -> Self {
        Self {
            quotations: DashMap::new(),
            open_lock: Mutex::new(()),
        }
    }
}

impl Default for InMemoryQuotationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuotationRepository for InMemoryQuotationRepository {
    async fn insert(&self, form: QuotationForm, max_open: usize) -> Result<QuotationForm> {
        let _guard = self
            .open_lock
            .lock()
            .map_err(|e| Error::Internal(format!("Quotation store lock poisoned: {}", e)))?;

        if max_open > 0 && self.quotations.len() >= max_open {
            return Err(Error::ValidationError(format!(
                "Cannot open more than {} quotations at once",
                max_open
            )));
        }

        debug!("Storing quotation {}", form.id());
        self.quotations.insert(form.id(), form.clone());
        Ok(form)
    }

    async fn get(&self, id: Uuid) -> Result<Option<QuotationForm>> {
        Ok(self.quotations.get(&id).map(|entry| entry.value().clone()))
    }

    async fn modify<'a>(&self, id: Uuid, edit: FormEdit<'a>) -> Result<QuotationForm> {
        // The entry stays write-locked until the edited copy is stored
        let mut entry = self
            .quotations
            .get_mut(&id)
            .ok_or_else(|| Error::QuotationNotFound(format!("Quotation not found: {}", id)))?;

        let mut form = entry.value().clone();
        edit(&mut form)?;
        *entry = form.clone();
        Ok(form)
    }

    async fn remove(&self, id: Uuid) -> Result<Option<QuotationForm>> {
        Ok(self.quotations.remove(&id).map(|(_, form)| form))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.quotations.len())
    }
}
