//! Quotation service implementation

use std::sync::Arc;

use common::error::{Error, ErrorExt, Result};
use common::model::quotation::{
    DefaultField, LineField, LineOutcome, QuotationDefaults, QuotationDocument, QuotationLine,
};
use common::model::summary::QuotationSummary;
use pricing_engine::price_line;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::QuotationServiceConfig;
use crate::form::QuotationForm;
use crate::repository::{FormEdit, InMemoryQuotationRepository, QuotationRepository};

/// Quotation service for editing sessions and line pricing
pub struct QuotationService {
    /// Repository for open sessions
    repo: Arc<dyn QuotationRepository>,
    /// Service configuration
    config: QuotationServiceConfig,
}

impl QuotationService {
    /// Create a new quotation service with an in-memory repository
    pub fn new() -> Self {
        Self::with_config(QuotationServiceConfig::from_env())
    }

    /// Create a new quotation service with a configuration
    pub fn with_config(config: QuotationServiceConfig) -> Self {
        Self::with_repository(Arc::new(InMemoryQuotationRepository::new()), config)
    }

    /// Create a new quotation service over a specific repository
    pub fn with_repository(repo: Arc<dyn QuotationRepository>, config: QuotationServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &QuotationServiceConfig {
        &self.config
    }

    /// Open a new quotation. Without explicit defaults the configured ones apply.
    pub async fn open_quotation(&self, defaults: Option<QuotationDefaults>) -> Result<QuotationForm> {
        let defaults = defaults.unwrap_or_else(|| self.config.quotation_defaults());
        let form = QuotationForm::new(defaults);
        info!("Opening quotation {}", form.id());
        self.repo.insert(form, self.config.max_open_quotations).await
    }

    /// Get a quotation by ID
    pub async fn get_quotation(&self, id: Uuid) -> Result<Option<QuotationForm>> {
        self.repo.get(id).await
    }

    /// Append a blank line
    pub async fn add_line(&self, id: Uuid) -> Result<QuotationForm> {
        self.repo
            .modify(id, edit(|form| {
                let index = form.add_line();
                debug!("Added line {} to quotation {}", index, id);
                Ok(())
            }))
            .await
    }

    /// Append a prepared line
    pub async fn push_line(&self, id: Uuid, line: QuotationLine) -> Result<QuotationForm> {
        self.repo
            .modify(id, edit(move |form| {
                let index = form.push_line(line);
                debug!("Added line {} to quotation {}", index, id);
                Ok(())
            }))
            .await
    }

    /// Apply raw input to one line field
    pub async fn update_line(
        &self,
        id: Uuid,
        index: usize,
        field: LineField,
        raw: &str,
    ) -> Result<QuotationForm> {
        self.repo
            .modify(id, edit(|form| form.update_field(index, field, raw).map(|_| ())))
            .await
            .with_context(|| format!("Failed to update quotation {}", id))
    }

    /// Remove one line
    pub async fn remove_line(&self, id: Uuid, index: usize) -> Result<QuotationForm> {
        self.repo
            .modify(id, edit(|form| {
                form.remove_line(index)?;
                debug!("Removed line {} from quotation {}", index, id);
                Ok(())
            }))
            .await
            .with_context(|| format!("Failed to remove line from quotation {}", id))
    }

    /// Apply raw input to a quotation default
    pub async fn update_default(&self, id: Uuid, field: DefaultField, raw: &str) -> Result<QuotationForm> {
        self.repo
            .modify(id, edit(|form| {
                form.update_default(field, raw);
                Ok(())
            }))
            .await
    }

    /// Current status summary of a quotation
    pub async fn summary(&self, id: Uuid) -> Result<QuotationSummary> {
        Ok(self.load(id).await?.summary().clone())
    }

    /// Close the editing session and return the document for the backend
    pub async fn submit_quotation(&self, id: Uuid) -> Result<QuotationDocument> {
        let form = self.repo.remove(id).await?
            .ok_or_else(|| Error::QuotationNotFound(format!("Quotation not found: {}", id)))?;
        info!("Submitting quotation {} with {} lines", id, form.lines().len());
        Ok(form.document())
    }

    /// Price a single line without a session
    pub fn price_line(&self, line: &QuotationLine, defaults: Option<&QuotationDefaults>) -> LineOutcome {
        match defaults {
            Some(defaults) => price_line(line, defaults),
            None => price_line(line, &self.config.quotation_defaults()),
        }
    }

    async fn load(&self, id: Uuid) -> Result<QuotationForm> {
        self.repo.get(id).await
            .with_context(|| format!("Failed to retrieve quotation {}", id))?
            .ok_or_else(|| Error::QuotationNotFound(format!("Quotation not found: {}", id)))
    }
}

fn edit<'a, F>(f: F) -> FormEdit<'a>
where
    F: FnOnce(&mut QuotationForm) -> Result<()> + Send + 'a,
{
    Box::new(f)
}

impl Default for QuotationService {
    fn default() -> Self {
        Self::new()
    }
}
