//! Quotation form controller
//!
//! One editing session for one quotation. The form owns the ordered line
//! array and keeps every line's derived rates and the status summary in step
//! with its inputs: each edit reprices the affected line (or every line, for
//! a quotation default) and rebuilds the summary before returning.

use chrono::{DateTime, Utc};
use common::decimal::{parse_decimal, parse_flag, parse_or_zero};
use common::error::{Error, Result};
use common::model::quotation::{
    DefaultField, LineField, LineStatus, PricedLine, QuotationDefaults, QuotationDocument,
    QuotationLine,
};
use common::model::summary::QuotationSummary;
use pricing_engine::{line_cost_sum, price_line, summarize};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// Editing session for one quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationForm {
    id: Uuid,
    defaults: QuotationDefaults,
    lines: Vec<PricedLine>,
    summary: QuotationSummary,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuotationForm {
    /// Open an empty quotation
    pub fn new(defaults: QuotationDefaults) -> Self {
        let now = Utc::now();
        let mut form = Self {
            id: Uuid::new_v4(),
            defaults,
            lines: Vec::new(),
            summary: QuotationSummary::empty(),
            created_at: now,
            updated_at: now,
        };
        form.refresh_summary();
        form
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn defaults(&self) -> &QuotationDefaults {
        &self.defaults
    }

    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&PricedLine> {
        self.lines.get(index)
    }

    pub fn summary(&self) -> &QuotationSummary {
        &self.summary
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the form is ready for another line: it is empty, or its last
    /// line names a vendor and has a positive quantity.
    pub fn can_add_line(&self) -> bool {
        self.lines
            .last()
            .map_or(true, |priced| priced.line.is_complete())
    }

    /// Append a blank line (quantity 1, status `current`) and return its index
    pub fn add_line(&mut self) -> usize {
        self.push_line(QuotationLine::new())
    }

    /// Append a prepared line. A missing cost sum is derived from quantity
    /// and buy rate.
    pub fn push_line(&mut self, mut line: QuotationLine) -> usize {
        if line.cost_sum.is_none() {
            recompute_cost_sum(&mut line);
        }
        let outcome = price_line(&line, &self.defaults);
        self.lines.push(PricedLine { line, outcome });
        self.touch();
        self.refresh_summary();
        self.lines.len() - 1
    }

    /// Remove a line, returning its inputs
    pub fn remove_line(&mut self, index: usize) -> Result<QuotationLine> {
        self.check_index(index)?;
        let removed = self.lines.remove(index);
        self.touch();
        self.refresh_summary();
        Ok(removed.line)
    }

    /// Apply raw form input to one line field.
    ///
    /// Numeric input that does not parse is coerced: to zero for quantity,
    /// buy rate and cost sum, to "not set" for the rate of exchange, the
    /// markup and the manual client rate. Editing quantity or buy rate
    /// recomputes the cost sum.
    pub fn update_field(&mut self, index: usize, field: LineField, raw: &str) -> Result<&PricedLine> {
        self.check_index(index)?;

        let priced = &mut self.lines[index];
        apply_line_field(&mut priced.line, field, raw);
        if field.affects_pricing() {
            priced.outcome = price_line(&priced.line, &self.defaults);
            debug!("Repriced line {} of quotation {} after {:?} edit", index, self.id, field);
            if let Some(issue) = priced.outcome.issue() {
                warn!("Line {} of quotation {} cannot be priced: {}", index, self.id, issue);
            }
        }

        self.touch();
        self.refresh_summary();
        Ok(&self.lines[index])
    }

    /// Apply raw form input to a quotation default and reprice every line
    pub fn update_default(&mut self, field: DefaultField, raw: &str) {
        match field {
            DefaultField::UsdRoe => self.defaults.usd_roe = parse_decimal(raw),
            DefaultField::GeneralMu => self.defaults.general_mu = parse_decimal(raw),
            DefaultField::Caf => self.defaults.caf = parse_decimal(raw),
            DefaultField::RoundUpRateToClient => {
                self.defaults.round_up_rate_to_client = parse_flag(raw)
            }
        }

        for priced in &mut self.lines {
            priced.outcome = price_line(&priced.line, &self.defaults);
        }
        debug!("Repriced {} lines of quotation {} after {:?} edit", self.lines.len(), self.id, field);

        self.touch();
        self.refresh_summary();
    }

    /// Snapshot of the whole quotation for hand-off to the backend
    pub fn document(&self) -> QuotationDocument {
        QuotationDocument {
            id: self.id,
            defaults: self.defaults.clone(),
            lines: self.lines.clone(),
            summary: self.summary.clone(),
            created_at: self.created_at,
            submitted_at: Utc::now(),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.lines.len() {
            Ok(())
        } else {
            Err(Error::LineNotFound(format!(
                "Quotation {} has {} lines, no line at index {}",
                self.id,
                self.lines.len(),
                index
            )))
        }
    }

    fn refresh_summary(&mut self) {
        self.summary = summarize(self.lines.iter().map(|priced| &priced.line), &self.defaults);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn apply_line_field(line: &mut QuotationLine, field: LineField, raw: &str) {
    match field {
        LineField::VendorId => line.vendor_id = raw.trim().to_string(),
        LineField::ItemName => line.item_name = raw.to_string(),
        LineField::Currency => {
            let code = raw.trim();
            line.currency = (!code.is_empty()).then(|| code.to_string());
        }
        LineField::Quantity => {
            line.quantity = parse_or_zero(raw);
            recompute_cost_sum(line);
        }
        LineField::BuyRate => {
            line.buy_rate = parse_or_zero(raw);
            recompute_cost_sum(line);
        }
        LineField::CostSum => line.cost_sum = Some(parse_or_zero(raw)),
        LineField::Roe => line.roe = parse_decimal(raw),
        LineField::MuPercent => line.mu_percent = parse_decimal(raw),
        LineField::Status => line.status = LineStatus::from(raw),
        LineField::Fixed => line.fixed = parse_flag(raw),
        LineField::FixedRateToClient => line.fixed_rate_to_client = parse_decimal(raw),
    }
}

fn recompute_cost_sum(line: &mut QuotationLine) {
    let cost_sum = line_cost_sum(line.quantity, line.buy_rate).unwrap_or_else(|issue| {
        warn!("Cost sum for vendor '{}' reset to zero: {}", line.vendor_id, issue);
        Decimal::ZERO
    });
    line.cost_sum = Some(cost_sum);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_index_is_line_not_found() {
        let mut form = QuotationForm::new(QuotationDefaults::default());
        let err = form.update_field(0, LineField::Quantity, "2").unwrap_err();
        assert!(matches!(err, Error::LineNotFound(_)));
        assert!(form.remove_line(3).is_err());
    }
}
