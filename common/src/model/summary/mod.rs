//! Per-status financial summary models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::decimal::precision::{format_amount, format_percent};
use crate::decimal::{Amount, Percent};
use crate::model::quotation::StatusBucket;
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Display row for one status bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct BucketSummary {
    /// Total converted cost, two decimals
    pub cost: String,
    /// Total markup, two decimals
    pub markup: String,
    /// Sale after the currency adjustment factor, two decimals
    pub sale: String,
    /// Profit share of the sale, one decimal and a percent sign
    pub profit_rate: String,
    /// Lines counted in this bucket
    pub line_count: usize,
    /// Lines with this status that could not be priced
    pub skipped_lines: usize,
}

impl BucketSummary {
    pub fn from_amounts(
        cost: Amount,
        markup: Amount,
        sale: Amount,
        profit_rate: Percent,
        line_count: usize,
        skipped_lines: usize,
    ) -> Self {
        Self {
            cost: format_amount(cost),
            markup: format_amount(markup),
            sale: format_amount(sale),
            profit_rate: format_percent(profit_rate),
            line_count,
            skipped_lines,
        }
    }

    /// All-zero row for a bucket without lines
    pub fn empty() -> Self {
        Self::from_amounts(Amount::ZERO, Amount::ZERO, Amount::ZERO, Percent::ZERO, 0, 0)
    }
}

/// Summary rows keyed by status bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotationSummary {
    buckets: BTreeMap<StatusBucket, BucketSummary>,
}

impl QuotationSummary {
    /// Summary with an empty row for every bucket
    pub fn empty() -> Self {
        Self {
            buckets: StatusBucket::ALL
                .iter()
                .map(|bucket| (*bucket, BucketSummary::empty()))
                .collect(),
        }
    }

    pub fn insert(&mut self, bucket: StatusBucket, summary: BucketSummary) {
        self.buckets.insert(bucket, summary);
    }

    /// Row for a bucket
    pub fn get(&self, bucket: StatusBucket) -> Option<&BucketSummary> {
        self.buckets.get(&bucket)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StatusBucket, &BucketSummary)> {
        self.buckets.iter()
    }
}

impl Default for QuotationSummary {
    fn default() -> Self {
        Self::empty()
    }
}
