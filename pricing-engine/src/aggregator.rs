//! Status aggregator
//!
//! Groups quotation lines by status bucket and produces the read-only
//! financial summary shown next to the line editor.

use std::collections::BTreeMap;

use common::decimal::{Amount, Percent, Rate};
use common::model::quotation::{QuotationDefaults, QuotationLine, StatusBucket};
use common::model::summary::{BucketSummary, QuotationSummary};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::calculator::{
    base_rates, client_rate, effective_cost_sum, resolve_caf, resolve_markup, resolve_roe,
};

/// Running sums for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketTotals {
    pub cost: Amount,
    pub markup: Amount,
    pub qt_rate: Rate,
    pub line_count: usize,
    pub skipped_lines: usize,
}

impl BucketTotals {
    /// Add one line's steps 1-3 to the bucket. Lines that cannot be priced,
    /// or whose amounts would overflow the totals, are counted as skipped.
    fn add(&mut self, line: &QuotationLine, defaults: &QuotationDefaults) {
        let roe = resolve_roe(line.roe, defaults);
        let mu_percent = resolve_markup(line.mu_percent, defaults);

        let base = effective_cost_sum(line).and_then(|cost_sum| base_rates(cost_sum, roe, mu_percent));
        let sums = base.ok().and_then(|base| {
            Some((
                self.cost.checked_add(base.cost_usd)?,
                self.markup.checked_add(base.mu_amount)?,
                self.qt_rate.checked_add(base.qt_rate)?,
            ))
        });

        match sums {
            Some((cost, markup, qt_rate)) => {
                self.cost = cost;
                self.markup = markup;
                self.qt_rate = qt_rate;
                self.line_count += 1;
            }
            None => {
                debug!("Skipping unpriceable {} line for vendor '{}'", line.status, line.vendor_id);
                self.skipped_lines += 1;
            }
        }
    }

    /// Apply the currency adjustment factor once to the summed quoted rate
    /// and format the display row.
    pub fn into_summary(self, defaults: &QuotationDefaults) -> BucketSummary {
        let caf = resolve_caf(defaults);
        let sale = client_rate(self.qt_rate, caf, defaults.round_up_rate_to_client)
            .unwrap_or_else(|issue| {
                warn!("Bucket sale could not be adjusted ({}), showing the quoted rate", issue);
                self.qt_rate
            });

        BucketSummary::from_amounts(
            self.cost,
            self.markup,
            sale,
            profit_rate(sale, self.cost),
            self.line_count,
            self.skipped_lines,
        )
    }
}

/// `(sale - cost) / sale * 100`, zero for a zero sale
fn profit_rate(sale: Amount, cost: Amount) -> Percent {
    if sale.is_zero() {
        return Decimal::ZERO;
    }
    sale.checked_sub(cost)
        .and_then(|profit| profit.checked_div(sale))
        .and_then(|share| share.checked_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO)
}

/// Summarise lines per status bucket.
///
/// Lines whose status is not one of the four tracked buckets (`inactive`
/// or anything unrecognised) contribute to no bucket. Buckets without
/// lines report zeros.
pub fn summarize<'a, I>(lines: I, defaults: &QuotationDefaults) -> QuotationSummary
where
    I: IntoIterator<Item = &'a QuotationLine>,
{
    let mut totals: BTreeMap<StatusBucket, BucketTotals> = StatusBucket::ALL
        .iter()
        .map(|bucket| (*bucket, BucketTotals::default()))
        .collect();

    for line in lines {
        if let Some(bucket) = line.status.bucket() {
            totals.entry(bucket).or_default().add(line, defaults);
        }
    }

    let mut summary = QuotationSummary::empty();
    for (bucket, bucket_totals) in totals {
        summary.insert(bucket, bucket_totals.into_summary(defaults));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profit_rate_of_zero_sale_is_zero() {
        assert_eq!(profit_rate(Decimal::ZERO, dec!(10)), Decimal::ZERO);
        assert_eq!(profit_rate(dec!(200), dec!(150)), dec!(25));
    }
}
