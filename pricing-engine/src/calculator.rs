//! Line calculator
//!
//! Derives a quotation line's rates from its cost, its rate of exchange and
//! its markup, then applies the quotation's currency adjustment factor:
//!
//! 1. `cost_usd = cost_sum / roe`
//! 2. `mu_amount = cost_usd * mu_percent / 100`
//! 3. `qt_rate = cost_usd + mu_amount`
//! 4. `rate_to_client = qt_rate * (1 + caf / 100)`, skipped when `caf` is zero
//! 5. `rate_to_client = ceil(rate_to_client)` when rounding up is enabled
//!
//! Nothing is rounded except in step 5. A zero rate of exchange or an amount
//! outside the decimal range yields a [`LineIssue`] instead of a value.

use common::decimal::{Amount, Percent, Quantity, Rate};
use common::model::quotation::{
    LineIssue, LineOutcome, LinePricing, QuotationDefaults, QuotationLine, FALLBACK_CAF,
    FALLBACK_MARKUP, FALLBACK_ROE,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = dec!(100);

/// Rates produced by steps 1-3, before the currency adjustment factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseRates {
    pub cost_usd: Amount,
    pub mu_amount: Amount,
    pub qt_rate: Rate,
}

/// Line value, then quotation value, then the built-in constant
fn resolve(line: Option<Decimal>, quotation: Option<Decimal>, fallback: Decimal) -> Decimal {
    match (line, quotation) {
        (Some(value), _) => value,
        (None, Some(value)) => value,
        (None, None) => fallback,
    }
}

/// Rate of exchange for a line: line `roe`, then `usd_roe`, then 1.00
pub fn resolve_roe(line_roe: Option<Rate>, defaults: &QuotationDefaults) -> Rate {
    resolve(line_roe, defaults.usd_roe, FALLBACK_ROE)
}

/// Markup percentage for a line: line `mu_percent`, then `general_mu`, then 25.00
pub fn resolve_markup(line_mu: Option<Percent>, defaults: &QuotationDefaults) -> Percent {
    resolve(line_mu, defaults.general_mu, FALLBACK_MARKUP)
}

/// Currency adjustment factor: quotation `caf`, then 5.00. There is no per-line CAF.
pub fn resolve_caf(defaults: &QuotationDefaults) -> Percent {
    resolve(None, defaults.caf, FALLBACK_CAF)
}

/// Source-currency cost of a line
pub fn line_cost_sum(quantity: Quantity, buy_rate: Rate) -> Result<Amount, LineIssue> {
    quantity
        .checked_mul(buy_rate)
        .ok_or(LineIssue::ArithmeticOverflow)
}

/// Cost sum a line is priced from: the one entered, else `quantity * buy_rate`
pub fn effective_cost_sum(line: &QuotationLine) -> Result<Amount, LineIssue> {
    match line.cost_sum {
        Some(cost_sum) => Ok(cost_sum),
        None => line_cost_sum(line.quantity, line.buy_rate),
    }
}

/// Steps 1-3: convert the cost and add the markup
pub fn base_rates(cost_sum: Amount, roe: Rate, mu_percent: Percent) -> Result<BaseRates, LineIssue> {
    if roe.is_zero() {
        return Err(LineIssue::ZeroExchangeRate);
    }

    let cost_usd = cost_sum
        .checked_div(roe)
        .ok_or(LineIssue::ArithmeticOverflow)?;
    let mu_amount = cost_usd
        .checked_mul(mu_percent)
        .and_then(|amount| amount.checked_div(HUNDRED))
        .ok_or(LineIssue::ArithmeticOverflow)?;
    let qt_rate = cost_usd
        .checked_add(mu_amount)
        .ok_or(LineIssue::ArithmeticOverflow)?;

    Ok(BaseRates {
        cost_usd,
        mu_amount,
        qt_rate,
    })
}

/// Steps 4-5: apply the currency adjustment factor and the optional ceiling
pub fn client_rate(qt_rate: Rate, caf: Percent, round_up: bool) -> Result<Rate, LineIssue> {
    let rate = if caf.is_zero() {
        qt_rate
    } else {
        let factor = caf
            .checked_div(HUNDRED)
            .and_then(|share| Decimal::ONE.checked_add(share))
            .ok_or(LineIssue::ArithmeticOverflow)?;
        qt_rate
            .checked_mul(factor)
            .ok_or(LineIssue::ArithmeticOverflow)?
    };

    Ok(if round_up { rate.ceil() } else { rate })
}

/// Price one line against the quotation defaults.
///
/// A `fixed` line with a manual rate keeps that rate as its client rate;
/// its other derived fields are still computed.
pub fn price_line(line: &QuotationLine, defaults: &QuotationDefaults) -> LineOutcome {
    let roe = resolve_roe(line.roe, defaults);
    let mu_percent = resolve_markup(line.mu_percent, defaults);
    let caf = resolve_caf(defaults);

    let cost_sum = match effective_cost_sum(line) {
        Ok(cost_sum) => cost_sum,
        Err(issue) => return LineOutcome::Invalid { issue },
    };

    let priced = base_rates(cost_sum, roe, mu_percent).and_then(|base| {
        let rate_to_client = match (line.fixed, line.fixed_rate_to_client) {
            (true, Some(manual)) => manual,
            _ => client_rate(base.qt_rate, caf, defaults.round_up_rate_to_client)?,
        };
        Ok(LinePricing {
            cost_sum,
            cost_usd: base.cost_usd,
            mu_amount: base.mu_amount,
            qt_rate: base.qt_rate,
            rate_to_client,
        })
    });

    match priced {
        Ok(pricing) => LineOutcome::Priced(pricing),
        Err(issue) => LineOutcome::Invalid { issue },
    }
}
