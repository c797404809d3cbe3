//! Decimal type utilities for quotation pricing
//!
//! Also home to the coercion rules for raw form input.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
pub use rust_decimal_macros::dec;

/// Rate type (buy rates, quoted rates, client rates)
pub type Rate = Decimal;

/// Quantity type
pub type Quantity = Decimal;

/// Amount type (typically Rate * Quantity)
pub type Amount = Decimal;

/// Percentage expressed in whole percent (25 means 25%)
pub type Percent = Decimal;

/// Parse raw form input as a decimal.
///
/// Surrounding whitespace is ignored, and plain as well as scientific
/// notation is accepted. Returns `None` for empty or non-numeric input.
/// Parsing is strict: a numeric prefix such as `"12abc"` is rejected,
/// not read as 12.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parse raw form input, falling back to `default` when it is empty or not a number.
///
/// Malformed numeric input never fails: this is the single place where the
/// console silently turns garbage into a known value.
pub fn parse_or_default(raw: &str, default: Decimal) -> Decimal {
    parse_decimal(raw).unwrap_or(default)
}

/// Parse raw form input, treating malformed input as zero
pub fn parse_or_zero(raw: &str) -> Decimal {
    parse_or_default(raw, Decimal::ZERO)
}

/// Checkbox-style input: "true", "1", "yes" and "on" are set, in any case;
/// anything else is clear
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Precision helpers for display strings
pub mod precision {
    use super::*;

    /// Decimal places shown for amounts (cost, markup, sale)
    pub const AMOUNT_PRECISION: u32 = 2;

    /// Decimal places shown for percentages
    pub const PERCENT_PRECISION: u32 = 1;

    /// Round half away from zero, normalising a negative zero result
    pub fn round_display(value: Decimal, dp: u32) -> Decimal {
        let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            Decimal::ZERO
        } else {
            rounded
        }
    }

    /// Format an amount with two decimal places ("1312.50")
    pub fn format_amount(value: Amount) -> String {
        format!(
            "{:.prec$}",
            round_display(value, AMOUNT_PRECISION),
            prec = AMOUNT_PRECISION as usize
        )
    }

    /// Format a percentage with one decimal place and a percent sign ("16.7%")
    pub fn format_percent(value: Percent) -> String {
        format!(
            "{:.prec$}%",
            round_display(value, PERCENT_PRECISION),
            prec = PERCENT_PRECISION as usize
        )
    }
}
