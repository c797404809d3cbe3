pub mod calculator;
pub mod aggregator;

pub use calculator::{
    base_rates, client_rate, effective_cost_sum, line_cost_sum, price_line, resolve_caf,
    resolve_markup, resolve_roe, BaseRates,
};
pub use aggregator::{summarize, BucketTotals};
