//! Configuration for the quotation service

use std::env;
use std::fmt::Display;

use common::decimal::{parse_decimal, parse_flag, Percent, Rate};
use common::error::{Error, Result};
use common::model::quotation::{QuotationDefaults, FALLBACK_CAF, FALLBACK_MARKUP, FALLBACK_ROE};
use tracing::warn;

/// Configuration for the quotation service
#[derive(Debug, Clone)]
pub struct QuotationServiceConfig {
    /// Rate of exchange new quotations start with
    pub default_usd_roe: Rate,
    /// Markup percentage new quotations start with
    pub default_general_mu: Percent,
    /// Currency adjustment factor new quotations start with
    pub default_caf: Percent,
    /// Whether new quotations round client rates up
    pub round_up_rate_to_client: bool,
    /// Maximum number of open editing sessions, 0 for no limit
    pub max_open_quotations: usize,
}

/// Reads the environment, replacing malformed values with the built-in
/// defaults after logging a warning.
impl Default for QuotationServiceConfig {
    fn default() -> Self {
        Self {
            default_usd_roe: or_fallback(env_value("DEFAULT_USD_ROE", parse_decimal), FALLBACK_ROE),
            default_general_mu: or_fallback(env_value("DEFAULT_GENERAL_MU", parse_decimal), FALLBACK_MARKUP),
            default_caf: or_fallback(env_value("DEFAULT_CAF", parse_decimal), FALLBACK_CAF),
            round_up_rate_to_client: env_flag("ROUND_UP_RATE_TO_CLIENT"),
            max_open_quotations: or_fallback(env_value("MAX_OPEN_QUOTATIONS", parse_count), 0),
        }
    }
}

impl QuotationServiceConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables, rejecting
    /// malformed values with a configuration error
    pub fn try_from_env() -> Result<Self> {
        Ok(Self {
            default_usd_roe: env_value("DEFAULT_USD_ROE", parse_decimal)?.unwrap_or(FALLBACK_ROE),
            default_general_mu: env_value("DEFAULT_GENERAL_MU", parse_decimal)?.unwrap_or(FALLBACK_MARKUP),
            default_caf: env_value("DEFAULT_CAF", parse_decimal)?.unwrap_or(FALLBACK_CAF),
            round_up_rate_to_client: env_flag("ROUND_UP_RATE_TO_CLIENT"),
            max_open_quotations: env_value("MAX_OPEN_QUOTATIONS", parse_count)?.unwrap_or(0),
        })
    }

    /// Create a new configuration with custom values
    pub fn new(
        default_usd_roe: Rate,
        default_general_mu: Percent,
        default_caf: Percent,
        round_up_rate_to_client: bool,
        max_open_quotations: usize,
    ) -> Self {
        Self {
            default_usd_roe,
            default_general_mu,
            default_caf,
            round_up_rate_to_client,
            max_open_quotations,
        }
    }

    /// Defaults for a newly opened quotation
    pub fn quotation_defaults(&self) -> QuotationDefaults {
        QuotationDefaults {
            usd_roe: Some(self.default_usd_roe),
            general_mu: Some(self.default_general_mu),
            caf: Some(self.default_caf),
            round_up_rate_to_client: self.round_up_rate_to_client,
        }
    }
}

/// Unset or blank variables are `Ok(None)`
fn env_value<T>(name: &str, parse: impl FnOnce(&str) -> Option<T>) -> Result<Option<T>> {
    let raw = match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    parse(&raw).map(Some).ok_or_else(|| {
        Error::ConfigurationError(format!("{} has an invalid value '{}'", name, raw))
    })
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|raw| parse_flag(&raw)).unwrap_or(false)
}

fn parse_count(raw: &str) -> Option<usize> {
    raw.trim().parse().ok()
}

fn or_fallback<T: Display>(value: Result<Option<T>>, fallback: T) -> T {
    match value {
        Ok(Some(value)) => value,
        Ok(None) => fallback,
        Err(err) => {
            warn!("{}, using {}", err, fallback);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::decimal::dec;

    #[test]
    fn malformed_variable_is_a_configuration_error() {
        env::set_var("QUOTATION_CONFIG_TEST_MALFORMED", "1.2.3");
        let result = env_value("QUOTATION_CONFIG_TEST_MALFORMED", parse_decimal);
        assert!(matches!(result, Err(Error::ConfigurationError(_))));

        assert_eq!(or_fallback(result, dec!(25)), dec!(25));
    }

    #[test]
    fn unset_and_blank_variables_are_absent() {
        assert!(matches!(env_value("QUOTATION_CONFIG_TEST_UNSET", parse_count), Ok(None)));

        env::set_var("QUOTATION_CONFIG_TEST_BLANK", "  ");
        assert!(matches!(env_value("QUOTATION_CONFIG_TEST_BLANK", parse_count), Ok(None)));
    }

    #[test]
    fn valid_variables_are_parsed() {
        env::set_var("QUOTATION_CONFIG_TEST_CAF", " 7.5 ");
        assert_eq!(env_value("QUOTATION_CONFIG_TEST_CAF", parse_decimal).unwrap(), Some(dec!(7.5)));

        env::set_var("QUOTATION_CONFIG_TEST_ROUND_UP", "Yes");
        assert!(env_flag("QUOTATION_CONFIG_TEST_ROUND_UP"));
    }
}
