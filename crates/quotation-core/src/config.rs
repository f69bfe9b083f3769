//! Engine configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable               | Default                | Meaning                          |
//! |------------------------|------------------------|----------------------------------|
//! | `QUOTE_BASE_CURRENCY`  | `USD`                  | base when an itinerary has none  |
//! | `QUOTE_EXCHANGE_RATES` | `EUR=0.92,INR=83.36`   | seed rate table for new quotes   |
//! | `QUOTE_ASSUME_RATE`    | unset (reject)         | fallback rate for unknown codes  |

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::{ExchangeRates, MissingRatePolicy, DEFAULT_BASE_CURRENCY};
use crate::validation::{validate_currency_code, validate_rate};

const DEFAULT_EXCHANGE_RATES: &str = "EUR=0.92,INR=83.36";

/// Pricing engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Base currency for itineraries that do not name one
    pub base_currency: String,

    /// Rate table seeded into new quotations
    pub default_exchange_rates: ExchangeRates,

    /// What display conversion does with an unknown currency
    #[serde(default)]
    pub missing_rate_policy: MissingRatePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            // The literal table is known-good
            default_exchange_rates: parse_rates(DEFAULT_EXCHANGE_RATES).unwrap_or_default(),
            missing_rate_policy: MissingRatePolicy::Reject,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_currency = lookup("QUOTE_BASE_CURRENCY")
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string());
        validate_currency_code(&base_currency)
            .map_err(|_| ConfigError::InvalidValue("QUOTE_BASE_CURRENCY".to_string()))?;

        let default_exchange_rates = parse_rates(
            &lookup("QUOTE_EXCHANGE_RATES").unwrap_or_else(|| DEFAULT_EXCHANGE_RATES.to_string()),
        )?
        .without(&base_currency);

        let missing_rate_policy = match lookup("QUOTE_ASSUME_RATE") {
            None => MissingRatePolicy::Reject,
            Some(raw) => {
                let rate = Decimal::from_str(raw.trim())
                    .map_err(|_| ConfigError::InvalidValue("QUOTE_ASSUME_RATE".to_string()))?;
                validate_rate("QUOTE_ASSUME_RATE", rate)
                    .map_err(|_| ConfigError::InvalidValue("QUOTE_ASSUME_RATE".to_string()))?;
                MissingRatePolicy::AssumeRate { rate }
            }
        };

        Ok(EngineConfig {
            base_currency,
            default_exchange_rates,
            missing_rate_policy,
        })
    }
}

/// Parses `CODE=rate` pairs separated by commas.
fn parse_rates(raw: &str) -> Result<ExchangeRates, ConfigError> {
    let invalid = || ConfigError::InvalidValue("QUOTE_EXCHANGE_RATES".to_string());

    let mut rates = ExchangeRates::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (code, rate) = pair.split_once('=').ok_or_else(invalid)?;
        let rate = Decimal::from_str(rate.trim()).map_err(|_| invalid())?;
        rates.insert(code.trim(), rate).map_err(|_| invalid())?;
    }
    Ok(rates)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.default_exchange_rates.get("INR"), Some(dec!(83.36)));
        assert_eq!(config.missing_rate_policy, MissingRatePolicy::Reject);
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("QUOTE_BASE_CURRENCY", "EUR"),
            ("QUOTE_EXCHANGE_RATES", "USD=1.087, EUR=1, GBP=0.85"),
            ("QUOTE_ASSUME_RATE", "1"),
        ]))
        .unwrap();

        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.default_exchange_rates.get("EUR"), None);
        assert_eq!(config.default_exchange_rates.get("GBP"), Some(dec!(0.85)));
        assert_eq!(
            config.missing_rate_policy,
            MissingRatePolicy::AssumeRate { rate: dec!(1) }
        );
    }

    #[test]
    fn test_invalid_values() {
        for vars in [
            [("QUOTE_BASE_CURRENCY", "")],
            [("QUOTE_BASE_CURRENCY", "dollars")],
            [("QUOTE_EXCHANGE_RATES", "EUR:0.92")],
            [("QUOTE_EXCHANGE_RATES", "EUR=-1")],
            [("QUOTE_ASSUME_RATE", "0")],
        ] {
            assert!(
                EngineConfig::from_lookup(lookup(&vars)).is_err(),
                "{:?} should be rejected",
                vars
            );
        }
    }
}
