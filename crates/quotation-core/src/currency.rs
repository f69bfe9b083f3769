//! # Currency Module
//!
//! Exchange-rate tables and display-currency conversion.
//!
//! ## Rate Table Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base = USD        rates = { EUR: 0.92, INR: 83.13 }                   │
//! │                                                                         │
//! │  "0.92 EUR per 1 USD"                                                   │
//! │                                                                         │
//! │  USD → EUR :  amount × rates[EUR]                                       │
//! │  EUR → USD :  amount ÷ rates[EUR]                                       │
//! │  EUR → INR :  (amount ÷ rates[EUR]) × rates[INR]   (pivot via base)    │
//! │  X   → X   :  amount, untouched                                         │
//! │                                                                         │
//! │  The base currency is never stored in the table; its rate is 1.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A code missing from the table is a [`CoreError::Conversion`] unless the
//! caller explicitly opts into [`MissingRatePolicy::AssumeRate`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::validation::{validate_currency_code, validate_rate};

/// Base currency used when nothing else is configured.
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

// =============================================================================
// Exchange Rates
// =============================================================================

/// Map of currency code → units of that currency per 1 unit of base.
///
/// Ordered so that serialized documents are stable. Codes and rates are
/// validated on insert and when a document is deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ExchangeRates(BTreeMap<String, Decimal>);

impl ExchangeRates {
    /// Creates an empty rate table.
    pub fn new() -> Self {
        ExchangeRates(BTreeMap::new())
    }

    /// Builds a table from `(code, rate)` pairs, validating each one.
    pub fn from_pairs<I, S>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        let mut rates = ExchangeRates::new();
        for (code, rate) in pairs {
            rates.insert(code, rate)?;
        }
        Ok(rates)
    }

    /// Inserts or replaces a rate.
    pub fn insert(&mut self, code: impl Into<String>, rate: Decimal) -> CoreResult<()> {
        let code = code.into();
        validate_currency_code(&code)?;
        validate_rate(&code, rate)?;
        self.0.insert(code, rate);
        Ok(())
    }

    /// Returns the stored rate for a code.
    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.0.get(code).copied()
    }

    /// Returns a copy of the table without the given code.
    pub fn without(&self, code: &str) -> Self {
        let mut rates = self.clone();
        rates.0.remove(code);
        rates
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    /// Checks a table relative to its base currency.
    ///
    /// ## Rules
    /// - Every code is three uppercase letters
    /// - Every rate is strictly positive
    /// - The base currency itself is not listed (its rate is implicitly 1)
    pub fn validate(&self, base: &str) -> CoreResult<()> {
        for (code, rate) in self.iter() {
            validate_currency_code(code)?;
            validate_rate(code, rate)?;
            if code == base {
                return Err(crate::error::ValidationError::InvalidFormat {
                    field: "exchangeRates".to_string(),
                    reason: format!("base currency {} must not be listed", base),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for ExchangeRates {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Decimal>::deserialize(deserializer)?;
        ExchangeRates::from_pairs(raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Currency Settings
// =============================================================================

/// Currency configuration stored on a quotation.
///
/// Deserializing runs [`CurrencySettings::validate`], so a loaded document
/// never lists its own base currency in the rate table.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySettings {
    /// Currency every stored monetary field is expressed in.
    pub base_currency: String,
    /// Currency last chosen for presentation. Never affects stored values.
    pub display_currency: String,
    #[ts(type = "Record<string, string>")]
    pub exchange_rates: ExchangeRates,
}

impl CurrencySettings {
    /// Settings that display in the base currency.
    pub fn new(base_currency: impl Into<String>, exchange_rates: ExchangeRates) -> Self {
        let base_currency = base_currency.into();
        CurrencySettings {
            display_currency: base_currency.clone(),
            exchange_rates: exchange_rates.without(&base_currency),
            base_currency,
        }
    }

    /// Validates codes and the rate table.
    pub fn validate(&self) -> CoreResult<()> {
        validate_currency_code(&self.base_currency)?;
        validate_currency_code(&self.display_currency)?;
        self.exchange_rates.validate(&self.base_currency)
    }

    /// A converter bound to these settings.
    pub fn converter(&self, policy: MissingRatePolicy) -> CurrencyConverter<'_> {
        CurrencyConverter::new(&self.base_currency, &self.exchange_rates).with_policy(policy)
    }
}

impl<'de> Deserialize<'de> for CurrencySettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RawCurrencySettings {
            base_currency: String,
            display_currency: String,
            exchange_rates: ExchangeRates,
        }

        let raw = RawCurrencySettings::deserialize(deserializer)?;
        let settings = CurrencySettings {
            base_currency: raw.base_currency,
            display_currency: raw.display_currency,
            exchange_rates: raw.exchange_rates,
        };
        settings.validate().map_err(serde::de::Error::custom)?;
        Ok(settings)
    }
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings::new(DEFAULT_BASE_CURRENCY, ExchangeRates::new())
    }
}

// =============================================================================
// Missing Rate Policy
// =============================================================================

/// What to do when a currency code is absent from the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum MissingRatePolicy {
    /// Fail with `CoreError::Conversion`.
    #[default]
    Reject,
    /// Use this rate instead. Must be positive.
    AssumeRate { rate: Decimal },
}

// =============================================================================
// Converter
// =============================================================================

/// Pure converter over a base currency and its rate table.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyConverter<'a> {
    base: &'a str,
    rates: &'a ExchangeRates,
    policy: MissingRatePolicy,
}

impl<'a> CurrencyConverter<'a> {
    pub fn new(base: &'a str, rates: &'a ExchangeRates) -> Self {
        CurrencyConverter {
            base,
            rates,
            policy: MissingRatePolicy::Reject,
        }
    }

    pub fn with_policy(mut self, policy: MissingRatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base(&self) -> &str {
        self.base
    }

    /// Rate of `code` relative to the base currency.
    fn rate_for(&self, code: &str, from: &str, to: &str) -> CoreResult<Decimal> {
        if code == self.base {
            return Ok(Decimal::ONE);
        }

        let rate = match (self.rates.get(code), self.policy) {
            (Some(rate), _) => rate,
            (None, MissingRatePolicy::AssumeRate { rate }) => rate,
            (None, MissingRatePolicy::Reject) => {
                return Err(CoreError::missing_rate(from, to, code));
            }
        };

        if rate <= Decimal::ZERO {
            return Err(CoreError::Conversion {
                from: from.to_string(),
                to: to.to_string(),
                reason: format!("exchange rate for {} must be positive", code),
            });
        }
        Ok(rate)
    }

    /// Converts an amount between two currencies.
    ///
    /// The result is exact (not rounded); rounding is a presentation concern.
    /// A result outside the `Decimal` range is a `Conversion` error.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> CoreResult<Decimal> {
        if from == to {
            return Ok(amount);
        }

        let in_base = if from == self.base {
            amount
        } else {
            let from_rate = self.rate_for(from, from, to)?;
            amount
                .checked_div(from_rate)
                .ok_or_else(|| CoreError::conversion_overflow(from, to))?
        };
        if to == self.base {
            return Ok(in_base);
        }

        let to_rate = self.rate_for(to, from, to)?;
        in_base
            .checked_mul(to_rate)
            .ok_or_else(|| CoreError::conversion_overflow(from, to))
    }
}

/// Converts `amount` from one currency to another, rejecting unknown codes.
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use quotation_core::currency::{convert, ExchangeRates};
///
/// let rates = ExchangeRates::from_pairs([("EUR", dec!(0.92)), ("INR", dec!(83.13))]).unwrap();
/// assert_eq!(convert(dec!(100), "USD", "EUR", &rates, "USD").unwrap(), dec!(92.00));
/// assert!(convert(dec!(100), "USD", "JPY", &rates, "USD").is_err());
/// ```
pub fn convert(
    amount: Decimal,
    from: &str,
    to: &str,
    rates: &ExchangeRates,
    base: &str,
) -> CoreResult<Decimal> {
    CurrencyConverter::new(base, rates).convert(amount, from, to)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::round_money;
    use rust_decimal_macros::dec;

    fn rates() -> ExchangeRates {
        ExchangeRates::from_pairs([("EUR", dec!(0.92)), ("INR", dec!(83.13))]).unwrap()
    }

    #[test]
    fn test_base_to_foreign() {
        let converted = convert(dec!(100), "USD", "EUR", &rates(), "USD").unwrap();
        assert_eq!(round_money(converted), dec!(92.00));
    }

    #[test]
    fn test_foreign_to_base() {
        let converted = convert(dec!(100), "EUR", "USD", &rates(), "USD").unwrap();
        assert_eq!(round_money(converted), dec!(108.70));
    }

    #[test]
    fn test_cross_rate_pivots_through_base() {
        // 92 EUR = 100 USD = 8313 INR
        let converted = convert(dec!(92), "EUR", "INR", &rates(), "USD").unwrap();
        assert_eq!(round_money(converted), dec!(8313.00));
    }

    #[test]
    fn test_same_currency_is_exact() {
        let amount = dec!(123.456789);
        assert_eq!(convert(amount, "JPY", "JPY", &rates(), "USD").unwrap(), amount);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let rates = rates();
        let tolerance = dec!(0.000001);

        for amount in [dec!(0.01), dec!(1), dec!(99.99), dec!(1250), dec!(987654.32)] {
            for (a, b) in [("USD", "EUR"), ("EUR", "INR"), ("INR", "USD")] {
                let there = convert(amount, a, b, &rates, "USD").unwrap();
                let back = convert(there, b, a, &rates, "USD").unwrap();
                let relative = ((back - amount) / amount).abs();
                assert!(relative <= tolerance, "{} {}→{}→{} drifted to {}", amount, a, b, a, back);
            }
        }
    }

    #[test]
    fn test_missing_rate_is_an_error() {
        let err = convert(dec!(100), "USD", "GBP", &rates(), "USD").unwrap_err();
        assert!(matches!(err, CoreError::Conversion { .. }));

        let err = convert(dec!(100), "GBP", "EUR", &rates(), "USD").unwrap_err();
        assert!(matches!(err, CoreError::Conversion { .. }));
    }

    #[test]
    fn test_assume_rate_policy_is_opt_in() {
        let rates = rates();
        let converter = CurrencyConverter::new("USD", &rates)
            .with_policy(MissingRatePolicy::AssumeRate { rate: dec!(1) });
        assert_eq!(converter.convert(dec!(100), "USD", "GBP").unwrap(), dec!(100));

        let broken = CurrencyConverter::new("USD", &rates)
            .with_policy(MissingRatePolicy::AssumeRate { rate: dec!(0) });
        assert!(broken.convert(dec!(100), "GBP", "USD").is_err());
    }

    #[test]
    fn test_rate_table_validation() {
        assert!(ExchangeRates::from_pairs([("EUR", dec!(0))]).is_err());
        assert!(ExchangeRates::from_pairs([("eur", dec!(0.9))]).is_err());

        let with_base = ExchangeRates::from_pairs([("USD", dec!(1)), ("EUR", dec!(0.92))]).unwrap();
        assert!(with_base.validate("USD").is_err());
        assert!(with_base.without("USD").validate("USD").is_ok());
    }

    #[test]
    fn test_overflow_is_a_conversion_error() {
        let err = convert(Decimal::MAX, "USD", "INR", &rates(), "USD").unwrap_err();
        assert_eq!(err, CoreError::conversion_overflow("USD", "INR"));

        let err = convert(Decimal::MAX, "EUR", "USD", &rates(), "USD").unwrap_err();
        assert_eq!(err, CoreError::conversion_overflow("EUR", "USD"));
    }

    #[test]
    fn test_rate_table_is_validated_on_deserialize() {
        let rates: ExchangeRates = serde_json::from_str(r#"{"EUR":"0.92","INR":"83.13"}"#).unwrap();
        assert_eq!(rates, self::rates());

        for json in [r#"{"eur":"0.92"}"#, r#"{"EUR":"0"}"#, r#"{"EUR":"-1.5"}"#] {
            let result: Result<ExchangeRates, _> = serde_json::from_str(json);
            assert!(result.is_err(), "{} should be rejected", json);
        }
    }

    #[test]
    fn test_settings_listing_base_are_rejected_on_deserialize() {
        let json = serde_json::json!({
            "baseCurrency": "USD",
            "displayCurrency": "EUR",
            "exchangeRates": { "USD": "1", "EUR": "0.92" }
        });
        assert!(serde_json::from_value::<CurrencySettings>(json).is_err());

        let settings = CurrencySettings::new("USD", rates());
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(serde_json::from_value::<CurrencySettings>(json).unwrap(), settings);
    }

    #[test]
    fn test_settings_never_store_base_rate() {
        let seeded = ExchangeRates::from_pairs([("USD", dec!(1)), ("EUR", dec!(0.92))]).unwrap();
        let settings = CurrencySettings::new("USD", seeded);

        assert_eq!(settings.display_currency, "USD");
        assert_eq!(settings.exchange_rates.get("USD"), None);
        assert_eq!(settings.exchange_rates.len(), 1);
        assert!(settings.validate().is_ok());
    }
}
