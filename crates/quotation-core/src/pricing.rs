//! # Pricing Module
//!
//! Markup configuration and the subtotal → markup → total calculation.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quotation Pricing                                    │
//! │                                                                         │
//! │  Σ event prices ──► subtotal                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  Markup::Percentage { value }  ──► round2(subtotal × value / 100)      │
//! │  Markup::Fixed { amount }      ──► amount                              │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  total = subtotal + markup                                             │
//! │  options.original_total_price = subtotal                               │
//! │  options.final_total_price    = total                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use rust_decimal_macros::dec;
//! use quotation_core::pricing::{Markup, PricingCalculator, PricingOptions};
//!
//! let options = PricingOptions::with_markup(Markup::percentage(dec!(10)).unwrap());
//! let priced = PricingCalculator::recalculate(dec!(1000), &options).unwrap();
//!
//! assert_eq!(priced.markup, dec!(100));
//! assert_eq!(priced.total, dec!(1100));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::round_money;
use crate::validation::{validate_non_negative, ValidationResult};

// =============================================================================
// Markup
// =============================================================================

/// How the markup on top of the subtotal is computed.
///
/// A closed variant: a percentage can never be read as an amount or vice
/// versa. Negative values are rejected both by the constructors and when a
/// document is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Markup {
    /// Percentage of the subtotal (`10` = 10%).
    Percentage {
        #[ts(as = "String")]
        value: Decimal,
    },
    /// Flat amount in the base currency.
    Fixed {
        #[ts(as = "String")]
        amount: Decimal,
    },
}

impl Markup {
    /// Creates a percentage markup.
    pub fn percentage(value: Decimal) -> ValidationResult<Self> {
        let markup = Markup::Percentage { value };
        markup.validate()?;
        Ok(markup)
    }

    /// Creates a fixed markup in the base currency.
    pub fn fixed(amount: Decimal) -> ValidationResult<Self> {
        let markup = Markup::Fixed { amount };
        markup.validate()?;
        Ok(markup)
    }

    /// No markup at all.
    pub const fn none() -> Self {
        Markup::Percentage {
            value: Decimal::ZERO,
        }
    }

    /// Checks the markup value is not negative.
    pub fn validate(&self) -> ValidationResult<()> {
        match self {
            Markup::Percentage { value } => validate_non_negative("markup percentage", *value),
            Markup::Fixed { amount } => validate_non_negative("markup amount", *amount),
        }
    }

    /// Computes the markup amount for a subtotal.
    ///
    /// `OutOfRange` when the product does not fit a `Decimal`.
    pub fn apply(&self, subtotal: Decimal) -> ValidationResult<Decimal> {
        if subtotal.is_zero() {
            return Ok(Decimal::ZERO);
        }
        match self {
            Markup::Percentage { value } => subtotal
                .checked_mul(*value)
                .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
                .map(round_money)
                .ok_or_else(|| ValidationError::OutOfRange {
                    field: "markup".to_string(),
                }),
            Markup::Fixed { amount } => Ok(*amount),
        }
    }
}

impl Default for Markup {
    fn default() -> Self {
        Markup::none()
    }
}

impl<'de> Deserialize<'de> for Markup {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(tag = "type", rename_all = "lowercase")]
        enum RawMarkup {
            Percentage { value: Decimal },
            Fixed { amount: Decimal },
        }

        let markup = match RawMarkup::deserialize(deserializer)? {
            RawMarkup::Percentage { value } => Markup::Percentage { value },
            RawMarkup::Fixed { amount } => Markup::Fixed { amount },
        };
        markup.validate().map_err(serde::de::Error::custom)?;
        Ok(markup)
    }
}

// =============================================================================
// Pricing Options
// =============================================================================

/// Display toggles, markup configuration and the derived price pair.
///
/// `original_total_price` and `final_total_price` are outputs of
/// [`PricingCalculator::recalculate`]; whatever a caller puts there is
/// overwritten on the next calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingOptions {
    pub show_individual_prices: bool,
    pub show_subtotals: bool,
    pub show_total: bool,
    pub markup: Markup,
    #[serde(default)]
    #[ts(as = "String")]
    pub original_total_price: Decimal,
    #[serde(default)]
    #[ts(as = "String")]
    pub final_total_price: Decimal,
}

impl PricingOptions {
    /// Default toggles (show everything) with the given markup.
    pub fn with_markup(markup: Markup) -> Self {
        PricingOptions {
            markup,
            ..Default::default()
        }
    }
}

impl Default for PricingOptions {
    /// Shows everything, percentage markup of zero.
    fn default() -> Self {
        PricingOptions {
            show_individual_prices: true,
            show_subtotals: true,
            show_total: true,
            markup: Markup::none(),
            original_total_price: Decimal::ZERO,
            final_total_price: Decimal::ZERO,
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Output of a pricing calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult {
    pub subtotal: Decimal,
    pub markup: Decimal,
    pub total: Decimal,
    /// The input options with the derived price pair filled in.
    pub options: PricingOptions,
}

/// Computes markup and total from a subtotal and markup configuration.
pub struct PricingCalculator;

impl PricingCalculator {
    /// Recalculates markup and total.
    ///
    /// ## Errors
    /// `ValidationError` when the subtotal or the markup value is negative,
    /// or when the markup or total does not fit a `Decimal`.
    ///
    /// ## Idempotence
    /// Feeding the returned options back in with the same subtotal yields an
    /// identical result: the markup is rounded once and the derived fields
    /// are overwritten rather than accumulated.
    pub fn recalculate(subtotal: Decimal, options: &PricingOptions) -> CoreResult<PricingResult> {
        validate_non_negative("subtotal", subtotal)?;
        options.markup.validate()?;

        let markup = options.markup.apply(subtotal)?;
        let total = subtotal
            .checked_add(markup)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total".to_string(),
            })?;

        let mut options = options.clone();
        options.original_total_price = subtotal;
        options.final_total_price = total;

        Ok(PricingResult {
            subtotal,
            markup,
            total,
            options,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
