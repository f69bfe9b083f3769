//! # Display Conversion
//!
//! Presents a quotation's money in another currency without touching it.
//!
//! ```text
//! ┌──────────────┐  convert_for_display(q, "EUR")  ┌──────────────────────┐
//! │  Quotation   │ ──────────────────────────────► │  QuotationDisplay    │
//! │  (USD, as    │                                 │  quotation (as-is)   │
//! │   stored)    │                                 │  subtotal  $1000 →   │
//! └──────────────┘                                 │            €920.00   │
//!                                                  │  events[] per price  │
//!                                                  └──────────────────────┘
//! ```
//!
//! Display amounts are rounded to two decimals once, here; stored amounts
//! stay in the base currency at full precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::{CurrencyConverter, MissingRatePolicy};
use crate::error::CoreResult;
use crate::money::{format_money, round_money};
use crate::pricing::Markup;
use crate::quotation::Quotation;
use crate::validation::validate_currency_code;

/// A base-currency amount and its display-currency counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DisplayAmount {
    #[ts(as = "String")]
    pub amount: Decimal,
    #[ts(as = "String")]
    pub display_amount: Decimal,
    /// `display_amount` with its currency symbol, e.g. `€920.00`.
    pub formatted: String,
}

/// Display price of a single priced event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EventDisplayPrice {
    pub day: u32,
    pub event_id: String,
    #[ts(as = "String")]
    pub price: Decimal,
    #[ts(as = "String")]
    pub display_price: Decimal,
    pub formatted: String,
}

/// Read-only view of a quotation in a display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuotationDisplay {
    /// The quotation exactly as stored.
    pub quotation: Quotation,
    pub base_currency: String,
    pub display_currency: String,
    pub subtotal: DisplayAmount,
    pub markup: DisplayAmount,
    pub total: DisplayAmount,
    pub original_total_price: DisplayAmount,
    pub final_total_price: DisplayAmount,
    /// Present only for a fixed markup; a percentage has no currency.
    #[serde(default)]
    pub fixed_markup: Option<DisplayAmount>,
    #[serde(default)]
    pub events: Vec<EventDisplayPrice>,
}

/// Converts a quotation for display, rejecting unknown currencies.
pub fn convert_for_display(quotation: &Quotation, display_currency: &str) -> CoreResult<QuotationDisplay> {
    convert_for_display_with(quotation, display_currency, MissingRatePolicy::Reject)
}

/// Converts a quotation for display with an explicit missing-rate policy.
///
/// ## Errors
/// - `ValidationError` for a malformed display currency code
/// - `Conversion` for a currency missing from the rate table under
///   [`MissingRatePolicy::Reject`]
pub fn convert_for_display_with(
    quotation: &Quotation,
    display_currency: &str,
    policy: MissingRatePolicy,
) -> CoreResult<QuotationDisplay> {
    validate_currency_code(display_currency)?;

    let settings = &quotation.currency_settings;
    let base = settings.base_currency.as_str();
    let converter = settings.converter(policy);

    let amount = |value: Decimal| -> CoreResult<DisplayAmount> {
        let display_amount = round_money(converter.convert(value, base, display_currency)?);
        Ok(DisplayAmount {
            amount: value,
            display_amount,
            formatted: format_money(display_amount, display_currency),
        })
    };

    let fixed_markup = match quotation.pricing_options.markup {
        Markup::Fixed { amount: fixed } => Some(amount(fixed)?),
        Markup::Percentage { .. } => None,
    };

    let mut events = Vec::new();
    for day in &quotation.days {
        for event in &day.events {
            if let Some(price) = event.price {
                let converted = amount(price)?;
                events.push(EventDisplayPrice {
                    day: day.day,
                    event_id: event.id.clone(),
                    price,
                    display_price: converted.display_amount,
                    formatted: converted.formatted,
                });
            }
        }
    }

    let view = QuotationDisplay {
        base_currency: base.to_string(),
        display_currency: display_currency.to_string(),
        subtotal: amount(quotation.subtotal)?,
        markup: amount(quotation.markup)?,
        total: amount(quotation.total)?,
        original_total_price: amount(quotation.pricing_options.original_total_price)?,
        final_total_price: amount(quotation.pricing_options.final_total_price)?,
        fixed_markup,
        events,
        quotation: quotation.clone(),
    };

    tracing::debug!(quotation_id = %quotation.id, display = display_currency, "Converted for display");
    Ok(view)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::pricing::PricingOptions;
    use crate::testing::sample_quotation;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_in_eur() {
        let mut q = sample_quotation();
        q.recalculate(PricingOptions::with_markup(Markup::percentage(dec!(10)).unwrap()))
            .unwrap();

        let view = convert_for_display(&q, "EUR").unwrap();

        assert_eq!(view.subtotal.display_amount, dec!(920.00));
        assert_eq!(view.markup.display_amount, dec!(92.00));
        assert_eq!(view.total.display_amount, dec!(1012.00));
        assert_eq!(view.total.formatted, "€1012.00");
        assert_eq!(view.final_total_price.display_amount, dec!(1012.00));
        assert_eq!(view.fixed_markup, None);
        assert_eq!(view.events.len(), 2);
        assert_eq!(view.events[0].display_price, dec!(552.00));
    }

    #[test]
    fn test_display_does_not_mutate_quotation() {
        let q = sample_quotation();
        let before = serde_json::to_string(&q).unwrap();

        let view = convert_for_display(&q, "INR").unwrap();

        assert_eq!(view.quotation, q);
        assert_eq!(serde_json::to_string(&q).unwrap(), before);
        assert_eq!(view.subtotal.amount, dec!(1000));
        assert_eq!(view.subtotal.display_amount, dec!(83130.00));
    }

    #[test]
    fn test_fixed_markup_is_converted() {
        let mut q = sample_quotation();
        q.recalculate(PricingOptions::with_markup(Markup::fixed(dec!(250)).unwrap()))
            .unwrap();

        let view = convert_for_display(&q, "EUR").unwrap();
        let fixed = view.fixed_markup.unwrap();
        assert_eq!(fixed.amount, dec!(250));
        assert_eq!(fixed.display_amount, dec!(230.00));
    }

    #[test]
    fn test_base_currency_display_is_identity() {
        let q = sample_quotation();
        let view = convert_for_display(&q, "USD").unwrap();
        assert_eq!(view.total.display_amount, dec!(1000));
        assert_eq!(view.total.formatted, "$1000.00");
    }

    #[test]
    fn test_unknown_display_currency() {
        let q = sample_quotation();

        let err = convert_for_display(&q, "JPY").unwrap_err();
        assert!(matches!(err, CoreError::Conversion { .. }));

        let view =
            convert_for_display_with(&q, "JPY", MissingRatePolicy::AssumeRate { rate: dec!(150) })
                .unwrap();
        assert_eq!(view.total.formatted, "¥150000.00");

        assert!(matches!(
            convert_for_display(&q, "euro"),
            Err(CoreError::Validation(_))
        ));
    }
}
