//! # Money Module
//!
//! Rounding policy and display formatting for monetary values.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    1000 * 1.1 = 1100.0000000000002  ❌ WRONG!                           │
//! │                                                                         │
//! │  Exchange rates (0.92, 83.13) are not whole cents either, so integer   │
//! │  cents alone cannot carry a conversion.                                │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal::Decimal                                    │
//! │    Exact base-10 arithmetic, 28 significant digits                     │
//! │    Rounded ONCE, at a fixed policy, when a figure is derived           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Derived money (percentage markup, display conversions) is rounded to
//! [`MONEY_DECIMALS`] places with round-half-up. All stored amounts are
//! non-negative, so "half away from zero" and "half up" agree.
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use quotation_core::money::{format_money, round_money};
//!
//! assert_eq!(round_money(dec!(108.695652)), dec!(108.70));
//! assert_eq!(format_money(dec!(92), "EUR"), "€92.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every derived money figure is rounded to.
pub const MONEY_DECIMALS: u32 = 2;

/// Rounds an amount to [`MONEY_DECIMALS`] places, half-up.
///
/// Rounding an already-rounded value is a no-op, which is what makes
/// repeated recalculation stable.
#[inline]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the display symbol for a currency code, if one is known.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "INR" => "₹",
        "GBP" => "£",
        "JPY" => "¥",
        "AUD" => "A$",
        "CAD" => "C$",
        "SGD" => "S$",
        _ => return None,
    };
    Some(symbol)
}

/// Formats an amount with its currency symbol and exactly two decimals.
///
/// Unknown codes fall back to the raw code as prefix (`"CHF12.50"`).
/// Negative amounts put the sign before the symbol, like `-$5.50`.
pub fn format_money(amount: Decimal, code: &str) -> String {
    let mut rounded = round_money(amount);
    rounded.rescale(MONEY_DECIMALS);

    let prefix = currency_symbol(code).unwrap_or(code);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{}", prefix, rounded.abs())
    } else {
        format!("{}{}", prefix, rounded.abs())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(0.125)), dec!(0.13));
        assert_eq!(round_money(dec!(0.135)), dec!(0.14));
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(1.234)), dec!(1.23));
    }

    #[test]
    fn test_round_money_is_stable() {
        let once = round_money(dec!(108.6956521739));
        assert_eq!(once, dec!(108.70));
        assert_eq!(round_money(once), once);
    }

    #[test]
    fn test_format_known_symbols() {
        assert_eq!(format_money(dec!(1100), "USD"), "$1100.00");
        assert_eq!(format_money(dec!(92), "EUR"), "€92.00");
        assert_eq!(format_money(dec!(8313.456), "INR"), "₹8313.46");
        assert_eq!(format_money(dec!(10.5), "SGD"), "S$10.50");
    }

    #[test]
    fn test_format_unknown_code_falls_back_to_code() {
        assert_eq!(format_money(dec!(12.5), "CHF"), "CHF12.50");
    }

    #[test]
    fn test_format_negative_and_zero() {
        assert_eq!(format_money(dec!(-5.5), "USD"), "-$5.50");
        assert_eq!(format_money(dec!(0), "USD"), "$0.00");
        assert_eq!(format_money(dec!(-0.001), "USD"), "$0.00");
    }
}
