//! # Validation Module
//!
//! Input validation utilities for the pricing engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Quotation builder UI                                         │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Money must not be negative                                        │
//! │  ├── Exchange rates must be positive                                   │
//! │  └── Currency codes are ISO-4217 shaped                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Aggregate invariants (versioning, pricing)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal_macros::dec;
//! use quotation_core::validation::{validate_currency_code, validate_non_negative};
//!
//! validate_currency_code("EUR").unwrap();
//! assert!(validate_non_negative("subtotal", dec!(-1)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a version description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that a money amount is zero or greater.
///
/// ## Rules
/// - Zero is allowed (free items, no markup)
/// - Negative values are rejected, never clamped
pub fn validate_non_negative(field: &str, amount: Decimal) -> ValidationResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an exchange rate.
///
/// ## Rules
/// - Must be strictly positive: a zero rate would divide by zero when
///   converting back into the base currency
pub fn validate_rate(code: &str, rate: Decimal) -> ValidationResult<()> {
    if rate <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: format!("exchange rate for {}", code),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a currency code.
///
/// ## Rules
/// - Exactly three ASCII uppercase letters (`USD`, `EUR`, `INR`)
///
/// ## Example
/// ```rust
/// use quotation_core::validation::validate_currency_code;
///
/// assert!(validate_currency_code("INR").is_ok());
/// assert!(validate_currency_code("inr").is_err());
/// assert!(validate_currency_code("").is_err());
/// ```
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: format!("'{}' must be three uppercase letters", code),
        });
    }

    Ok(())
}

/// Validates a version description.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_DESCRIPTION_LEN`] characters
///
/// ## Returns
/// The trimmed description.
pub fn validate_description(description: &str) -> ValidationResult<String> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(description.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("price", dec!(0)).is_ok());
        assert!(validate_non_negative("price", dec!(10.99)).is_ok());
        assert!(validate_non_negative("price", dec!(-0.01)).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("EUR", dec!(0.92)).is_ok());
        assert!(validate_rate("EUR", dec!(0)).is_err());
        assert!(validate_rate("EUR", dec!(-1)).is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("USD").is_ok());
        assert!(validate_currency_code("usd").is_err());
        assert!(validate_currency_code("US").is_err());
        assert!(validate_currency_code("US1").is_err());
        assert!(validate_currency_code("   ").is_err());
    }

    #[test]
    fn test_validate_description() {
        assert_eq!(
            validate_description("  Client asked for 4* hotels  ").unwrap(),
            "Client asked for 4* hotels"
        );
        assert!(validate_description("").is_err());
        assert!(validate_description(&"x".repeat(501)).is_err());
    }
}
