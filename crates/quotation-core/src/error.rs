//! # Error Types
//!
//! Domain-specific error types for quotation-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quotation-core errors (this file)                                     │
//! │  ├── CoreError        - Domain taxonomy (lock, conflict, conversion)   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  quotation-store errors (separate crate)                               │
//! │  └── ApiError         - What callers see (code + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Caller                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (quotation id, version number)
//! 3. Errors are enum variants, never String
//! 4. A rejected mutation never leaves a partially-applied aggregate behind

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations in the pricing engine.
/// Every public operation returns one of these instead of panicking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Quotation cannot be found in the repository.
    #[error("Quotation not found: {0}")]
    QuotationNotFound(String),

    /// Requested version does not exist in the version history.
    ///
    /// ## When This Occurs
    /// - Viewing a version number that was never created
    /// - `current_version` points past the end of a corrupted history
    #[error("Version {version} not found for quotation {quotation_id}")]
    VersionNotFound { quotation_id: String, version: u32 },

    /// A mutation was attempted on a locked version.
    ///
    /// ## User Workflow
    /// ```text
    /// Version 2 locked by "alice"
    ///      │
    ///      ▼
    /// edit(markup = 15%) ← rejected, quotation untouched
    ///      │
    ///      ▼
    /// UI offers: "Create version 3 to make changes"
    /// ```
    #[error("Version {version} of quotation {quotation_id} is locked")]
    LockedVersion { quotation_id: String, version: u32 },

    /// Lock requested for a version that is already locked.
    #[error("Version {version} of quotation {quotation_id} is already locked by {locked_by}")]
    AlreadyLocked {
        quotation_id: String,
        version: u32,
        locked_by: String,
    },

    /// The repository detected a concurrent write (lost update).
    ///
    /// ## When This Occurs
    /// Two callers load revision 4, the first stores revision 5, the second
    /// still expects 4 and is rejected instead of silently overwriting.
    #[error("Quotation {quotation_id} was modified concurrently: expected revision {expected}, found {actual}")]
    Conflict {
        quotation_id: String,
        expected: u64,
        actual: u64,
    },

    /// Currency conversion could not be performed.
    #[error("Cannot convert {from} to {to}: {reason}")]
    Conversion {
        from: String,
        to: String,
        reason: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a LockedVersion error.
    pub fn locked(quotation_id: impl Into<String>, version: u32) -> Self {
        CoreError::LockedVersion {
            quotation_id: quotation_id.into(),
            version,
        }
    }

    /// Creates a Conversion error for a currency missing from the rate table.
    pub fn missing_rate(from: &str, to: &str, currency: &str) -> Self {
        CoreError::Conversion {
            from: from.to_string(),
            to: to.to_string(),
            reason: format!("no exchange rate for {}", currency),
        }
    }

    /// Creates a Conversion error for a result outside the decimal range.
    pub fn conversion_overflow(from: &str, to: &str) -> Self {
        CoreError::Conversion {
            from: from.to_string(),
            to: to.to_string(),
            reason: "amount out of range".to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value does not fit the decimal range once combined with others.
    #[error("{field} is out of range")]
    OutOfRange { field: String },

    /// Invalid format (e.g., lowercase currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
