//! # quotation-core: Pure Pricing Engine for Waypoint Quotes
//!
//! This crate is the **heart** of the quotation builder. It prices travel
//! quotations, converts them for display in other currencies, and keeps an
//! append-only version history with locks, all as pure transformations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Waypoint Quotes Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Quotation Builder (frontend)                    │   │
//! │  │   Itinerary ──► Pricing panel ──► Currency picker ──► Versions  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              quotation-store (QuotationService)                 │   │
//! │  │      load ──► transform ──► store(expected revision)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ quotation-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │ currency  │  │versioning │  │ assembler │  │   │
//! │  │   │  Markup   │  │ Converter │  │  Draft    │  │ Itinerary │  │   │
//! │  │   │  Totals   │  │  Display  │  │  Locked   │  │  → Quote  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - Markup and subtotal → total calculation
//! - [`currency`] - Exchange rates and currency conversion
//! - [`display`] - Read-only display-currency view of a quotation
//! - [`versioning`] - Version history state machine and locks
//! - [`quotation`] - The quotation aggregate and its edits
//! - [`assembler`] - Itinerary → draft quotation
//! - [`operations`] - Request-level entry points (`&Quotation` in, `Quotation` out)
//! - [`money`] - Rounding policy and formatting
//! - [`config`] - Engine configuration
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the clock is passed in, never read
//! 2. **Exact Money**: `rust_decimal::Decimal`, rounded once per derived figure
//! 3. **Stored values are base currency**: display conversion never writes back
//! 4. **Explicit Errors**: every operation returns `CoreResult`, never panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use rust_decimal_macros::dec;
//! use quotation_core::{operations, ClientInfo, EngineConfig, Itinerary, Markup, PricingOptions};
//!
//! let itinerary = Itinerary {
//!     id: "it-1".to_string(),
//!     title: "Lisbon Weekend".to_string(),
//!     currency: "USD".to_string(),
//!     days: Vec::new(),
//! };
//! let config = EngineConfig::default();
//! let now = Utc::now();
//!
//! let draft = operations::from_itinerary(&itinerary, ClientInfo::default(), None, &config, now).unwrap();
//! let priced = operations::recalculate(
//!     &draft,
//!     PricingOptions::with_markup(Markup::percentage(dec!(10)).unwrap()),
//! )
//! .unwrap();
//! let locked = operations::lock_version(&priced, "alice", now).unwrap();
//!
//! assert!(locked.is_locked());
//! assert!(operations::save_draft(&locked).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod assembler;
pub mod config;
pub mod currency;
pub mod display;
pub mod error;
pub mod money;
pub mod operations;
pub mod pricing;
pub mod quotation;
pub mod types;
pub mod validation;
pub mod versioning;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use assembler::QuotationAssembler;
pub use config::{ConfigError, EngineConfig};
pub use currency::{convert, CurrencyConverter, CurrencySettings, ExchangeRates, MissingRatePolicy};
pub use display::{DisplayAmount, EventDisplayPrice, QuotationDisplay};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{format_money, round_money, MONEY_DECIMALS};
pub use pricing::{Markup, PricingCalculator, PricingOptions, PricingResult};
pub use quotation::{NewQuotation, Quotation, QuotationPatch};
pub use types::*;
pub use versioning::{VersionManager, VersionRecord, VersionState, VersionStatus};
