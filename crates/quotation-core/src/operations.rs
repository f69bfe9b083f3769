//! # Operations
//!
//! The engine's request-level entry points. Each takes a quotation by
//! reference and returns a new one; the input is never modified, so a caller
//! holding the loaded document can always fall back to it.
//!
//! ```text
//! load(id) ──► &Quotation ──► operation(..) ──► Ok(Quotation') ──► store
//!                                       └─────► Err(CoreError)  (nothing to store)
//! ```

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::currency::CurrencySettings;
use crate::display::{convert_for_display_with, QuotationDisplay};
use crate::error::CoreResult;
use crate::pricing::PricingOptions;
use crate::quotation::{Quotation, QuotationPatch};
use crate::types::{ClientInfo, Itinerary};
use crate::versioning::{VersionManager, VersionRecord};
use crate::QuotationAssembler;

/// Builds the initial draft for an itinerary.
pub fn from_itinerary(
    itinerary: &Itinerary,
    client_info: ClientInfo,
    pricing_options: Option<PricingOptions>,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> CoreResult<Quotation> {
    QuotationAssembler::new(config.clone()).assemble(itinerary, client_info, pricing_options, now)
}

/// Reprices with new pricing options.
pub fn recalculate(quotation: &Quotation, options: PricingOptions) -> CoreResult<Quotation> {
    let mut next = quotation.clone();
    next.recalculate(options)?;
    Ok(next)
}

/// Presents the quotation in another currency under the configured policy.
pub fn convert_for_display(
    quotation: &Quotation,
    display_currency: &str,
    config: &EngineConfig,
) -> CoreResult<QuotationDisplay> {
    convert_for_display_with(quotation, display_currency, config.missing_rate_policy)
}

/// Appends a new draft version.
pub fn create_version(quotation: &Quotation, description: &str, now: DateTime<Utc>) -> CoreResult<Quotation> {
    let mut next = quotation.clone();
    VersionManager::create_version(&mut next, description, now)?;
    Ok(next)
}

/// Freezes the active version.
pub fn lock_version(quotation: &Quotation, locked_by: &str, now: DateTime<Utc>) -> CoreResult<Quotation> {
    let mut next = quotation.clone();
    VersionManager::lock_version(&mut next, locked_by, now)?;
    Ok(next)
}

/// Snapshots the working fields into the active version.
pub fn save_draft(quotation: &Quotation) -> CoreResult<Quotation> {
    let mut next = quotation.clone();
    VersionManager::save_draft(&mut next)?;
    Ok(next)
}

/// Applies a document patch.
pub fn edit(quotation: &Quotation, patch: QuotationPatch) -> CoreResult<Quotation> {
    let mut next = quotation.clone();
    next.edit(patch)?;
    Ok(next)
}

/// Replaces the currency settings.
pub fn update_currency_settings(quotation: &Quotation, settings: CurrencySettings) -> CoreResult<Quotation> {
    let mut next = quotation.clone();
    next.update_currency_settings(settings)?;
    Ok(next)
}

/// Returns a copy of version `number`.
pub fn view_version(quotation: &Quotation, number: u32) -> CoreResult<VersionRecord> {
    VersionManager::view_version(quotation, number).cloned()
}

// =============================================================================
// Unit Tests
// =============================================================================
