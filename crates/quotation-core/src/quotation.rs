//! # Quotation Aggregate
//!
//! The root document every operation loads, transforms and stores.
//!
//! ## Working Fields vs. History
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Quotation                                                              │
//! │  ├── id, title, client, status, validUntil, notes     (document)       │
//! │  ├── days, pricingOptions, subtotal, markup, total,                    │
//! │  │   currencySettings                                 (working state)  │
//! │  ├── versionHistory[]  ◄── snapshots of the working state              │
//! │  ├── currentVersion    ──► index + 1 of the active record              │
//! │  └── revision          ──► repository write counter                    │
//! │                                                                         │
//! │  is_locked() == versionHistory[currentVersion - 1].isLocked            │
//! │  There is no separate quotation-level lock flag.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutating method checks the lock and computes its result before
//! touching `self`; a rejected call leaves the quotation unchanged.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::currency::CurrencySettings;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::pricing::{PricingCalculator, PricingOptions, PricingResult};
use crate::types::{itinerary_subtotal, Client, ItineraryDay, QuotationStatus};
use crate::versioning::{VersionManager, VersionRecord, VersionState};

/// Generates a fresh quotation id.
pub fn new_quotation_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Quotation
// =============================================================================

/// A priced, versioned travel quotation.
///
/// All monetary fields are in `currency`, which is also
/// `currency_settings.base_currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: String,
    #[serde(default)]
    pub itinerary_id: Option<String>,
    pub title: String,
    pub client: Client,
    pub currency: String,
    pub days: Vec<ItineraryDay>,
    pub pricing_options: PricingOptions,
    #[ts(as = "String")]
    pub subtotal: Decimal,
    #[ts(as = "String")]
    pub markup: Decimal,
    #[ts(as = "String")]
    pub total: Decimal,
    pub currency_settings: CurrencySettings,
    pub version_history: Vec<VersionRecord>,
    pub current_version: u32,
    #[serde(default)]
    pub status: QuotationStatus,
    #[ts(as = "String")]
    pub generated_date: DateTime<Utc>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    /// Bumped by the repository on every successful store.
    #[serde(default)]
    pub revision: u64,
}

/// Input for [`Quotation::new`].
#[derive(Debug, Clone)]
pub struct NewQuotation {
    pub id: String,
    pub itinerary_id: Option<String>,
    pub title: String,
    pub client: Client,
    pub currency_settings: CurrencySettings,
    pub days: Vec<ItineraryDay>,
    pub pricing_options: PricingOptions,
    pub valid_until: Option<DateTime<Utc>>,
    pub notes: String,
}

/// Partial update of a quotation's document fields.
///
/// `None` leaves a field untouched. Replacing `days` recomputes the subtotal
/// and reprices with the current pricing options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub client: Option<Client>,
    #[serde(default)]
    pub days: Option<Vec<ItineraryDay>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<QuotationStatus>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub valid_until: Option<DateTime<Utc>>,
}

impl Quotation {
    /// Builds a priced quotation at version 1 / Draft / unlocked.
    ///
    /// ## Errors
    /// - `ValidationError` for a blank title, a malformed currency table or
    ///   a negative event price
    pub fn new(input: NewQuotation, now: DateTime<Utc>) -> CoreResult<Self> {
        validate_title(&input.title)?;
        input.currency_settings.validate()?;

        let subtotal = itinerary_subtotal(&input.days)?;
        let priced = PricingCalculator::recalculate(subtotal, &input.pricing_options)?;

        let mut quotation = Quotation {
            id: input.id,
            itinerary_id: input.itinerary_id,
            title: input.title.trim().to_string(),
            client: input.client,
            currency: input.currency_settings.base_currency.clone(),
            days: input.days,
            pricing_options: priced.options.clone(),
            subtotal: priced.subtotal,
            markup: priced.markup,
            total: priced.total,
            currency_settings: input.currency_settings,
            version_history: Vec::new(),
            current_version: 1,
            status: QuotationStatus::Draft,
            generated_date: now,
            valid_until: input.valid_until,
            notes: input.notes,
            revision: 0,
        };
        quotation.version_history = VersionManager::create(quotation.snapshot(), now);

        Ok(quotation)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The version record the working fields belong to.
    pub fn active_version(&self) -> CoreResult<&VersionRecord> {
        VersionManager::view_version(self, self.current_version)
    }

    /// Whether the active version is locked.
    ///
    /// A `current_version` outside the history reads as unlocked here. Every
    /// mutation goes through [`Quotation::ensure_unlocked`], which fails with
    /// `VersionNotFound` instead, and the repository refuses to store such a
    /// history.
    pub fn is_locked(&self) -> bool {
        self.active_version().map(|v| v.is_locked).unwrap_or(false)
    }

    /// Fails with `LockedVersion` if the active version is locked.
    pub fn ensure_unlocked(&self) -> CoreResult<()> {
        let active = self.active_version()?;
        if active.is_locked {
            tracing::warn!(quotation_id = %self.id, version = active.version_number, "mutation rejected: version is locked");
            return Err(CoreError::locked(&self.id, active.version_number));
        }
        Ok(())
    }

    /// Whether the quotation can no longer be accepted at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == QuotationStatus::Expired
            || self.valid_until.map_or(false, |until| until < now)
    }

    /// Copies the working fields into a version snapshot.
    pub fn snapshot(&self) -> VersionState {
        VersionState {
            days: self.days.clone(),
            pricing_options: self.pricing_options.clone(),
            subtotal: self.subtotal,
            markup: self.markup,
            total: self.total,
            currency_settings: self.currency_settings.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    /// Reprices with new pricing options.
    ///
    /// The subtotal is the sum of the current event prices.
    pub fn recalculate(&mut self, options: PricingOptions) -> CoreResult<()> {
        self.ensure_unlocked()?;

        let subtotal = itinerary_subtotal(&self.days)?;
        let priced = PricingCalculator::recalculate(subtotal, &options)?;

        let mut next = self.clone();
        next.apply_pricing(priced);
        VersionManager::mark_edited(&mut next)?;
        *self = next;

        tracing::debug!(quotation_id = %self.id, total = %self.total, "Quotation repriced");
        Ok(())
    }

    /// Applies a document patch.
    pub fn edit(&mut self, patch: QuotationPatch) -> CoreResult<()> {
        self.ensure_unlocked()?;

        let mut next = self.clone();
        if let Some(title) = patch.title {
            validate_title(&title)?;
            next.title = title.trim().to_string();
        }
        if let Some(client) = patch.client {
            next.client = client;
        }
        if let Some(notes) = patch.notes {
            next.notes = notes;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(valid_until) = patch.valid_until {
            next.valid_until = Some(valid_until);
        }
        if let Some(days) = patch.days {
            let subtotal = itinerary_subtotal(&days)?;
            let priced = PricingCalculator::recalculate(subtotal, &next.pricing_options)?;
            next.days = days;
            next.apply_pricing(priced);
        }

        VersionManager::mark_edited(&mut next)?;
        *self = next;

        tracing::debug!(quotation_id = %self.id, "Quotation edited");
        Ok(())
    }

    /// Replaces the currency settings.
    ///
    /// ## Errors
    /// - `ValidationError` if the base currency differs from `currency`, a
    ///   code is malformed, a rate is not positive or the base is listed
    pub fn update_currency_settings(&mut self, settings: CurrencySettings) -> CoreResult<()> {
        self.ensure_unlocked()?;
        settings.validate()?;

        if settings.base_currency != self.currency {
            return Err(ValidationError::InvalidFormat {
                field: "baseCurrency".to_string(),
                reason: format!(
                    "must match the quotation currency {}, got {}",
                    self.currency, settings.base_currency
                ),
            }
            .into());
        }

        let mut next = self.clone();
        next.currency_settings = settings;
        VersionManager::mark_edited(&mut next)?;
        *self = next;

        tracing::debug!(quotation_id = %self.id, display = %self.currency_settings.display_currency, "Currency settings updated");
        Ok(())
    }

    fn apply_pricing(&mut self, priced: PricingResult) {
        self.subtotal = priced.subtotal;
        self.markup = priced.markup;
        self.total = priced.total;
        self.pricing_options = priced.options;
    }
}

fn validate_title(title: &str) -> CoreResult<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
