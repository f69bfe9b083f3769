//! # Quotation Service
//!
//! Runs each engine operation as load → transform → store.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  service.edit(id, patch, expected = Some(4))                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  repo.load(id) ───────────────────────► QuotationNotFound               │
//! │       │ revision 4                                                      │
//! │       ▼                                                                 │
//! │  expected == revision? ── no ─────────► Conflict (nothing stored)       │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  operations::edit(&q, patch) ─────────► LockedVersion (nothing stored)  │
//! │       │ q'                                                              │
//! │       ▼                                                                 │
//! │  repo.store(q', Some(4)) ─────────────► Conflict (lost the race)        │
//! │       │ revision 5                                                      │
//! │       ▼                                                                 │
//! │  Ok(q' with revision 5)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `expected = None` skips the caller-side check, but the store itself is
//! always conditional on the revision that was loaded.

use chrono::Utc;
use quotation_core::{
    operations, ClientInfo, CoreError, CoreResult, CurrencySettings, EngineConfig, Itinerary,
    PricingOptions, Quotation, QuotationDisplay, QuotationPatch, VersionRecord,
};
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::repository::QuotationRepository;

/// Quotation operations over a repository.
#[derive(Debug, Clone)]
pub struct QuotationService<R> {
    repo: R,
    config: EngineConfig,
}

impl<R: QuotationRepository> QuotationService<R> {
    pub fn new(repo: R, config: EngineConfig) -> Self {
        QuotationService { repo, config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Creation and reads
    // -------------------------------------------------------------------------

    /// Assembles a draft from an itinerary and stores it.
    pub async fn create_from_itinerary(
        &self,
        itinerary: &Itinerary,
        client_info: ClientInfo,
        pricing_options: Option<PricingOptions>,
    ) -> ApiResult<Quotation> {
        let mut quotation =
            operations::from_itinerary(itinerary, client_info, pricing_options, &self.config, Utc::now())?;
        quotation.revision = self.repo.store(&quotation, None).await?;

        info!(quotation_id = %quotation.id, itinerary_id = %itinerary.id, "Quotation created");
        Ok(quotation)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Quotation> {
        Ok(self.repo.load(id).await?)
    }

    /// Presents a stored quotation in another currency. Nothing is stored.
    pub async fn convert_for_display(&self, id: &str, display_currency: &str) -> ApiResult<QuotationDisplay> {
        let quotation = self.repo.load(id).await?;
        Ok(operations::convert_for_display(&quotation, display_currency, &self.config)?)
    }

    pub async fn view_version(&self, id: &str, number: u32) -> ApiResult<VersionRecord> {
        let quotation = self.repo.load(id).await?;
        Ok(operations::view_version(&quotation, number)?)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        Ok(self.repo.delete(id).await?)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    pub async fn recalculate(
        &self,
        id: &str,
        options: PricingOptions,
        expected: Option<u64>,
    ) -> ApiResult<Quotation> {
        self.apply(id, expected, "recalculate", |q| operations::recalculate(q, options))
            .await
    }

    pub async fn edit(&self, id: &str, patch: QuotationPatch, expected: Option<u64>) -> ApiResult<Quotation> {
        self.apply(id, expected, "edit", |q| operations::edit(q, patch)).await
    }

    pub async fn update_currency_settings(
        &self,
        id: &str,
        settings: CurrencySettings,
        expected: Option<u64>,
    ) -> ApiResult<Quotation> {
        self.apply(id, expected, "update_currency_settings", |q| {
            operations::update_currency_settings(q, settings)
        })
        .await
    }

    pub async fn save_draft(&self, id: &str, expected: Option<u64>) -> ApiResult<Quotation> {
        self.apply(id, expected, "save_draft", operations::save_draft).await
    }

    pub async fn lock_version(&self, id: &str, locked_by: &str, expected: Option<u64>) -> ApiResult<Quotation> {
        let now = Utc::now();
        self.apply(id, expected, "lock_version", |q| operations::lock_version(q, locked_by, now))
            .await
    }

    pub async fn create_version(
        &self,
        id: &str,
        description: &str,
        expected: Option<u64>,
    ) -> ApiResult<Quotation> {
        let now = Utc::now();
        self.apply(id, expected, "create_version", |q| {
            operations::create_version(q, description, now)
        })
        .await
    }

    /// Load → check revision → transform → conditional store.
    async fn apply<F>(&self, id: &str, expected: Option<u64>, operation: &str, transform: F) -> ApiResult<Quotation>
    where
        F: FnOnce(&Quotation) -> CoreResult<Quotation>,
    {
        let current = self.repo.load(id).await?;

        if let Some(expected) = expected {
            if expected != current.revision {
                warn!(quotation_id = %id, operation, expected, actual = current.revision, "rejected: stale revision");
                return Err(CoreError::Conflict {
                    quotation_id: id.to_string(),
                    expected,
                    actual: current.revision,
                }
                .into());
            }
        }

        let mut next = transform(&current).map_err(|err| {
            warn!(quotation_id = %id, operation, error = %err, "rejected");
            err
        })?;

        next.revision = self.repo.store(&next, Some(current.revision)).await?;
        info!(
            quotation_id = %id,
            operation,
            version = next.current_version,
            revision = next.revision,
            "Quotation updated"
        );
        Ok(next)
    }
}
