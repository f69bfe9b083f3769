//! # Quotation Assembler
//!
//! Turns a source itinerary into a priced draft quotation.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────────┐
//! │  Itinerary   │   │  ClientInfo  │   │ PricingOptions? │
//! └──────┬───────┘   └──────┬───────┘   └────────┬────────┘
//!        │ days, currency   │ name → "Client"    │ default: 0%
//!        ▼                  ▼                    ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │  Σ event prices ──► PricingCalculator ──► v1 Draft  │
//!   │  validUntil = now + 30 days                         │
//!   │  rates      = config defaults (minus base)          │
//!   └─────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};

use crate::config::EngineConfig;
use crate::currency::CurrencySettings;
use crate::error::CoreResult;
use crate::pricing::PricingOptions;
use crate::quotation::{new_quotation_id, NewQuotation, Quotation};
use crate::types::{ClientInfo, Itinerary};

/// Days a freshly assembled quotation stays valid.
pub const QUOTE_VALIDITY_DAYS: i64 = 30;

/// Builds initial quotation drafts.
#[derive(Debug, Clone, Default)]
pub struct QuotationAssembler {
    config: EngineConfig,
}

impl QuotationAssembler {
    pub fn new(config: EngineConfig) -> Self {
        QuotationAssembler { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assembles a draft with a fresh id.
    pub fn assemble(
        &self,
        itinerary: &Itinerary,
        client_info: ClientInfo,
        pricing_options: Option<PricingOptions>,
        now: DateTime<Utc>,
    ) -> CoreResult<Quotation> {
        self.assemble_with_id(new_quotation_id(), itinerary, client_info, pricing_options, now)
    }

    /// Assembles a draft under a caller-chosen id.
    ///
    /// ## Errors
    /// `ValidationError` for a blank itinerary title, a malformed currency
    /// code or a negative event price.
    pub fn assemble_with_id(
        &self,
        id: String,
        itinerary: &Itinerary,
        client_info: ClientInfo,
        pricing_options: Option<PricingOptions>,
        now: DateTime<Utc>,
    ) -> CoreResult<Quotation> {
        let base_currency = match itinerary.currency.trim() {
            "" => self.config.base_currency.clone(),
            code => code.to_string(),
        };
        let currency_settings =
            CurrencySettings::new(base_currency, self.config.default_exchange_rates.clone());

        let (client, notes) = client_info.into_client();
        let valid_until = now + Duration::days(QUOTE_VALIDITY_DAYS);

        let quotation = Quotation::new(
            NewQuotation {
                id,
                itinerary_id: Some(itinerary.id.clone()),
                title: itinerary.title.clone(),
                client,
                currency_settings,
                days: itinerary.days.clone(),
                pricing_options: pricing_options.unwrap_or_default(),
                valid_until: Some(valid_until),
                notes,
            },
            now,
        )?;

        tracing::info!(
            quotation_id = %quotation.id,
            itinerary_id = %itinerary.id,
            total = %quotation.total,
            "Quotation assembled from itinerary"
        );
        Ok(quotation)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::pricing::Markup;
    use crate::testing::{day, t0};
    use crate::types::QuotationStatus;
    use crate::versioning::VersionStatus;
    use rust_decimal_macros::dec;

    fn itinerary(currency: &str) -> Itinerary {
        Itinerary {
            id: "it-42".to_string(),
            title: "Rajasthan Circuit".to_string(),
            currency: currency.to_string(),
            days: vec![day(1, &[dec!(400), dec!(150)]), day(2, &[dec!(450)])],
        }
    }

    #[test]
    fn test_assemble_defaults() {
        let q = QuotationAssembler::default()
            .assemble(&itinerary("USD"), ClientInfo::default(), None, t0())
            .unwrap();

        assert_eq!(q.itinerary_id.as_deref(), Some("it-42"));
        assert_eq!(q.title, "Rajasthan Circuit");
        assert_eq!(q.client.name, "Client");
        assert_eq!(q.status, QuotationStatus::Draft);
        assert_eq!(q.subtotal, dec!(1000));
        assert_eq!(q.total, dec!(1000));
        assert_eq!(q.pricing_options.original_total_price, dec!(1000));
        assert_eq!(q.generated_date, t0());
        assert_eq!(q.valid_until, Some(t0() + Duration::days(30)));
        assert_eq!(q.current_version, 1);
        assert_eq!(q.active_version().unwrap().status(), VersionStatus::Draft);
        assert!(!q.is_locked());
    }

    #[test]
    fn test_assemble_with_markup_and_client() {
        let options = PricingOptions::with_markup(Markup::percentage(dec!(10)).unwrap());
        let client = ClientInfo {
            name: Some("Arjun Mehta".to_string()),
            notes: Some("Vegetarian meals".to_string()),
            ..Default::default()
        };

        let q = QuotationAssembler::default()
            .assemble(&itinerary("USD"), client, Some(options), t0())
            .unwrap();

        assert_eq!(q.markup, dec!(100));
        assert_eq!(q.total, dec!(1100));
        assert_eq!(q.client.name, "Arjun Mehta");
        assert_eq!(q.notes, "Vegetarian meals");
    }

    #[test]
    fn test_currency_comes_from_itinerary_or_config() {
        let assembler = QuotationAssembler::default();

        let inr = assembler
            .assemble(&itinerary("INR"), ClientInfo::default(), None, t0())
            .unwrap();
        assert_eq!(inr.currency, "INR");
        assert_eq!(inr.currency_settings.base_currency, "INR");
        assert_eq!(inr.currency_settings.exchange_rates.get("INR"), None);
        assert_eq!(inr.currency_settings.exchange_rates.get("EUR"), Some(dec!(0.92)));

        let fallback = assembler
            .assemble(&itinerary(""), ClientInfo::default(), None, t0())
            .unwrap();
        assert_eq!(fallback.currency, "USD");
    }

    #[test]
    fn test_assemble_rejects_bad_input() {
        let assembler = QuotationAssembler::default();

        let mut negative = itinerary("USD");
        negative.days[0].events[0].price = Some(dec!(-1));
        assert!(matches!(
            assembler.assemble(&negative, ClientInfo::default(), None, t0()),
            Err(CoreError::Validation(_))
        ));

        assert!(assembler
            .assemble(&itinerary("usd"), ClientInfo::default(), None, t0())
            .is_err());
    }

    #[test]
    fn test_fresh_ids() {
        let assembler = QuotationAssembler::default();
        let a = assembler
            .assemble(&itinerary("USD"), ClientInfo::default(), None, t0())
            .unwrap();
        let b = assembler
            .assemble(&itinerary("USD"), ClientInfo::default(), None, t0())
            .unwrap();
        assert_ne!(a.id, b.id);
    }
}
