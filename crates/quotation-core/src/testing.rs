//! Shared fixtures for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::currency::{CurrencySettings, ExchangeRates};
use crate::pricing::PricingOptions;
use crate::quotation::{NewQuotation, Quotation};
use crate::types::{Client, EventCategory, ItineraryDay, ItineraryEvent};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap()
}

pub fn day(number: u32, prices: &[Decimal]) -> ItineraryDay {
    ItineraryDay {
        day: number,
        date: format!("2026-11-{:02}", number),
        title: format!("Day {}", number),
        description: None,
        events: prices
            .iter()
            .enumerate()
            .map(|(i, price)| ItineraryEvent {
                id: format!("d{}-e{}", number, i + 1),
                category: EventCategory::Activity,
                title: format!("Activity {}", i + 1),
                description: String::new(),
                time: None,
                location: None,
                price: Some(*price),
            })
            .collect(),
    }
}

pub fn usd_settings() -> CurrencySettings {
    let rates = ExchangeRates::from_pairs([("EUR", dec!(0.92)), ("INR", dec!(83.13))]).unwrap();
    CurrencySettings::new("USD", rates)
}

/// USD quotation with a 1000.00 subtotal and no markup.
pub fn sample_quotation() -> Quotation {
    Quotation::new(
        NewQuotation {
            id: "q-test".to_string(),
            itinerary_id: Some("it-test".to_string()),
            title: "Kerala Backwaters".to_string(),
            client: Client {
                name: "Priya Nair".to_string(),
                ..Default::default()
            },
            currency_settings: usd_settings(),
            days: vec![day(1, &[dec!(600), dec!(400)])],
            pricing_options: PricingOptions::default(),
            valid_until: None,
            notes: String::new(),
        },
        t0(),
    )
    .unwrap()
}
