//! # Domain Types
//!
//! Itinerary and client types that a quotation is built from.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Itinerary     │   │  ItineraryDay   │   │ ItineraryEvent  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  day (1-based)  │──►│  id             │       │
//! │  │  title          │   │  date           │   │  category       │       │
//! │  │  currency       │   │  title          │   │  title          │       │
//! │  │  days[]         │   │  events[]       │   │  price?         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Client       │   │ QuotationStatus │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  name           │   │  Draft / Sent   │                             │
//! │  │  email, phone   │   │  Accepted       │                             │
//! │  │  reference_no   │   │  Rejected       │                             │
//! │  └─────────────────┘   │  Expired        │                             │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Event prices are expressed in the quotation's base currency.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::validation::validate_non_negative;

// =============================================================================
// Itinerary
// =============================================================================

/// Category of an itinerary event.
///
/// Content blocks (`Heading`, `Paragraph`, `List`, `Image`) normally carry no
/// price, but nothing stops a priced one from counting towards the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Flight,
    Hotel,
    Activity,
    Transfer,
    Meal,
    Photo,
    #[default]
    Other,
    Heading,
    Paragraph,
    List,
    Image,
}

/// A single bookable (or descriptive) item on an itinerary day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryEvent {
    pub id: String,
    #[serde(default)]
    pub category: EventCategory,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Price in the base currency; `None` means the event is not priced.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub price: Option<Decimal>,
}

/// One day of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    /// 1-based day number.
    pub day: u32,
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub events: Vec<ItineraryEvent>,
}

/// Source itinerary a quotation draft is assembled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: String,
    pub title: String,
    /// Base currency of every event price (empty means "engine default").
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub days: Vec<ItineraryDay>,
}

/// Sums every event price across every day.
///
/// Unpriced events count as zero. A negative price is a validation error:
/// it would let a subtotal go below zero. So is a sum past `Decimal::MAX`.
pub fn itinerary_subtotal(days: &[ItineraryDay]) -> CoreResult<Decimal> {
    let mut subtotal = Decimal::ZERO;
    for event in days.iter().flat_map(|d| d.events.iter()) {
        if let Some(price) = event.price {
            validate_non_negative(&format!("price of event {}", event.id), price)?;
            subtotal = subtotal
                .checked_add(price)
                .ok_or_else(|| ValidationError::OutOfRange {
                    field: "subtotal".to_string(),
                })?;
        }
    }
    Ok(subtotal)
}

// =============================================================================
// Client
// =============================================================================

/// The client a quotation is addressed to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub reference_no: String,
}

/// Loosely-filled client details as captured by the setup dialog.
///
/// Every field is optional; [`ClientInfo::into_client`] applies the fallbacks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
}

/// Name used when the caller supplied no client name.
pub const DEFAULT_CLIENT_NAME: &str = "Client";

impl ClientInfo {
    /// Builds a [`Client`], using empty strings for missing contact fields.
    pub fn into_client(self) -> (Client, String) {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string());

        let client = Client {
            name,
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            reference_no: self.reference_no.unwrap_or_default(),
        };
        (client, self.notes.unwrap_or_default())
    }
}

// =============================================================================
// Quotation Status
// =============================================================================

/// Commercial status of a quotation.
///
/// Independent of version locking: a `Sent` quotation may still have an
/// unlocked draft version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl QuotationStatus {
    /// Whether the client can still act on the quotation.
    pub fn is_open(&self) -> bool {
        matches!(self, QuotationStatus::Draft | QuotationStatus::Sent)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
