//! # quotation-store: Repository Seam for Waypoint Quotes
//!
//! Connects the pure pricing engine to a document repository with
//! optimistic concurrency.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Waypoint Quotes Data Flow                          │
//! │                                                                         │
//! │  Caller (HTTP handler, job, CLI)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                quotation-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  Service      │    │  Repository   │    │  ApiError    │  │   │
//! │  │   │ (service.rs)  │───►│ (trait)       │    │  (error.rs)  │  │   │
//! │  │   │ load/apply/   │    │ InMemory impl │    │  code + msg  │  │   │
//! │  │   │ store         │    │ CAS revision  │    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        quotation-core (pricing, currency, versions)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`repository`] - Repository contract and in-memory implementation
//! - [`service`] - load → transform → store for every engine operation
//! - [`error`] - Caller-facing error type
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quotation_store::{InMemoryRepository, QuotationService};
//!
//! let service = QuotationService::new(InMemoryRepository::new(), EngineConfig::from_env()?);
//!
//! let draft = service.create_from_itinerary(&itinerary, client_info, None).await?;
//! let locked = service.lock_version(&draft.id, "alice", Some(draft.revision)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ApiError, ApiResult, ErrorCode};
pub use repository::{InMemoryRepository, QuotationRepository};
pub use service::QuotationService;
