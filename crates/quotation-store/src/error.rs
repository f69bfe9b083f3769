//! # API Error Type
//!
//! Unified error type returned by [`QuotationService`](crate::QuotationService).
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Waypoint Quotes                        │
//! │                                                                         │
//! │  Caller                      Service                                    │
//! │  ──────                      ───────                                    │
//! │                                                                         │
//! │  lock_version("q-1", "alice", Some(4))                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  load ── QuotationNotFound ─────────────────────┐               │  │
//! │  │    │                                            │               │  │
//! │  │    ▼                                            ▼               │  │
//! │  │  revision 5 ≠ 4 ── Conflict ───────────────── ApiError ────────►│  │
//! │  │    │                                            ▲               │  │
//! │  │    ▼                                            │               │  │
//! │  │  VersionManager ── AlreadyLocked ───────────────┘               │  │
//! │  │    │                                                            │  │
//! │  │    ▼                                                            │  │
//! │  │  store ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "ALREADY_LOCKED",                                            │
//! │    "message": "Version 1 of quotation q-1 is already locked by bob" }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use quotation_core::CoreError;
use serde::Serialize;

/// Error returned from service operations.
///
/// ## Serialization
/// ```json
/// {
///   "code": "LOCKED_VERSION",
///   "message": "Version 2 of quotation q-1 is locked"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Quotation or version not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Mutation attempted on a locked version (423)
    LockedVersion,

    /// Lock requested on an already locked version (409)
    AlreadyLocked,

    /// Stale revision; reload and retry (409)
    Conflict,

    /// Display currency could not be converted (422)
    ConversionError,
}

/// Result type for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::QuotationNotFound(_) | CoreError::VersionNotFound { .. } => ErrorCode::NotFound,
            CoreError::LockedVersion { .. } => ErrorCode::LockedVersion,
            CoreError::AlreadyLocked { .. } => ErrorCode::AlreadyLocked,
            CoreError::Conflict { .. } => ErrorCode::Conflict,
            CoreError::Conversion { .. } => ErrorCode::ConversionError,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
