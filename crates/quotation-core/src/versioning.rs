//! # Versioning Module
//!
//! Append-only version history with lock semantics.
//!
//! ## Version State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Version Lifecycle (per version v)                    │
//! │                                                                         │
//! │   create ──► ┌──────────┐  save_draft  ┌──────────┐                     │
//! │              │ Draft(v) │ ───────────► │ Saved(v) │                     │
//! │              │          │ ◄─────────── │          │                     │
//! │              └────┬─────┘     edit     └────┬─────┘                     │
//! │                   │ lock_version            │ lock_version              │
//! │                   ▼                         ▼                           │
//! │              ┌─────────────────────────────────────┐                    │
//! │              │             Locked(v)               │                    │
//! │              │  edit / save_draft ──► LockedVersion │                    │
//! │              │  lock_version      ──► AlreadyLocked │                    │
//! │              └─────────────────────────────────────┘                    │
//! │                                                                         │
//! │   create_version(any state) ──► Draft(v+1), current_version = v+1      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Layout
//! `version_history[i].version_number == i + 1` and the active record is
//! `version_history[current_version - 1]`. Every record carries a full copy
//! of the working state at the time it was last snapshotted, so a locked
//! record can be shown without replaying anything.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::CurrencySettings;
use crate::error::{CoreError, CoreResult};
use crate::pricing::PricingOptions;
use crate::quotation::Quotation;
use crate::types::ItineraryDay;
use crate::validation::validate_description;

/// Description given to the first version of every quotation.
pub const INITIAL_VERSION_DESCRIPTION: &str = "Initial version";

/// Name recorded when a lock is requested without a user.
pub const UNKNOWN_LOCKER: &str = "Unknown user";

// =============================================================================
// Version Records
// =============================================================================

/// Snapshot of the editable part of a quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VersionState {
    pub days: Vec<ItineraryDay>,
    pub pricing_options: PricingOptions,
    #[ts(as = "String")]
    pub subtotal: Decimal,
    #[ts(as = "String")]
    pub markup: Decimal,
    #[ts(as = "String")]
    pub total: Decimal,
    pub currency_settings: CurrencySettings,
}

/// One entry of a quotation's version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub version_number: u32,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub is_locked: bool,
    #[serde(default)]
    pub locked_by: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub locked_at: Option<DateTime<Utc>>,
    /// Working fields have changed since the last snapshot.
    pub is_draft: bool,
    pub state: VersionState,
}

/// Position of a version in the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Draft,
    Saved,
    Locked,
}

impl VersionRecord {
    fn new(version_number: u32, description: String, state: VersionState, now: DateTime<Utc>) -> Self {
        VersionRecord {
            version_number,
            created_at: now,
            description,
            is_locked: false,
            locked_by: None,
            locked_at: None,
            is_draft: true,
            state,
        }
    }

    /// Derives the state machine position from the stored flags.
    pub fn status(&self) -> VersionStatus {
        if self.is_locked {
            VersionStatus::Locked
        } else if self.is_draft {
            VersionStatus::Draft
        } else {
            VersionStatus::Saved
        }
    }
}

// =============================================================================
// Version Manager
// =============================================================================

/// State machine over a quotation's version history.
///
/// Every transition checks its preconditions before touching the quotation,
/// so an `Err` always leaves the aggregate exactly as it was.
pub struct VersionManager;

impl VersionManager {
    /// History of a brand-new quotation: a single draft version 1.
    pub fn create(initial: VersionState, now: DateTime<Utc>) -> Vec<VersionRecord> {
        vec![VersionRecord::new(
            1,
            INITIAL_VERSION_DESCRIPTION.to_string(),
            initial,
            now,
        )]
    }

    /// Flags the active version as having unsaved edits.
    ///
    /// Called by every working-field edit after the lock check has passed.
    pub fn mark_edited(quotation: &mut Quotation) -> CoreResult<()> {
        let id = quotation.id.clone();
        let record = Self::active_mut(quotation)?;
        if record.is_locked {
            return Err(CoreError::locked(id, record.version_number));
        }
        if !record.is_draft {
            tracing::debug!(quotation_id = %id, version = record.version_number, "Saved → Draft");
        }
        record.is_draft = true;
        Ok(())
    }

    /// Snapshots the working fields into the active version.
    ///
    /// ## Errors
    /// `LockedVersion` if the active version is locked.
    pub fn save_draft(quotation: &mut Quotation) -> CoreResult<()> {
        let state = quotation.snapshot();
        let id = quotation.id.clone();
        let record = Self::active_mut(quotation)?;

        if record.is_locked {
            tracing::warn!(quotation_id = %id, version = record.version_number, "save rejected: version is locked");
            return Err(CoreError::locked(id, record.version_number));
        }

        record.state = state;
        record.is_draft = false;
        tracing::debug!(quotation_id = %id, version = record.version_number, "Draft → Saved");
        Ok(())
    }

    /// Freezes the active version.
    ///
    /// The working state is snapshotted first, so the locked record holds
    /// exactly what was on screen when the lock was taken.
    ///
    /// ## Errors
    /// `AlreadyLocked` if the active version is locked.
    pub fn lock_version(quotation: &mut Quotation, locked_by: &str, now: DateTime<Utc>) -> CoreResult<()> {
        let state = quotation.snapshot();
        let id = quotation.id.clone();
        let record = Self::active_mut(quotation)?;

        if record.is_locked {
            tracing::warn!(quotation_id = %id, version = record.version_number, "lock rejected: already locked");
            return Err(CoreError::AlreadyLocked {
                quotation_id: id,
                version: record.version_number,
                locked_by: record.locked_by.clone().unwrap_or_else(|| UNKNOWN_LOCKER.to_string()),
            });
        }

        let locked_by = match locked_by.trim() {
            "" => UNKNOWN_LOCKER.to_string(),
            name => name.to_string(),
        };

        record.state = state;
        record.is_draft = false;
        record.is_locked = true;
        record.locked_by = Some(locked_by.clone());
        record.locked_at = Some(now);

        tracing::info!(quotation_id = %id, version = record.version_number, locked_by = %locked_by, "Version locked");
        Ok(())
    }

    /// Appends a new draft version carrying the working state forward.
    ///
    /// Never blocked by a lock: a locked version keeps its frozen snapshot and
    /// is superseded. An unlocked active version is snapshotted first so that
    /// nothing typed before the new version was cut is lost.
    ///
    /// ## Errors
    /// `ValidationError` for a blank or overlong description.
    pub fn create_version(quotation: &mut Quotation, description: &str, now: DateTime<Utc>) -> CoreResult<()> {
        let description = validate_description(description)?;
        Self::validate_history(quotation)?;

        let state = quotation.snapshot();
        let next = quotation.current_version + 1;
        let id = quotation.id.clone();

        let record = Self::active_mut(quotation)?;
        if !record.is_locked {
            record.state = state.clone();
            record.is_draft = false;
        }

        quotation
            .version_history
            .push(VersionRecord::new(next, description, state, now));
        quotation.current_version = next;

        tracing::info!(quotation_id = %id, version = next, "Version created");
        Ok(())
    }

    /// Returns the record of version `number`.
    pub fn view_version(quotation: &Quotation, number: u32) -> CoreResult<&VersionRecord> {
        number
            .checked_sub(1)
            .and_then(|idx| quotation.version_history.get(idx as usize))
            .filter(|record| record.version_number == number)
            .ok_or_else(|| CoreError::VersionNotFound {
                quotation_id: quotation.id.clone(),
                version: number,
            })
    }

    /// Checks the history is gapless from 1 and `current_version` is in range.
    pub fn validate_history(quotation: &Quotation) -> CoreResult<()> {
        for (idx, record) in quotation.version_history.iter().enumerate() {
            let expected = idx as u32 + 1;
            if record.version_number != expected {
                return Err(CoreError::VersionNotFound {
                    quotation_id: quotation.id.clone(),
                    version: expected,
                });
            }
        }

        if quotation.current_version == 0
            || quotation.current_version as usize > quotation.version_history.len()
        {
            return Err(CoreError::VersionNotFound {
                quotation_id: quotation.id.clone(),
                version: quotation.current_version,
            });
        }

        Ok(())
    }

    fn active_mut(quotation: &mut Quotation) -> CoreResult<&mut VersionRecord> {
        let number = quotation.current_version;
        let id = &quotation.id;
        number
            .checked_sub(1)
            .and_then(|idx| quotation.version_history.get_mut(idx as usize))
            .ok_or_else(|| CoreError::VersionNotFound {
                quotation_id: id.clone(),
                version: number,
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::Markup;
    use crate::quotation::QuotationPatch;
    use crate::testing::{sample_quotation, t0};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_quotation_starts_as_draft_one() {
        let q = sample_quotation();

        assert_eq!(q.current_version, 1);
        assert_eq!(q.version_history.len(), 1);
        assert_eq!(q.active_version().unwrap().status(), VersionStatus::Draft);
        assert_eq!(q.active_version().unwrap().description, INITIAL_VERSION_DESCRIPTION);
        assert!(!q.is_locked());
    }

    #[test]
    fn test_save_draft_snapshots_working_state() {
        let mut q = sample_quotation();
        q.recalculate(PricingOptions::with_markup(Markup::percentage(dec!(10)).unwrap()))
            .unwrap();
        VersionManager::save_draft(&mut q).unwrap();

        let record = q.active_version().unwrap();
        assert_eq!(record.status(), VersionStatus::Saved);
        assert_eq!(record.state, q.snapshot());

        q.edit(QuotationPatch {
            notes: Some("window seats".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(q.active_version().unwrap().status(), VersionStatus::Draft);
    }

    #[test]
    fn test_lock_records_who_and_when() {
        let mut q = sample_quotation();
        let at = t0() + Duration::hours(2);
        VersionManager::lock_version(&mut q, "alice", at).unwrap();

        let record = q.active_version().unwrap();
        assert_eq!(record.status(), VersionStatus::Locked);
        assert_eq!(record.locked_by.as_deref(), Some("alice"));
        assert_eq!(record.locked_at, Some(at));
        assert!(q.is_locked());
    }

    #[test]
    fn test_lock_without_user_records_unknown() {
        let mut q = sample_quotation();
        VersionManager::lock_version(&mut q, "  ", t0()).unwrap();
        assert_eq!(q.active_version().unwrap().locked_by.as_deref(), Some(UNKNOWN_LOCKER));
    }

    #[test]
    fn test_double_lock_is_rejected() {
        let mut q = sample_quotation();
        VersionManager::lock_version(&mut q, "alice", t0()).unwrap();
        let before = q.clone();

        let err = VersionManager::lock_version(&mut q, "bob", t0()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::AlreadyLocked { version: 1, ref locked_by, .. } if locked_by == "alice"
        ));
        assert_eq!(q, before);
    }

    #[test]
    fn test_locked_version_rejects_edits_and_saves() {
        let mut q = sample_quotation();
        VersionManager::lock_version(&mut q, "alice", t0()).unwrap();
        let before = q.clone();
        let before_json = serde_json::to_string(&q).unwrap();

        let err = q
            .recalculate(PricingOptions::with_markup(Markup::fixed(dec!(99)).unwrap()))
            .unwrap_err();
        assert!(matches!(err, CoreError::LockedVersion { version: 1, .. }));

        let err = q
            .edit(QuotationPatch {
                title: Some("Changed".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::LockedVersion { .. }));

        let err = VersionManager::save_draft(&mut q).unwrap_err();
        assert!(matches!(err, CoreError::LockedVersion { .. }));

        assert_eq!(q, before);
        assert_eq!(serde_json::to_string(&q).unwrap(), before_json);
    }

    #[test]
    fn test_create_version_is_monotonic() {
        let mut q = sample_quotation();
        let n = 5;
        for i in 0..n {
            VersionManager::create_version(&mut q, &format!("revision {}", i), t0()).unwrap();
        }

        assert_eq!(q.current_version, n + 1);
        let numbers: Vec<u32> = q.version_history.iter().map(|r| r.version_number).collect();
        assert_eq!(numbers, (1..=n + 1).collect::<Vec<_>>());
        assert!(VersionManager::validate_history(&q).is_ok());
    }

    #[test]
    fn test_create_version_supersedes_locked_version() {
        let mut q = sample_quotation();
        VersionManager::lock_version(&mut q, "alice", t0()).unwrap();
        let frozen = q.version_history[0].clone();

        VersionManager::create_version(&mut q, "Client wants 5* hotels", t0()).unwrap();
        assert_eq!(q.current_version, 2);
        assert!(!q.is_locked());
        assert_eq!(q.active_version().unwrap().status(), VersionStatus::Draft);

        q.recalculate(PricingOptions::with_markup(Markup::percentage(dec!(20)).unwrap()))
            .unwrap();
        assert_eq!(q.version_history[0], frozen);
    }

    #[test]
    fn test_create_version_snapshots_unlocked_active() {
        let mut q = sample_quotation();
        q.recalculate(PricingOptions::with_markup(Markup::fixed(dec!(40)).unwrap()))
            .unwrap();
        let working = q.snapshot();

        VersionManager::create_version(&mut q, "second pass", t0()).unwrap();

        assert_eq!(q.version_history[0].state, working);
        assert_eq!(q.version_history[0].status(), VersionStatus::Saved);
        assert_eq!(q.version_history[1].state, working);
    }

    #[test]
    fn test_create_version_requires_description() {
        let mut q = sample_quotation();
        let before = q.clone();

        let err = VersionManager::create_version(&mut q, "   ", t0()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(q, before);
    }

    #[test]
    fn test_view_version() {
        let mut q = sample_quotation();
        VersionManager::create_version(&mut q, "second", t0()).unwrap();

        assert_eq!(VersionManager::view_version(&q, 2).unwrap().description, "second");
        assert!(matches!(
            VersionManager::view_version(&q, 0),
            Err(CoreError::VersionNotFound { version: 0, .. })
        ));
        assert!(matches!(
            VersionManager::view_version(&q, 3),
            Err(CoreError::VersionNotFound { version: 3, .. })
        ));
    }

    #[test]
    fn test_validate_history_detects_gaps() {
        let mut q = sample_quotation();
        VersionManager::create_version(&mut q, "second", t0()).unwrap();
        q.version_history[1].version_number = 3;
        assert!(VersionManager::validate_history(&q).is_err());

        let mut q = sample_quotation();
        q.current_version = 2;
        assert!(VersionManager::validate_history(&q).is_err());
    }
}
