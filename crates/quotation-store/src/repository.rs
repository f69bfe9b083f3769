//! # Repository Module
//!
//! The document repository contract and an in-memory implementation.
//!
//! ## Optimistic Concurrency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Compare-and-swap on `revision`                       │
//! │                                                                         │
//! │  Caller A: load ──► rev 4 ──► store(q, Some(4)) ──► rev 5   ✓          │
//! │  Caller B: load ──► rev 4 ─────────────────► store(q, Some(4))         │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                      Conflict { expected 4, actual 5 } │
//! │                                                                         │
//! │  store(q, None) writes unconditionally (creation, admin repair).       │
//! │  Every successful store bumps the revision by one; the first is 1.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use quotation_core::{CoreError, CoreResult, Quotation, VersionManager};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Loads and stores quotation documents by id.
pub trait QuotationRepository: Send + Sync {
    /// Loads a quotation, `QuotationNotFound` if absent.
    fn load(&self, id: &str) -> impl Future<Output = CoreResult<Quotation>> + Send;

    /// Stores a quotation and returns its new revision.
    ///
    /// With `expected_revision = Some(r)` the write only succeeds if the
    /// stored document is still at revision `r`.
    fn store(
        &self,
        quotation: &Quotation,
        expected_revision: Option<u64>,
    ) -> impl Future<Output = CoreResult<u64>> + Send;

    /// Removes a quotation, `QuotationNotFound` if absent.
    fn delete(&self, id: &str) -> impl Future<Output = CoreResult<()>> + Send;
}

/// Repository backed by a process-local map.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    documents: Arc<Mutex<HashMap<String, Quotation>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored quotations.
    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }
}

impl QuotationRepository for InMemoryRepository {
    async fn load(&self, id: &str) -> CoreResult<Quotation> {
        self.documents
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::QuotationNotFound(id.to_string()))
    }

    async fn store(&self, quotation: &Quotation, expected_revision: Option<u64>) -> CoreResult<u64> {
        VersionManager::validate_history(quotation)?;

        let mut documents = self.documents.lock().await;
        let current = documents.get(&quotation.id).map(|q| q.revision);

        let revision = match (expected_revision, current) {
            (None, current) => current.unwrap_or(0) + 1,
            (Some(_), None) => return Err(CoreError::QuotationNotFound(quotation.id.clone())),
            (Some(expected), Some(actual)) if expected != actual => {
                warn!(quotation_id = %quotation.id, expected, actual, "store rejected: stale revision");
                return Err(CoreError::Conflict {
                    quotation_id: quotation.id.clone(),
                    expected,
                    actual,
                });
            }
            (Some(_), Some(actual)) => actual + 1,
        };

        let mut stored = quotation.clone();
        stored.revision = revision;
        documents.insert(stored.id.clone(), stored);

        debug!(quotation_id = %quotation.id, revision, "Quotation stored");
        Ok(revision)
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        if self.documents.lock().await.remove(id).is_none() {
            return Err(CoreError::QuotationNotFound(id.to_string()));
        }
        debug!(quotation_id = %id, "Quotation deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
