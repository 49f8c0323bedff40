//! Document store gateway
//!
//! [`DocumentStore`] is the persistence seam. [`MemoryStore`] keeps documents
//! in a concurrent map and is used by the server and tests.

use crate::document::{DocumentId, OwnerId, QuoteDocument, QuoteDraft};
use crate::error::StoreError;
use crate::patch::QuotePatch;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;

/// Persistence for quote documents
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document and assign its id
    async fn create(&self, draft: QuoteDraft) -> Result<QuoteDocument, StoreError>;

    /// Fetch a document by id
    async fn get(&self, id: &DocumentId) -> Result<QuoteDocument, StoreError>;

    /// Merge `patch` into the stored document and stamp `updated_at`
    async fn update(&self, id: &DocumentId, patch: &QuotePatch) -> Result<(), StoreError>;

    /// Documents owned by `owner`, most recently updated first
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<QuoteDocument>, StoreError>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<DocumentId, QuoteDocument>,
    clock: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Store holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Strictly increasing timestamp so `updated_at` ordering is total
    fn stamp(&self) -> DateTime<Utc> {
        let mut last = self.clock.lock();
        let now = Utc::now();
        let next = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, mut draft: QuoteDraft) -> Result<QuoteDocument, StoreError> {
        let now = self.stamp();
        draft.created_at = now;
        draft.updated_at = now;
        let doc = draft.into_document(DocumentId::generate());
        self.documents.insert(doc.id.clone(), doc.clone());
        tracing::debug!("Stored new document {}", doc.id);
        Ok(doc)
    }

    async fn get(&self, id: &DocumentId) -> Result<QuoteDocument, StoreError> {
        self.documents
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn update(&self, id: &DocumentId, patch: &QuotePatch) -> Result<(), StoreError> {
        let stamp = self.stamp();
        let mut entry = self
            .documents
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        patch.apply_to(entry.value_mut());
        entry.value_mut().touch(stamp);
        Ok(())
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<QuoteDocument>, StoreError> {
        let mut docs: Vec<QuoteDocument> = self
            .documents
            .iter()
            .filter(|entry| &entry.value().owner_id == owner)
            .map(|entry| entry.value().clone())
            .collect();
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(docs)
    }
}
