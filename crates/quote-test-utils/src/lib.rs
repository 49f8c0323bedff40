//! Testing utilities for the quote builder workspace
//!
//! Shared fixtures and an instrumented document store.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use quote_document::{
    CompanyInfo, DocumentId, DocumentStore, MemoryStore, OwnerId, QuoteDocument, QuoteDraft,
    QuotePatch, StoreError,
};
use quote_table::{Row, TableModel, TableSnapshot};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn valid_company_info() -> CompanyInfo {
    CompanyInfo::new("Acme Ltd", "123456789", "0501234567", "Globex")
}

pub fn valid_draft(owner: &str) -> QuoteDraft {
    QuoteDraft::create(OwnerId::new(owner), valid_company_info(), None).unwrap()
}

/// Two priced rows (100×2, 50×1) behind a subheader worth 999×999
pub fn sample_rows() -> Vec<Row> {
    vec![
        Row::priced("Section", 999.0, 999.0).as_subheader(),
        Row::priced("Design", 2.0, 100.0),
        Row::priced("Hosting", 1.0, 50.0),
    ]
}

pub fn sample_snapshot() -> TableSnapshot {
    TableSnapshot {
        rows: sample_rows(),
        ..TableSnapshot::empty()
    }
}

pub fn sample_table() -> TableModel {
    TableModel::from_snapshot(sample_snapshot())
}

/// Call counts observed by a [`RecordingStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub create: usize,
    pub get: usize,
    pub update: usize,
    pub list: usize,
}

/// [`MemoryStore`] wrapper that counts calls and can fail updates on demand
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    create: AtomicUsize,
    get: AtomicUsize,
    update: AtomicUsize,
    list: AtomicUsize,
    failing_updates: AtomicUsize,
    updates: Mutex<Vec<(DocumentId, QuotePatch)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Make the next `n` updates fail with `Unavailable`
    pub fn fail_next_updates(&self, n: usize) {
        self.failing_updates.store(n, Ordering::SeqCst);
    }

    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            create: self.create.load(Ordering::SeqCst),
            get: self.get.load(Ordering::SeqCst),
            update: self.update.load(Ordering::SeqCst),
            list: self.list.load(Ordering::SeqCst),
        }
    }

    /// Patches that reached the backing store, in order
    pub fn written_patches(&self) -> Vec<(DocumentId, QuotePatch)> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn create(&self, draft: QuoteDraft) -> Result<QuoteDocument, StoreError> {
        self.create.fetch_add(1, Ordering::SeqCst);
        self.inner.create(draft).await
    }

    async fn get(&self, id: &DocumentId) -> Result<QuoteDocument, StoreError> {
        self.get.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn update(&self, id: &DocumentId, patch: &QuotePatch) -> Result<(), StoreError> {
        self.update.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing_updates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreError::Unavailable("injected failure".into()));
        }
        self.inner.update(id, patch).await?;
        self.updates.lock().push((id.clone(), patch.clone()));
        Ok(())
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<QuoteDocument>, StoreError> {
        self.list.fetch_add(1, Ordering::SeqCst);
        self.inner.list_by_owner(owner).await
    }
}
