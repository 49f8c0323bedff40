//! Last-persisted document plus its local change buffer

use crate::document::{DocumentId, QuoteDocument};
use crate::error::DocumentError;
use crate::patch::QuotePatch;
use crate::store::DocumentStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    /// Nothing was pending; the store was not called
    Unchanged,
    /// One update was written
    Written,
}

/// A persisted document with uncommitted local edits.
///
/// `document` always mirrors what the store holds. `pending` only ever
/// contains fields that differ from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedQuote {
    document: QuoteDocument,
    pending: QuotePatch,
}

impl TrackedQuote {
    /// Track a freshly created or loaded document
    #[must_use]
    pub fn new(document: QuoteDocument) -> Self {
        Self {
            document,
            pending: QuotePatch::default(),
        }
    }

    /// Last-persisted version
    #[inline]
    #[must_use]
    pub fn document(&self) -> &QuoteDocument {
        &self.document
    }

    /// Document id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.document.id
    }

    /// Uncommitted changes
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &QuotePatch {
        &self.pending
    }

    /// Whether a commit would write anything
    #[inline]
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Persisted document with pending changes laid over it
    #[must_use]
    pub fn current(&self) -> QuoteDocument {
        let mut view = self.document.clone();
        self.pending.apply_to(&mut view);
        view
    }

    /// Merge `patch` into the buffer. Returns whether the buffer changed.
    pub fn apply_local_change(&mut self, patch: QuotePatch) -> bool {
        let merged = self
            .pending
            .clone()
            .merge(patch)
            .without_unchanged(&self.document);
        if merged == self.pending {
            return false;
        }
        self.pending = merged;
        true
    }

    /// Take a snapshot of the buffer for writing, if anything is pending.
    ///
    /// The tracker is not borrowed while the write runs, so callers may
    /// release their locks between this and [`Self::finish_commit`].
    #[must_use]
    pub fn begin_commit(&self) -> Option<PendingCommit> {
        self.has_pending_changes().then(|| PendingCommit {
            id: self.document.id.clone(),
            patch: self.pending.clone(),
        })
    }

    /// Apply the result of writing `commit`.
    ///
    /// On success the written fields move into the persisted document and
    /// edits made after [`Self::begin_commit`] stay pending. On failure the
    /// document and buffer are left untouched.
    ///
    /// # Errors
    /// Returns the write error unchanged
    pub fn finish_commit(
        &mut self,
        commit: PendingCommit,
        written: Result<(), DocumentError>,
    ) -> Result<CommitOutcome, DocumentError> {
        written?;
        commit.patch.apply_to(&mut self.document);
        self.document.touch(Utc::now());
        self.pending = std::mem::take(&mut self.pending).without_unchanged(&self.document);
        tracing::info!("Committed changes to {}", commit.id);
        Ok(CommitOutcome::Written)
    }

    /// Write pending changes with a single `update`.
    ///
    /// # Errors
    /// Returns [`DocumentError::Persistence`] (or `NotFound`) when the store
    /// rejects the update; the document and buffer are left untouched
    pub async fn commit<S>(&mut self, store: &S) -> Result<CommitOutcome, DocumentError>
    where
        S: DocumentStore + ?Sized,
    {
        let Some(commit) = self.begin_commit() else {
            tracing::debug!("Commit skipped for {}: no pending changes", self.document.id);
            return Ok(CommitOutcome::Unchanged);
        };
        let written = commit.write(store).await;
        self.finish_commit(commit, written)
    }
}

/// Buffer snapshot taken by [`TrackedQuote::begin_commit`]
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
    id: DocumentId,
    patch: QuotePatch,
}

impl PendingCommit {
    /// Target document
    #[inline]
    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Fields being written
    #[inline]
    #[must_use]
    pub fn patch(&self) -> &QuotePatch {
        &self.patch
    }

    /// Send the snapshot with a single `update`
    ///
    /// # Errors
    /// Returns the store error converted to [`DocumentError`]
    pub async fn write<S>(&self, store: &S) -> Result<(), DocumentError>
    where
        S: DocumentStore + ?Sized,
    {
        store.update(&self.id, &self.patch).await.map_err(|e| {
            tracing::warn!("Commit failed for {}: {}", self.id, e);
            DocumentError::from(e)
        })
    }
}
