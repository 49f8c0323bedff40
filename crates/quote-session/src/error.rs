//! Error types for quote sessions

use crate::state_machine::SessionState;
use quote_document::{DocumentError, DocumentId, StoreError, ValidationError};

/// Session error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// Company info is malformed; the session stays in `NEW`
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Requested document does not exist
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// Caller does not own the document
    #[error("not authorized to access this document")]
    Unauthorized,

    /// Store operation failed; pending edits are kept
    #[error("persistence failed: {0}")]
    Persistence(StoreError),

    /// Operation is not legal in the current state
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },

    /// A save is already running
    #[error("a save is already in flight")]
    SaveInFlight,

    /// Operation needs an open document
    #[error("no document is open")]
    NoDocument,

    /// Identity gateway returned nobody
    #[error("no user is signed in")]
    NotSignedIn,
}

impl SessionError {
    /// Whether repeating the operation may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Persistence(StoreError::Unavailable(_)) | Self::SaveInFlight
        )
    }

    /// Whether the error ends the session
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Unauthorized)
    }
}

impl From<DocumentError> for SessionError {
    fn from(value: DocumentError) -> Self {
        match value {
            DocumentError::Validation(e) => Self::Validation(e),
            DocumentError::NotFound(id) => Self::NotFound(id),
            DocumentError::Unauthorized => Self::Unauthorized,
            DocumentError::Persistence(e) => Self::Persistence(e),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        DocumentError::from(value).into()
    }
}
