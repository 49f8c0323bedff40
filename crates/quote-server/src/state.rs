//! Shared application state

use dashmap::DashMap;
use quote_document::{DocumentId, DocumentStore, OwnerId};
use quote_session::{QuoteConfig, QuoteSession, SessionError};
use std::sync::Arc;

type SessionKey = (OwnerId, DocumentId);

/// Shared state for REST handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: QuoteConfig,
    sessions: Arc<DashMap<SessionKey, Arc<QuoteSession>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: QuoteConfig) -> Self {
        Self {
            store,
            config,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Fresh session for `user` in `NEW`
    pub fn new_session(&self, user: OwnerId) -> QuoteSession {
        QuoteSession::new(self.store.clone(), user, self.config.clone())
    }

    /// The caller's session over `id`, loading the document on first use.
    ///
    /// Failed loads are not cached. Callers hand the session back with
    /// [`Self::release`] when the request is done.
    pub async fn session_for(
        &self,
        user: &OwnerId,
        id: &DocumentId,
    ) -> Result<Arc<QuoteSession>, SessionError> {
        let key = (user.clone(), id.clone());
        let cached = self.sessions.get(&key).map(|entry| Arc::clone(entry.value()));
        if let Some(session) = cached {
            return Ok(session);
        }

        let session = Arc::new(self.new_session(user.clone()));
        session.load_document(id).await?;
        Ok(Arc::clone(self.sessions.entry(key).or_insert(session).value()))
    }

    /// Drop `session` from the cache once the store holds everything it has.
    ///
    /// Sessions with buffered edits or a save running stay cached so the
    /// next request for the same document finds them.
    pub fn release(&self, session: &Arc<QuoteSession>) {
        let Some(id) = session.document_id() else {
            return;
        };
        let key = (session.user().clone(), id);
        let removed = self
            .sessions
            .remove_if(&key, |_, cached| Arc::ptr_eq(cached, session) && session.is_idle());
        if removed.is_some() {
            tracing::debug!("Released session for {} on {}", key.0, key.1);
        }
    }

    /// Number of cached sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
