//! Quote editing session
//!
//! [`QuoteSession`] drives one user through create/load, local edits,
//! commit-on-preview and back. Edits never touch the store; only
//! [`QuoteSession::load_document`], [`QuoteSession::create_document`] and
//! [`QuoteSession::request_preview`] await it.
//!
//! State lives behind a mutex that is released before every await, so a
//! concurrent caller observes `SAVING` while an update is in flight.

use crate::config::QuoteConfig;
use crate::error::SessionError;
use crate::preview::{build_preview, QuotePreview};
use crate::state_machine::{allowed_transitions, validate_transition, SessionState};
use parking_lot::Mutex;
use quote_document::{
    ClauseList, CompanyInfo, DocumentId, DocumentStore, IdentityProvider, OwnerId, QuoteDocument,
    QuoteDraft, QuotePatch, TrackedQuote,
};
use quote_table::{compute_totals, TableModel, Totals};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a preview request did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewOutcome {
    /// Pending changes were written, then the preview opened
    Saved,
    /// Nothing was pending; the preview opened without a store call
    Unchanged,
    /// A save was already running; the request was dropped
    Ignored,
}

struct Open {
    quote: TrackedQuote,
    table: TableModel,
}

struct Inner {
    state: SessionState,
    open: Option<Open>,
    last_error: Option<SessionError>,
    /// A create is awaiting the store; the session is still `NEW`
    creating: bool,
}

impl Inner {
    fn transition(&mut self, to: SessionState) -> Result<(), SessionError> {
        validate_transition(self.state, to)?;
        tracing::debug!("Session state {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        self.last_error = Some(err.clone());
        err
    }

    /// Local edits are only accepted while `READY`
    fn editable(&mut self) -> Result<&mut Open, SessionError> {
        match self.state {
            SessionState::Ready => self.open.as_mut().ok_or(SessionError::NoDocument),
            SessionState::Saving => Err(SessionError::SaveInFlight),
            _ if self.open.is_none() => Err(SessionError::NoDocument),
            from => Err(SessionError::InvalidTransition {
                from,
                to: SessionState::Ready,
            }),
        }
    }
}

/// A single user's editing session over one quote
pub struct QuoteSession {
    store: Arc<dyn DocumentStore>,
    user: OwnerId,
    config: QuoteConfig,
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for QuoteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteSession")
            .field("user", &self.user)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl QuoteSession {
    /// Fresh session in `NEW` for `user`
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, user: OwnerId, config: QuoteConfig) -> Self {
        Self {
            store,
            user,
            config,
            inner: Mutex::new(Inner {
                state: SessionState::New,
                open: None,
                last_error: None,
                creating: false,
            }),
        }
    }

    /// Session for whoever the identity gateway reports as signed in.
    ///
    /// # Errors
    /// Returns [`SessionError::NotSignedIn`] when there is no current user
    pub fn for_current_user(
        store: Arc<dyn DocumentStore>,
        identity: &dyn IdentityProvider,
        config: QuoteConfig,
    ) -> Result<Self, SessionError> {
        let user = identity.current_user().ok_or(SessionError::NotSignedIn)?;
        Ok(Self::new(store, user.id, config))
    }

    /// Owner of every document this session touches
    #[inline]
    #[must_use]
    pub fn user(&self) -> &OwnerId {
        &self.user
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// States reachable from the current one
    #[must_use]
    pub fn allowed_transitions(&self) -> Vec<SessionState> {
        allowed_transitions(self.state())
    }

    /// Error that moved the session to `FAILED` or back to `READY`
    #[must_use]
    pub fn last_error(&self) -> Option<SessionError> {
        self.inner.lock().last_error.clone()
    }

    /// Id of the open document
    #[must_use]
    pub fn document_id(&self) -> Option<DocumentId> {
        self.inner
            .lock()
            .open
            .as_ref()
            .map(|open| open.quote.id().clone())
    }

    /// Open document with pending edits applied
    #[must_use]
    pub fn document(&self) -> Option<QuoteDocument> {
        self.inner
            .lock()
            .open
            .as_ref()
            .map(|open| open.quote.current())
    }

    /// Open document as last persisted
    #[must_use]
    pub fn persisted_document(&self) -> Option<QuoteDocument> {
        self.inner
            .lock()
            .open
            .as_ref()
            .map(|open| open.quote.document().clone())
    }

    /// The uncommitted change buffer
    #[must_use]
    pub fn pending_changes(&self) -> Option<QuotePatch> {
        self.inner
            .lock()
            .open
            .as_ref()
            .map(|open| open.quote.pending().clone())
    }

    /// No edits buffered and nothing awaiting the store
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let inner = self.inner.lock();
        inner.state != SessionState::Saving
            && !inner.creating
            && inner
                .open
                .as_ref()
                .map_or(true, |open| !open.quote.has_pending_changes())
    }

    /// Working copy of the table
    #[must_use]
    pub fn table(&self) -> Option<TableModel> {
        self.inner.lock().open.as_ref().map(|open| open.table.clone())
    }

    /// Totals of the working table at the configured VAT rate
    #[must_use]
    pub fn totals(&self) -> Option<Totals> {
        let rate = self.config.vat_rate;
        self.inner
            .lock()
            .open
            .as_ref()
            .map(|open| compute_totals(open.table.rows(), rate))
    }

    /// Validate company info and persist a new document.
    ///
    /// # Errors
    /// - [`SessionError::Validation`] for bad company info; the store is not
    ///   called and the session stays in `NEW`
    /// - [`SessionError::Persistence`] when the store rejects the create
    /// - [`SessionError::SaveInFlight`] while another create is running
    /// - [`SessionError::InvalidTransition`] outside `NEW`
    pub async fn create_document(
        &self,
        company_info: CompanyInfo,
        logo: Option<String>,
    ) -> Result<QuoteDocument, SessionError> {
        let draft = QuoteDraft::create(self.user.clone(), company_info, logo)?;
        {
            let mut inner = self.inner.lock();
            if inner.creating {
                return Err(SessionError::SaveInFlight);
            }
            if inner.state != SessionState::New {
                return Err(SessionError::InvalidTransition {
                    from: inner.state,
                    to: SessionState::Ready,
                });
            }
            inner.creating = true;
        }

        let created = self.store.create(draft).await;

        let mut inner = self.inner.lock();
        inner.creating = false;
        let doc = match created {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Create failed for {}: {}", self.user, e);
                return Err(inner.fail(e.into()));
            }
        };
        inner.transition(SessionState::Ready)?;
        inner.open = Some(Open {
            table: doc.table(),
            quote: TrackedQuote::new(doc.clone()),
        });
        inner.last_error = None;
        tracing::info!("Created document {} for {}", doc.id, self.user);
        Ok(doc)
    }

    /// Fetch a stored document and open it.
    ///
    /// # Errors
    /// [`SessionError::NotFound`], [`SessionError::Unauthorized`] or
    /// [`SessionError::Persistence`], each leaving the session `FAILED`
    pub async fn load_document(&self, id: &DocumentId) -> Result<QuoteDocument, SessionError> {
        {
            let mut inner = self.inner.lock();
            if inner.creating {
                return Err(SessionError::SaveInFlight);
            }
            inner.transition(SessionState::Loading)?;
        }

        let fetched = self.store.get(id).await;

        let mut inner = self.inner.lock();
        let doc = match fetched
            .map_err(SessionError::from)
            .and_then(|doc| doc.authorize(&self.user).map(|()| doc).map_err(Into::into))
        {
            Ok(doc) => doc,
            Err(e) => {
                match &e {
                    SessionError::Unauthorized => {
                        tracing::warn!("User {} denied access to document {}", self.user, id);
                    }
                    other => tracing::warn!("Load of {} failed: {}", id, other),
                }
                inner.transition(SessionState::Failed)?;
                return Err(inner.fail(e));
            }
        };

        inner.transition(SessionState::Ready)?;
        inner.open = Some(Open {
            table: doc.table(),
            quote: TrackedQuote::new(doc.clone()),
        });
        tracing::info!("Loaded document {}", doc.id);
        Ok(doc)
    }

    /// Edit the working table; the result is buffered as a table change.
    ///
    /// # Errors
    /// Fails unless the session is `READY`
    pub fn edit_table<R>(&self, edit: impl FnOnce(&mut TableModel) -> R) -> Result<R, SessionError> {
        let mut inner = self.inner.lock();
        let open = inner.editable()?;
        let result = edit(&mut open.table);
        let snapshot = open.table.snapshot();
        open.quote
            .apply_local_change(QuotePatch::new().with_table(snapshot));
        Ok(result)
    }

    /// Buffer a partial change. A table snapshot replaces the working table.
    ///
    /// # Errors
    /// Fails unless the session is `READY`
    pub fn apply_local_change(&self, mut patch: QuotePatch) -> Result<bool, SessionError> {
        let mut inner = self.inner.lock();
        let open = inner.editable()?;
        if let Some(snapshot) = patch.table_snapshot.take() {
            open.table = TableModel::from_snapshot(snapshot);
            patch.table_snapshot = Some(open.table.snapshot());
        }
        Ok(open.quote.apply_local_change(patch))
    }

    /// Replace the terms text.
    ///
    /// # Errors
    /// Fails unless the session is `READY`
    pub fn set_terms(&self, terms: impl Into<String>) -> Result<bool, SessionError> {
        self.apply_local_change(QuotePatch::new().with_terms(terms))
    }

    /// Replace the remarks text.
    ///
    /// # Errors
    /// Fails unless the session is `READY`
    pub fn set_remarks(&self, remarks: impl Into<String>) -> Result<bool, SessionError> {
        self.apply_local_change(QuotePatch::new().with_remarks(remarks))
    }

    /// Set or clear the logo.
    ///
    /// # Errors
    /// Fails unless the session is `READY`
    pub fn set_logo(&self, logo: Option<String>) -> Result<bool, SessionError> {
        self.apply_local_change(QuotePatch::new().with_logo(logo))
    }

    /// Edit terms as a clause list.
    ///
    /// # Errors
    /// Fails unless the session is `READY`
    pub fn edit_terms<R>(&self, edit: impl FnOnce(&mut ClauseList) -> R) -> Result<R, SessionError> {
        let mut inner = self.inner.lock();
        let open = inner.editable()?;
        let mut clauses = open.quote.current().terms_clauses();
        let result = edit(&mut clauses);
        open.quote
            .apply_local_change(QuotePatch::new().with_terms(clauses.to_text()));
        Ok(result)
    }

    /// Edit remarks as a clause list.
    ///
    /// # Errors
    /// Fails unless the session is `READY`
    pub fn edit_remarks<R>(
        &self,
        edit: impl FnOnce(&mut ClauseList) -> R,
    ) -> Result<R, SessionError> {
        let mut inner = self.inner.lock();
        let open = inner.editable()?;
        let mut clauses = open.quote.current().remarks_clauses();
        let result = edit(&mut clauses);
        open.quote
            .apply_local_change(QuotePatch::new().with_remarks(clauses.to_text()));
        Ok(result)
    }

    /// Commit pending changes, then move to `PREVIEW`.
    ///
    /// A request arriving while `SAVING` is ignored. On store failure the
    /// session returns to `READY` with the buffer intact.
    ///
    /// # Errors
    /// - [`SessionError::Persistence`] when the update fails
    /// - [`SessionError::NoDocument`] / [`SessionError::InvalidTransition`]
    ///   outside `READY`
    pub async fn request_preview(&self) -> Result<PreviewOutcome, SessionError> {
        let commit = {
            let mut inner = self.inner.lock();
            if inner.state == SessionState::Saving {
                tracing::info!("Preview request ignored: save in flight");
                return Ok(PreviewOutcome::Ignored);
            }
            let pending = inner.editable()?.quote.begin_commit();
            match pending {
                Some(commit) => {
                    inner.transition(SessionState::Saving)?;
                    commit
                }
                None => {
                    inner.transition(SessionState::Preview)?;
                    tracing::debug!("Commit skipped: no pending changes");
                    return Ok(PreviewOutcome::Unchanged);
                }
            }
        };

        tracing::info!("Committing changes to {}", commit.id());
        let written = commit.write(self.store.as_ref()).await;

        let mut inner = self.inner.lock();
        let finished = match inner.open.as_mut() {
            Some(open) => open
                .quote
                .finish_commit(commit, written)
                .map_err(SessionError::from),
            None => Err(SessionError::NoDocument),
        };
        match finished {
            Ok(_) => {
                inner.transition(SessionState::Preview)?;
                inner.last_error = None;
                Ok(PreviewOutcome::Saved)
            }
            Err(e) => {
                inner.transition(SessionState::Ready)?;
                Err(inner.fail(e))
            }
        }
    }

    /// Leave the preview.
    ///
    /// # Errors
    /// [`SessionError::InvalidTransition`] unless in `PREVIEW`
    pub fn back(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        if inner.state != SessionState::Preview {
            return Err(SessionError::InvalidTransition {
                from: inner.state,
                to: SessionState::Ready,
            });
        }
        inner.transition(SessionState::Ready)
    }

    /// Preview of the open document including pending edits.
    ///
    /// # Errors
    /// [`SessionError::NoDocument`] when nothing is open
    pub fn preview(&self) -> Result<QuotePreview, SessionError> {
        let inner = self.inner.lock();
        let open = inner.open.as_ref().ok_or(SessionError::NoDocument)?;
        Ok(build_preview(&open.quote.current(), &open.table, &self.config))
    }

    /// Documents owned by the session user, most recently updated first.
    ///
    /// # Errors
    /// [`SessionError::Persistence`] when the store fails
    pub async fn list_quotes(&self) -> Result<Vec<QuoteDocument>, SessionError> {
        let docs = self.store.list_by_owner(&self.user).await?;
        tracing::debug!("Listed {} documents for {}", docs.len(), self.user);
        Ok(docs)
    }
}
