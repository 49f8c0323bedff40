//! Session lifecycle states and the transitions between them

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// No document yet
    New,
    /// Fetching a stored document
    Loading,
    /// Document open for local edits
    Ready,
    /// Pending changes are being written
    Saving,
    /// Persisted and showing the preview
    Preview,
    /// Load failed; the session is unusable
    Failed,
}

impl SessionState {
    /// All states
    pub const ALL: [SessionState; 6] = [
        SessionState::New,
        SessionState::Loading,
        SessionState::Ready,
        SessionState::Saving,
        SessionState::Preview,
        SessionState::Failed,
    ];

    /// No way out of this state
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        allowed_transitions(self).is_empty()
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "NEW",
            Self::Loading => "LOADING",
            Self::Ready => "READY",
            Self::Saving => "SAVING",
            Self::Preview => "PREVIEW",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Validates a state transition.
///
/// # Errors
/// Returns [`SessionError::InvalidTransition`] when `to` is not reachable
/// from `from` in one step
pub fn validate_transition(from: SessionState, to: SessionState) -> Result<(), SessionError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(SessionError::InvalidTransition { from, to })
    }
}

pub fn allowed_transitions(from: SessionState) -> Vec<SessionState> {
    use SessionState::*;
    match from {
        New => vec![Ready, Loading],
        Loading => vec![Ready, Failed],
        Ready => vec![Ready, Saving, Preview],
        Saving => vec![Preview, Ready],
        Preview => vec![Ready],
        Failed => vec![],
    }
}

fn allowed(from: SessionState, to: SessionState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
