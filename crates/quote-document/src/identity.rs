//! Identity gateway

use crate::document::OwnerId;
use serde::{Deserialize, Serialize};

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: OwnerId,
    pub display_name: String,
}

impl UserIdentity {
    /// Create an identity
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: OwnerId::new(id),
            display_name: display_name.into(),
        }
    }
}

/// Source of the current user
pub trait IdentityProvider: Send + Sync {
    /// `None` when nobody is signed in
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Fixed identity
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserIdentity>,
}

impl StaticIdentity {
    /// Always returns `user`
    #[must_use]
    pub fn signed_in(user: UserIdentity) -> Self {
        Self { user: Some(user) }
    }

    /// Never returns a user
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.clone()
    }
}
