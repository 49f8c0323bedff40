//! The quote document aggregate
//!
//! A [`QuoteDraft`] is validated company info that has not been stored yet.
//! Once the store accepts it, it becomes a [`QuoteDocument`] with an id and
//! timestamps. Documents are owned by exactly one user.

use crate::clauses::ClauseList;
use crate::company::CompanyInfo;
use crate::error::{DocumentError, ValidationError};
use chrono::{DateTime, Utc};
use quote_table::{TableModel, TableSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned document identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap an id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random id
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque user identity owning documents
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wrap an identity
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated, not yet persisted quote
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    pub owner_id: OwnerId,
    pub company_info: CompanyInfo,
    pub logo: Option<String>,
    pub terms: String,
    pub remarks: String,
    pub table_snapshot: TableSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuoteDraft {
    /// Start a quote from company details.
    ///
    /// # Errors
    /// Returns [`ValidationError`] when a required field is empty or the
    /// company id / phone do not match their formats
    pub fn create(
        owner_id: OwnerId,
        company_info: CompanyInfo,
        logo: Option<String>,
    ) -> Result<Self, ValidationError> {
        company_info.validate()?;
        let now = Utc::now();
        Ok(Self {
            owner_id,
            company_info,
            logo,
            terms: String::new(),
            remarks: String::new(),
            table_snapshot: TableSnapshot::empty(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Attach the store-assigned id
    #[must_use]
    pub fn into_document(self, id: DocumentId) -> QuoteDocument {
        QuoteDocument {
            id,
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            company_info: self.company_info,
            logo: self.logo,
            terms: self.terms,
            remarks: self.remarks,
            table_snapshot: self.table_snapshot,
        }
    }
}

/// A persisted quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    pub id: DocumentId,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub company_info: CompanyInfo,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub terms: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub table_snapshot: TableSnapshot,
}

impl QuoteDocument {
    /// Ensure `requester` owns this document.
    ///
    /// # Errors
    /// Returns [`DocumentError::Unauthorized`] for any other identity
    pub fn authorize(&self, requester: &OwnerId) -> Result<(), DocumentError> {
        if &self.owner_id == requester {
            Ok(())
        } else {
            Err(DocumentError::Unauthorized)
        }
    }

    /// Editable table rebuilt from the stored snapshot
    #[must_use]
    pub fn table(&self) -> TableModel {
        TableModel::from_snapshot(self.table_snapshot.clone())
    }

    /// Terms as a clause list
    #[must_use]
    pub fn terms_clauses(&self) -> ClauseList {
        ClauseList::parse(&self.terms)
    }

    /// Remarks as a clause list
    #[must_use]
    pub fn remarks_clauses(&self) -> ClauseList {
        ClauseList::parse(&self.remarks)
    }

    /// Advance `updated_at`, never moving it backwards
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.updated_at {
            self.updated_at = at;
        }
    }
}
