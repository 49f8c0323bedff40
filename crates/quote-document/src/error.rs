//! Error types for quote documents
//!
//! - [`ValidationError`]: bad company info, reported per field
//! - [`StoreError`]: failures reported by the document store gateway
//! - [`DocumentError`]: everything a document operation can surface

use crate::document::DocumentId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Company-info fields that carry validation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompanyField {
    CompanyName,
    CompanyId,
    CompanyPhone,
    CustomerName,
}

impl CompanyField {
    /// Wire name of the field
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompanyName => "companyName",
            Self::CompanyId => "companyId",
            Self::CompanyPhone => "companyPhone",
            Self::CustomerName => "customerName",
        }
    }
}

impl fmt::Display for CompanyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldIssue {
    /// Field is empty
    Required,
    /// Company id is not exactly nine digits
    CompanyIdFormat,
    /// Phone is not a local number (`0` followed by 8–9 digits)
    PhoneFormat,
}

impl FieldIssue {
    /// Message key for the presentation layer to translate
    #[must_use]
    pub fn message_key(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::CompanyIdFormat => "companyIdFormat",
            Self::PhoneFormat => "phoneFormat",
        }
    }
}

/// Company info failed validation; never reaches the store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationError {
    /// Offending fields
    pub fields: BTreeMap<CompanyField, FieldIssue>,
}

impl ValidationError {
    /// Record a field issue
    pub fn insert(&mut self, field: CompanyField, issue: FieldIssue) {
        self.fields.insert(field, issue);
    }

    /// No issues recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Issue reported for `field`
    #[inline]
    #[must_use]
    pub fn issue(&self, field: CompanyField) -> Option<FieldIssue> {
        self.fields.get(&field).copied()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, issue)| format!("{field}: {}", issue.message_key()))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Store gateway errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No document with that id
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// Backend rejected or failed the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Quote document errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// Company info is malformed
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Unknown document id
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// Requester does not own the document
    #[error("not authorized to access this document")]
    Unauthorized,

    /// Store operation failed; pending edits are kept
    #[error("persistence failed: {0}")]
    Persistence(StoreError),
}

impl DocumentError {
    /// Whether the caller may retry the same operation
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(StoreError::Unavailable(_)))
    }
}

impl From<StoreError> for DocumentError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Persistence(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_lists_fields() {
        let mut err = ValidationError::default();
        err.insert(CompanyField::CompanyId, FieldIssue::CompanyIdFormat);
        err.insert(CompanyField::CompanyName, FieldIssue::Required);
        assert_eq!(
            err.to_string(),
            "companyName: required, companyId: companyIdFormat"
        );
    }

    #[test]
    fn store_not_found_maps_to_document_not_found() {
        let id = DocumentId::new("q1");
        let err: DocumentError = StoreError::NotFound(id.clone()).into();
        assert_eq!(err, DocumentError::NotFound(id));
        assert!(!err.is_retryable());

        let err: DocumentError = StoreError::Unavailable("down".into()).into();
        assert!(err.is_retryable());
    }
}
