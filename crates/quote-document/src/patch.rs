//! Partial document updates
//!
//! A [`QuotePatch`] carries the editable parts of a quote. It serves both as
//! the local change buffer and as the payload of the store's `update`.

use crate::document::QuoteDocument;
use quote_table::TableSnapshot;
use serde::{Deserialize, Deserializer, Serialize};

/// Partial update of the editable fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_snapshot: Option<TableSnapshot>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    /// `Some(None)` clears the logo
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub logo: Option<Option<String>>,
}

/// Distinguishes an explicit `null` from an absent field
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl QuotePatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: replace the table
    #[must_use]
    pub fn with_table(mut self, snapshot: TableSnapshot) -> Self {
        self.table_snapshot = Some(snapshot);
        self
    }

    /// Builder: replace the terms text
    #[must_use]
    pub fn with_terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = Some(terms.into());
        self
    }

    /// Builder: replace the remarks text
    #[must_use]
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Builder: set or clear the logo
    #[must_use]
    pub fn with_logo(mut self, logo: Option<String>) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Nothing to write
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table_snapshot.is_none()
            && self.terms.is_none()
            && self.remarks.is_none()
            && self.logo.is_none()
    }

    /// Overlay `other` on top of this patch; later values win
    #[must_use]
    pub fn merge(mut self, other: QuotePatch) -> Self {
        if other.table_snapshot.is_some() {
            self.table_snapshot = other.table_snapshot;
        }
        if other.terms.is_some() {
            self.terms = other.terms;
        }
        if other.remarks.is_some() {
            self.remarks = other.remarks;
        }
        if other.logo.is_some() {
            self.logo = other.logo;
        }
        self
    }

    /// Drop every field already equal to the value stored on `document`
    #[must_use]
    pub fn without_unchanged(mut self, document: &QuoteDocument) -> Self {
        if self.table_snapshot.as_ref() == Some(&document.table_snapshot) {
            self.table_snapshot = None;
        }
        if self.terms.as_ref() == Some(&document.terms) {
            self.terms = None;
        }
        if self.remarks.as_ref() == Some(&document.remarks) {
            self.remarks = None;
        }
        if self.logo.as_ref() == Some(&document.logo) {
            self.logo = None;
        }
        self
    }

    /// Write the carried fields into `document` (timestamps untouched)
    pub fn apply_to(&self, document: &mut QuoteDocument) {
        if let Some(snapshot) = &self.table_snapshot {
            document.table_snapshot = snapshot.clone();
        }
        if let Some(terms) = &self.terms {
            document.terms = terms.clone();
        }
        if let Some(remarks) = &self.remarks {
            document.remarks = remarks.clone();
        }
        if let Some(logo) = &self.logo {
            document.logo = logo.clone();
        }
    }
}
