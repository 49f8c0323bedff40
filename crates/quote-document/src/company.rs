//! Company and customer details collected before a quote exists

use crate::error::{CompanyField, FieldIssue, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Nine-digit company registration number
static COMPANY_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{9}$").expect("Invalid company id regex"));

/// Local phone number: leading zero and 8 or 9 more ASCII digits
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[0-9]{8,9}$").expect("Invalid phone regex"));

/// Header block of a quote
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_id: String,
    #[serde(default)]
    pub company_phone: String,
    #[serde(default)]
    pub customer_name: String,
}

impl CompanyInfo {
    /// Create company info
    #[must_use]
    pub fn new(
        company_name: impl Into<String>,
        company_id: impl Into<String>,
        company_phone: impl Into<String>,
        customer_name: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            company_id: company_id.into(),
            company_phone: company_phone.into(),
            customer_name: customer_name.into(),
        }
    }

    /// Check every field, collecting all issues at once.
    ///
    /// # Errors
    /// Returns [`ValidationError`] listing each empty or malformed field
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut err = ValidationError::default();

        if is_blank(&self.company_name) {
            err.insert(CompanyField::CompanyName, FieldIssue::Required);
        }

        if is_blank(&self.company_id) {
            err.insert(CompanyField::CompanyId, FieldIssue::Required);
        } else if !COMPANY_ID_REGEX.is_match(&self.company_id) {
            err.insert(CompanyField::CompanyId, FieldIssue::CompanyIdFormat);
        }

        if is_blank(&self.company_phone) {
            err.insert(CompanyField::CompanyPhone, FieldIssue::Required);
        } else if !PHONE_REGEX.is_match(&self.company_phone) {
            err.insert(CompanyField::CompanyPhone, FieldIssue::PhoneFormat);
        }

        if is_blank(&self.customer_name) {
            err.insert(CompanyField::CustomerName, FieldIssue::Required);
        }

        if err.is_empty() {
            Ok(())
        } else {
            Err(err)
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
