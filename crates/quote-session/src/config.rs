//! Session configuration

use quote_table::DEFAULT_VAT_RATE;
use serde::{Deserialize, Serialize};

/// Pricing and preview settings shared by every session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Flat VAT rate applied to the subtotal
    pub vat_rate: f64,
    /// Show terms in the preview
    pub include_terms: bool,
    /// Show remarks in the preview
    pub include_remarks: bool,
}

impl QuoteConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With VAT rate
    #[inline]
    #[must_use]
    pub fn with_vat_rate(mut self, rate: f64) -> Self {
        self.vat_rate = rate;
        self
    }

    /// With terms shown or hidden in the preview
    #[inline]
    #[must_use]
    pub fn with_terms(mut self, include: bool) -> Self {
        self.include_terms = include;
        self
    }

    /// With remarks shown or hidden in the preview
    #[inline]
    #[must_use]
    pub fn with_remarks(mut self, include: bool) -> Self {
        self.include_remarks = include;
        self
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            vat_rate: DEFAULT_VAT_RATE,
            include_terms: true,
            include_remarks: true,
        }
    }
}
