//! Pricing engine
//!
//! Pure functions over rows. Subheader rows never contribute, and any
//! non-finite operand counts as zero. Nothing is rounded here; use
//! [`round2`] / [`format_amount`] at presentation time.

use crate::row::Row;
use serde::{Deserialize, Serialize};

/// Default VAT rate (17%)
pub const DEFAULT_VAT_RATE: f64 = 0.17;

/// Computed quote totals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of price × quantity over priced rows
    pub subtotal: f64,
    /// `subtotal × vat_rate`
    pub vat: f64,
    /// `subtotal + vat`
    pub total: f64,
}

impl Totals {
    /// Copy with every amount rounded to cents
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round2(self.subtotal),
            vat: round2(self.vat),
            total: round2(self.total),
        }
    }
}

#[inline]
fn operand(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Line total for display; `None` for subheader rows
#[inline]
#[must_use]
pub fn row_total(row: &Row) -> Option<f64> {
    if row.is_subheader {
        None
    } else {
        Some(operand(row.price) * operand(row.quantity))
    }
}

/// Subtotal, VAT and total over `rows`
#[must_use]
pub fn compute_totals(rows: &[Row], vat_rate: f64) -> Totals {
    let subtotal: f64 = rows.iter().filter_map(row_total).sum();
    let vat = subtotal * operand(vat_rate);
    Totals {
        subtotal,
        vat,
        total: subtotal + vat,
    }
}

/// Round half away from zero to two decimals
#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two decimals with `,` thousands separators, e.g. `1,234.50`
#[must_use]
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", operand(value).abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && round2(value) != 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
