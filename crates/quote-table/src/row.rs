//! Table rows
//!
//! A row is a fixed record (`id`, `service`, `quantity`, `price`,
//! `isSubheader`) plus string values for custom columns keyed by column id.
//! Numeric input is coerced, never rejected.

use crate::column::ColumnId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use ulid::Ulid;

/// Row identifier, unique within a table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Wrap an existing id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq<&str> for RowId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One line of the services table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawRow")]
pub struct Row {
    /// Stable id
    pub id: RowId,
    /// Service label, or the section title of a subheader
    pub service: String,
    /// Quantity (never negative)
    pub quantity: f64,
    /// Unit price (never negative)
    pub price: f64,
    /// Section divider; excluded from every computation
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_subheader: bool,
    /// Values of custom columns
    #[serde(flatten)]
    pub custom: BTreeMap<ColumnId, String>,
}

impl Row {
    /// Empty priced row with a fresh id
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: RowId::generate(),
            service: String::new(),
            quantity: 0.0,
            price: 0.0,
            is_subheader: false,
            custom: BTreeMap::new(),
        }
    }

    /// Empty subheader row with a fresh id
    #[must_use]
    pub fn subheader() -> Self {
        Self {
            is_subheader: true,
            ..Self::empty()
        }
    }

    /// Priced row, mostly for fixtures
    #[must_use]
    pub fn priced(service: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            service: service.into(),
            quantity: sanitize(quantity),
            price: sanitize(price),
            ..Self::empty()
        }
    }

    /// Builder: replace the id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = RowId::new(id);
        self
    }

    /// Builder: mark as subheader
    #[inline]
    #[must_use]
    pub fn as_subheader(mut self) -> Self {
        self.is_subheader = true;
        self
    }

    /// Value of a custom column
    #[inline]
    #[must_use]
    pub fn custom_value(&self, column: &str) -> Option<&str> {
        self.custom
            .get(&ColumnId::new(column))
            .map(String::as_str)
    }
}

/// Permissive numeric cast used for quantity and price cells.
///
/// Empty, unparsable, non-finite and negative input all become `0`.
#[must_use]
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map(sanitize).unwrap_or(0.0)
}

/// Clamp a number into the valid cell range
#[inline]
#[must_use]
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn coerce_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map(sanitize).unwrap_or(0.0),
        Value::String(s) => coerce_number(s),
        _ => 0.0,
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Wire shape accepted when reading rows back from storage
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRow {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    service: Value,
    #[serde(default)]
    quantity: Value,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    is_subheader: Value,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

impl From<RawRow> for Row {
    fn from(raw: RawRow) -> Self {
        let id = match raw.id {
            Value::Null => RowId::generate(),
            other => RowId::new(value_to_text(other)),
        };
        Self {
            id,
            service: value_to_text(raw.service),
            quantity: coerce_value(&raw.quantity),
            price: coerce_value(&raw.price),
            is_subheader: matches!(raw.is_subheader, Value::Bool(true)),
            custom: raw
                .rest
                .into_iter()
                .map(|(k, v)| (ColumnId::new(k), value_to_text(v)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_number_is_permissive() {
        assert_eq!(coerce_number("12"), 12.0);
        assert_eq!(coerce_number(" 2.5 "), 2.5);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
        assert_eq!(coerce_number("-4"), 0.0);
    }

    #[test]
    fn lenient_row_deserialization() {
        let row: Row = serde_json::from_value(json!({
            "id": 7,
            "service": "Design",
            "quantity": "3",
            "price": null,
            "custom3": "blue",
            "custom4": 12
        }))
        .unwrap();

        assert_eq!(row.id, "7");
        assert_eq!(row.quantity, 3.0);
        assert_eq!(row.price, 0.0);
        assert!(!row.is_subheader);
        assert_eq!(row.custom_value("custom3"), Some("blue"));
        assert_eq!(row.custom_value("custom4"), Some("12"));
    }

    #[test]
    fn serialization_flattens_custom_fields_and_omits_false_subheader() {
        let mut row = Row::priced("Hosting", 2.0, 10.0).with_id("r1");
        row.custom.insert(ColumnId::custom(3), "monthly".to_string());

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "r1",
                "service": "Hosting",
                "quantity": 2.0,
                "price": 10.0,
                "custom3": "monthly"
            })
        );

        let sub = serde_json::to_value(Row::subheader().with_id("s1")).unwrap();
        assert_eq!(sub["isSubheader"], json!(true));
    }
}
