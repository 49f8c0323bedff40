//! Table columns (headers)
//!
//! Three columns are reserved and permanent: `service`, `quantity` and
//! `price`. Every other column is a custom text column whose id is issued by
//! the owning [`TableModel`](crate::TableModel).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved id of the service (row label) column
pub const SERVICE: &str = "service";
/// Reserved id of the quantity column
pub const QUANTITY: &str = "quantity";
/// Reserved id of the price column
pub const PRICE: &str = "price";

/// Prefix of generated custom column ids (`custom3`, `custom4`, ...)
pub const CUSTOM_PREFIX: &str = "custom";

/// Stable column identifier, unique within a table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    /// Wrap an existing id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the n-th generated custom column
    #[inline]
    #[must_use]
    pub fn custom(n: u32) -> Self {
        Self(format!("{CUSTOM_PREFIX}{n}"))
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id names one of the permanent columns
    #[inline]
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        ReservedColumn::from_id(&self.0).is_some()
    }

    /// Counter value encoded in a `customN` id, if any
    #[must_use]
    pub fn custom_index(&self) -> Option<u32> {
        self.0
            .strip_prefix(CUSTOM_PREFIX)
            .and_then(|n| n.parse().ok())
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for ColumnId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ColumnId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The permanent columns every table carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedColumn {
    /// Row label / subheader title
    Service,
    /// Numeric quantity
    Quantity,
    /// Numeric unit price
    Price,
}

impl ReservedColumn {
    /// All reserved columns in their canonical order
    pub const ALL: [ReservedColumn; 3] = [Self::Service, Self::Quantity, Self::Price];

    /// Column id
    #[inline]
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Service => SERVICE,
            Self::Quantity => QUANTITY,
            Self::Price => PRICE,
        }
    }

    /// Default header label
    #[inline]
    #[must_use]
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Service => "Services",
            Self::Quantity => "Quantity",
            Self::Price => "Price",
        }
    }

    /// Look up a reserved column by id
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            SERVICE => Some(Self::Service),
            QUANTITY => Some(Self::Quantity),
            PRICE => Some(Self::Price),
            _ => None,
        }
    }

    /// Whether values of this column are coerced to numbers
    #[inline]
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Quantity | Self::Price)
    }
}

/// A table header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Stable id
    pub id: ColumnId,
    /// Display label (user editable, may be empty)
    #[serde(default)]
    pub label: String,
    /// Whether the column is shown
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Column {
    /// Create a visible column
    #[inline]
    #[must_use]
    pub fn new(id: ColumnId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            is_visible: true,
        }
    }

    /// Create one of the permanent columns with its default label
    #[inline]
    #[must_use]
    pub fn reserved(kind: ReservedColumn) -> Self {
        Self::new(ColumnId::new(kind.id()), kind.default_label())
    }

    /// Reserved kind, if this is a permanent column
    #[inline]
    #[must_use]
    pub fn reserved_kind(&self) -> Option<ReservedColumn> {
        ReservedColumn::from_id(self.id.as_str())
    }

    /// Whether this is the price column
    #[inline]
    #[must_use]
    pub fn is_price(&self) -> bool {
        self.id == PRICE
    }
}
