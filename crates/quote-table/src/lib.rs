//! Quote Table
//!
//! The services table behind a price quote and the VAT pricing over it.
//!
//! # Core Concepts
//!
//! - [`TableModel`]: editable columns and rows with drag reorder, subheaders
//!   and a five-column cap
//! - [`TableSnapshot`]: value copy exchanged with the quote document
//! - [`compute_totals`]: subtotal / VAT / total, skipping subheader rows
//!
//! # Example
//!
//! ```rust
//! use quote_table::{compute_totals, TableModel, DEFAULT_VAT_RATE};
//!
//! let mut table = TableModel::new();
//! let row = table.add_row();
//! table.update_cell(row.as_str(), "quantity", "2");
//! table.update_cell(row.as_str(), "price", "100");
//!
//! let totals = compute_totals(table.rows(), DEFAULT_VAT_RATE);
//! assert_eq!(totals.subtotal, 200.0);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod column;
pub mod pricing;
pub mod row;
mod table;

pub use column::{Column, ColumnId, ReservedColumn, PRICE, QUANTITY, SERVICE};
pub use pricing::{compute_totals, format_amount, round2, row_total, Totals, DEFAULT_VAT_RATE};
pub use row::{coerce_number, Row, RowId};
pub use table::{TableModel, TableSnapshot, MAX_COLUMNS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
