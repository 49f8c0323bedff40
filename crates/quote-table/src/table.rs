//! Services table model
//!
//! [`TableModel`] owns the canonical column and row order and exposes the
//! editing operations. Every mutation is total: unknown ids, reserved
//! columns and the column cap turn an operation into a no-op instead of an
//! error.
//!
//! # Invariants
//! - The three reserved columns are always present
//! - At most [`MAX_COLUMNS`] columns exist
//! - Generated custom ids are never reused, even after deletion
//! - `price` is last in [`TableModel::ordered_columns`]; storage order is
//!   left untouched

use crate::column::{Column, ColumnId, ReservedColumn, PRICE, QUANTITY, SERVICE};
use crate::row::{coerce_number, Row, RowId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Hard cap on the number of columns (3 reserved + 2 custom)
pub const MAX_COLUMNS: usize = 5;

/// First counter value handed out for custom columns
const FIRST_CUSTOM_INDEX: u32 = 3;

/// Value copy of a table, as exchanged with the quote document and stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Columns in storage order
    #[serde(default)]
    pub headers: Vec<Column>,
    /// Rows in display order
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl TableSnapshot {
    /// Reserved columns and no rows
    #[must_use]
    pub fn empty() -> Self {
        Self {
            headers: ReservedColumn::ALL.iter().map(|k| Column::reserved(*k)).collect(),
            rows: Vec::new(),
        }
    }
}

impl Default for TableSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Editable table state
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    columns: Vec<Column>,
    rows: Vec<Row>,
    next_custom: u32,
}

impl TableModel {
    /// Fresh table with the reserved columns and no rows
    #[must_use]
    pub fn new() -> Self {
        Self::from_snapshot(TableSnapshot::empty())
    }

    /// Rebuild a model from a stored or client-supplied snapshot.
    ///
    /// The snapshot is normalized so the model invariants hold:
    /// - duplicate column ids keep their first occurrence
    /// - missing reserved columns are restored
    /// - custom columns past the cap are dropped, with their row values
    /// - rows get an empty value for every kept custom column
    /// - duplicate row ids are regenerated
    ///
    /// The custom-id counter resumes above every `customN` id seen, kept or
    /// dropped.
    #[must_use]
    pub fn from_snapshot(snapshot: TableSnapshot) -> Self {
        let TableSnapshot { headers, mut rows } = snapshot;

        let next_custom = headers
            .iter()
            .filter_map(|c| c.id.custom_index())
            .map(|n| n.saturating_add(1))
            .max()
            .unwrap_or(FIRST_CUSTOM_INDEX)
            .max(FIRST_CUSTOM_INDEX);

        let mut custom_slots = MAX_COLUMNS - ReservedColumn::ALL.len();
        let mut columns: Vec<Column> = Vec::with_capacity(MAX_COLUMNS);
        for column in headers {
            if columns.iter().any(|c| c.id == column.id) {
                continue;
            }
            if column.reserved_kind().is_none() {
                if custom_slots == 0 {
                    continue;
                }
                custom_slots -= 1;
            }
            columns.push(column);
        }
        for kind in ReservedColumn::ALL {
            if !columns.iter().any(|c| c.id == kind.id()) {
                columns.push(Column::reserved(kind));
            }
        }

        let custom_ids: BTreeSet<ColumnId> = columns
            .iter()
            .filter(|c| c.reserved_kind().is_none())
            .map(|c| c.id.clone())
            .collect();
        let mut seen: HashSet<RowId> = HashSet::with_capacity(rows.len());
        for row in &mut rows {
            row.custom.retain(|id, _| custom_ids.contains(id));
            for id in &custom_ids {
                row.custom.entry(id.clone()).or_default();
            }
            while !seen.insert(row.id.clone()) {
                row.id = RowId::generate();
            }
        }

        Self {
            columns,
            rows,
            next_custom,
        }
    }

    /// Copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            headers: self.columns.clone(),
            rows: self.rows.clone(),
        }
    }

    /// Columns in storage (insertion) order
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows in display order
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Find a row
    #[must_use]
    pub fn row(&self, row_id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == row_id)
    }

    /// Find a column
    #[must_use]
    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Position of a row in display order
    #[must_use]
    pub fn row_index(&self, row_id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id == row_id)
    }

    /// Whether another column may be added
    #[inline]
    #[must_use]
    pub fn can_add_column(&self) -> bool {
        self.columns.len() < MAX_COLUMNS
    }

    /// Append an empty priced row
    pub fn add_row(&mut self) -> RowId {
        self.push_row(Row::empty())
    }

    /// Append an empty subheader row
    pub fn add_subheader_row(&mut self) -> RowId {
        self.push_row(Row::subheader())
    }

    fn push_row(&mut self, mut row: Row) -> RowId {
        while self.row(row.id.as_str()).is_some() {
            row.id = RowId::generate();
        }
        for column in &self.columns {
            if column.reserved_kind().is_none() {
                row.custom.insert(column.id.clone(), String::new());
            }
        }
        let id = row.id.clone();
        self.rows.push(row);
        id
    }

    /// Remove a row; returns whether anything was removed
    pub fn delete_row(&mut self, row_id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != row_id);
        self.rows.len() != before
    }

    /// Move a row to `target_index`, keeping the relative order of the rest.
    ///
    /// Indices past the end move the row to the last position. Returns
    /// whether the order changed.
    pub fn reorder_row(&mut self, row_id: &str, target_index: usize) -> bool {
        let Some(from) = self.row_index(row_id) else {
            return false;
        };
        let to = target_index.min(self.rows.len() - 1);
        if from == to {
            return false;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        true
    }

    /// Drag-end move: `active` takes the position currently held by `over`
    pub fn drag_row(&mut self, active_id: &str, over_id: &str) -> bool {
        if active_id == over_id {
            return false;
        }
        match (self.row_index(active_id), self.row_index(over_id)) {
            (Some(_), Some(target)) => self.reorder_row(active_id, target),
            _ => false,
        }
    }

    /// Append a custom column, or do nothing when the table is full.
    ///
    /// The cap is a silent policy, not an error.
    pub fn add_column(&mut self) -> Option<ColumnId> {
        if !self.can_add_column() {
            return None;
        }

        let id = loop {
            let candidate = ColumnId::custom(self.next_custom);
            self.next_custom = self.next_custom.saturating_add(1);
            if self.column(candidate.as_str()).is_none() {
                break candidate;
            }
        };

        self.columns.push(Column::new(id.clone(), ""));
        for row in &mut self.rows {
            row.custom.insert(id.clone(), String::new());
        }
        Some(id)
    }

    /// Remove a custom column and its values; reserved columns are kept
    pub fn delete_column(&mut self, column_id: &str) -> bool {
        if ReservedColumn::from_id(column_id).is_some() {
            return false;
        }
        let before = self.columns.len();
        self.columns.retain(|c| c.id != column_id);
        if self.columns.len() == before {
            return false;
        }
        let key = ColumnId::new(column_id);
        for row in &mut self.rows {
            row.custom.remove(&key);
        }
        true
    }

    /// Write a raw cell value.
    ///
    /// `quantity` and `price` are coerced to numbers; `service` and custom
    /// columns store the text as is. Unknown rows or columns are ignored.
    pub fn update_cell(&mut self, row_id: &str, column_id: &str, raw_value: &str) -> bool {
        if self.column(column_id).is_none() {
            return false;
        }
        let Some(row) = self.rows.iter_mut().find(|r| r.id == row_id) else {
            return false;
        };
        match column_id {
            SERVICE => row.service = raw_value.to_string(),
            QUANTITY => row.quantity = coerce_number(raw_value),
            PRICE => row.price = coerce_number(raw_value),
            other => {
                row.custom
                    .insert(ColumnId::new(other), raw_value.to_string());
            }
        }
        true
    }

    /// Rename a column
    pub fn update_column_label(&mut self, column_id: &str, label: impl Into<String>) -> bool {
        match self.columns.iter_mut().find(|c| c.id == column_id) {
            Some(column) => {
                column.label = label.into();
                true
            }
            None => false,
        }
    }

    /// Flip the visibility flag of a column
    pub fn toggle_column_visibility(&mut self, column_id: &str) -> bool {
        match self.columns.iter_mut().find(|c| c.id == column_id) {
            Some(column) => {
                column.is_visible = !column.is_visible;
                true
            }
            None => false,
        }
    }

    /// Show or hide price (and with it the per-row total)
    pub fn toggle_price_visibility(&mut self) -> bool {
        self.toggle_column_visibility(PRICE)
    }

    /// Whether prices are displayed
    #[must_use]
    pub fn prices_visible(&self) -> bool {
        self.column(PRICE).map_or(true, |c| c.is_visible)
    }

    /// Display order: storage order with `price` moved last
    #[must_use]
    pub fn ordered_columns(&self) -> Vec<&Column> {
        let mut ordered: Vec<&Column> = self.columns.iter().filter(|c| !c.is_price()).collect();
        ordered.extend(self.columns.iter().filter(|c| c.is_price()));
        ordered
    }

    /// Display order restricted to visible columns
    #[must_use]
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.ordered_columns()
            .into_iter()
            .filter(|c| c.is_visible)
            .collect()
    }
}

impl Default for TableModel {
    fn default() -> Self {
        Self::new()
    }
}

impl From<TableSnapshot> for TableModel {
    fn from(snapshot: TableSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}
