//! Read-only preview of a quote
//!
//! Everything is pre-formatted so a renderer only lays it out.

use crate::config::QuoteConfig;
use quote_document::{CompanyInfo, QuoteDocument};
use quote_table::{
    compute_totals, format_amount, row_total, Column, ReservedColumn, Row, TableModel,
};
use serde::Serialize;

/// Id of the derived total column
pub const TOTAL_COLUMN: &str = "total";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewColumn {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub id: String,
    pub is_subheader: bool,
    /// One cell per preview column, in column order
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTotals {
    pub subtotal: String,
    pub vat: String,
    pub total: String,
}

/// Preview view model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePreview {
    pub logo: Option<String>,
    pub company_info: CompanyInfo,
    pub columns: Vec<PreviewColumn>,
    pub rows: Vec<PreviewRow>,
    pub prices_visible: bool,
    pub totals: PreviewTotals,
    /// `None` when terms are excluded
    pub terms: Option<Vec<String>>,
    /// `None` when remarks are excluded
    pub remarks: Option<Vec<String>>,
}

/// Build the preview of `document` using `table` as the live table
#[must_use]
pub fn build_preview(document: &QuoteDocument, table: &TableModel, config: &QuoteConfig) -> QuotePreview {
    let prices_visible = table.prices_visible();
    let visible = table.visible_columns();

    let mut columns: Vec<PreviewColumn> = visible
        .iter()
        .map(|c| PreviewColumn {
            id: c.id.to_string(),
            label: c.label.clone(),
        })
        .collect();
    if prices_visible {
        columns.push(PreviewColumn {
            id: TOTAL_COLUMN.to_string(),
            label: "Total".to_string(),
        });
    }

    let rows = table
        .rows()
        .iter()
        .map(|row| PreviewRow {
            id: row.id.to_string(),
            is_subheader: row.is_subheader,
            cells: row_cells(row, &visible, prices_visible),
        })
        .collect();

    let totals = compute_totals(table.rows(), config.vat_rate);

    QuotePreview {
        logo: document.logo.clone(),
        company_info: document.company_info.clone(),
        columns,
        rows,
        prices_visible,
        totals: PreviewTotals {
            subtotal: format_amount(totals.subtotal),
            vat: format_amount(totals.vat),
            total: format_amount(totals.total),
        },
        terms: config
            .include_terms
            .then(|| document.terms_clauses().items().to_vec()),
        remarks: config
            .include_remarks
            .then(|| document.remarks_clauses().items().to_vec()),
    }
}

fn row_cells(row: &Row, columns: &[&Column], with_total: bool) -> Vec<String> {
    let mut cells: Vec<String> = columns.iter().map(|c| cell(row, c)).collect();
    if with_total {
        cells.push(row_total(row).map(format_amount).unwrap_or_default());
    }
    cells
}

fn cell(row: &Row, column: &Column) -> String {
    match column.reserved_kind() {
        Some(ReservedColumn::Service) => row.service.clone(),
        // Subheaders only carry a title
        _ if row.is_subheader => String::new(),
        Some(ReservedColumn::Quantity) => row.quantity.to_string(),
        Some(ReservedColumn::Price) => format_amount(row.price),
        None => row
            .custom_value(column.id.as_str())
            .unwrap_or_default()
            .to_string(),
    }
}
