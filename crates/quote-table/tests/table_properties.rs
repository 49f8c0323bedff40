use proptest::prelude::*;
use quote_table::{
    compute_totals, Column, ColumnId, Row, TableModel, TableSnapshot, DEFAULT_VAT_RATE, MAX_COLUMNS, PRICE,
};

fn row_strategy() -> impl Strategy<Value = (f64, f64, bool)> {
    (0.0f64..10_000.0, 0.0f64..1_000.0, any::<bool>())
}

fn table_from(specs: &[(f64, f64, bool)]) -> TableModel {
    let rows = specs
        .iter()
        .enumerate()
        .map(|(i, (price, qty, sub))| {
            let row = Row::priced(format!("row {i}"), *qty, *price).with_id(format!("r{i}"));
            if *sub {
                row.as_subheader()
            } else {
                row
            }
        })
        .collect();
    TableModel::from_snapshot(TableSnapshot {
        rows,
        ..TableSnapshot::empty()
    })
}

#[derive(Debug, Clone)]
enum Op {
    AddRow,
    AddSubheader,
    AddColumn,
    DeleteColumn(usize),
    DeleteRow(usize),
    Reorder(usize, usize),
    TogglePrice,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddRow),
        Just(Op::AddSubheader),
        Just(Op::AddColumn),
        (0usize..6).prop_map(Op::DeleteColumn),
        (0usize..8).prop_map(Op::DeleteRow),
        ((0usize..8), (0usize..8)).prop_map(|(a, b)| Op::Reorder(a, b)),
        Just(Op::TogglePrice),
    ]
}

proptest! {
    #[test]
    fn prop_subtotal_matches_priced_rows(specs in prop::collection::vec(row_strategy(), 0..20)) {
        let table = table_from(&specs);
        let totals = compute_totals(table.rows(), DEFAULT_VAT_RATE);

        let expected: f64 = specs
            .iter()
            .filter(|(_, _, sub)| !sub)
            .map(|(price, qty, _)| price * qty)
            .sum();

        prop_assert!((totals.subtotal - expected).abs() <= 1e-6 * expected.max(1.0));
        prop_assert!((totals.total - totals.subtotal * 1.17).abs() <= 1e-6 * totals.total.max(1.0));
    }

    #[test]
    fn prop_reorder_preserves_relative_order(
        len in 1usize..12,
        pick in 0usize..12,
        target in 0usize..12,
    ) {
        let specs = vec![(1.0, 1.0, false); len];
        let mut table = table_from(&specs);
        let moved = format!("r{}", pick % len);

        let others_before: Vec<String> = table
            .rows()
            .iter()
            .map(|r| r.id.to_string())
            .filter(|id| *id != moved)
            .collect();

        table.reorder_row(&moved, target);

        let others_after: Vec<String> = table
            .rows()
            .iter()
            .map(|r| r.id.to_string())
            .filter(|id| *id != moved)
            .collect();

        prop_assert_eq!(others_before, others_after);
        prop_assert_eq!(table.rows().len(), len);
    }

    #[test]
    fn prop_imported_snapshot_satisfies_invariants(
        custom in prop::collection::vec(3u32..12, 0..10),
        row_ids in prop::collection::vec(0u8..4, 0..10),
    ) {
        let mut snapshot = TableSnapshot::empty();
        for n in &custom {
            snapshot.headers.push(Column::new(ColumnId::custom(*n), format!("c{n}")));
        }
        snapshot.rows = row_ids
            .iter()
            .map(|i| {
                let mut row = Row::priced("item", 1.0, 1.0).with_id(format!("r{i}"));
                for n in &custom {
                    row.custom.insert(ColumnId::custom(*n), "x".to_string());
                }
                row
            })
            .collect();

        let mut table = TableModel::from_snapshot(snapshot);

        prop_assert!(table.columns().len() <= MAX_COLUMNS);
        let mut column_ids: Vec<&ColumnId> = table.columns().iter().map(|c| &c.id).collect();
        column_ids.sort();
        column_ids.dedup();
        prop_assert_eq!(column_ids.len(), table.columns().len());

        let mut seen: Vec<String> = table.rows().iter().map(|r| r.id.to_string()).collect();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), row_ids.len());

        for row in table.rows() {
            prop_assert_eq!(row.custom.len(), table.columns().len() - 3);
        }

        if let Some(id) = table.add_column() {
            prop_assert!(!custom.iter().any(|n| ColumnId::custom(*n) == id));
        }
    }

    #[test]
    fn prop_table_invariants_hold_under_any_edit_sequence(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut table = TableModel::new();
        let mut issued: Vec<ColumnId> = Vec::new();

        for op in ops {
            match op {
                Op::AddRow => { table.add_row(); }
                Op::AddSubheader => { table.add_subheader_row(); }
                Op::AddColumn => {
                    if let Some(id) = table.add_column() {
                        prop_assert!(!issued.contains(&id), "custom id reused: {}", id);
                        issued.push(id);
                    }
                }
                Op::DeleteColumn(i) => {
                    if let Some(id) = table.columns().get(i).map(|c| c.id.to_string()) {
                        table.delete_column(&id);
                    }
                }
                Op::DeleteRow(i) => {
                    if let Some(id) = table.rows().get(i).map(|r| r.id.to_string()) {
                        table.delete_row(&id);
                    }
                }
                Op::Reorder(i, to) => {
                    if let Some(id) = table.rows().get(i).map(|r| r.id.to_string()) {
                        table.reorder_row(&id, to);
                    }
                }
                Op::TogglePrice => { table.toggle_price_visibility(); }
            }

            prop_assert!(table.columns().len() <= MAX_COLUMNS);
            for reserved in ["service", "quantity", "price"] {
                prop_assert!(table.column(reserved).is_some());
            }
            let ordered = table.ordered_columns();
            prop_assert_eq!(ordered.last().map(|c| c.id.as_str()), Some(PRICE));

            for row in table.rows() {
                for column in table.columns().iter().filter(|c| c.reserved_kind().is_none()) {
                    prop_assert!(row.custom.contains_key(&column.id));
                }
                prop_assert_eq!(row.custom.len(), table.columns().len() - 3);
            }
        }
    }
}

#[test]
fn sixth_column_is_rejected_silently() {
    let mut table = TableModel::new();
    while table.add_column().is_some() {}
    assert_eq!(table.columns().len(), MAX_COLUMNS);
    assert_eq!(table.add_column(), None);
    assert_eq!(table.columns().len(), MAX_COLUMNS);
}

#[test]
fn snapshot_round_trips_through_persisted_shape() {
    let mut table = TableModel::new();
    let row = table.add_row();
    let column = table.add_column().unwrap();
    table.update_cell(row.as_str(), column.as_str(), "blue");
    table.update_cell(row.as_str(), "price", "12.5");

    let json = serde_json::to_value(table.snapshot()).unwrap();
    assert!(json["headers"].is_array());
    assert_eq!(json["rows"][0]["custom3"], "blue");
    assert_eq!(json["rows"][0]["price"], 12.5);

    let restored: TableSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(restored, table.snapshot());
}
