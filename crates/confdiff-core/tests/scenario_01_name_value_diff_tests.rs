//! Name/Value Diff Scenario Tests
//!
//! This test suite reconciles single-table `settings` snapshots keyed by name.
//!
//! ## Scenarios Covered
//!
//! 1. Added, deleted and unchanged rows in one pass
//! 2. Diffing a snapshot against itself
//! 3. Pure addition and its reversal
//! 4. Value changes marked modified with both sides kept
//! 5. Change-ignored columns leave the row unchanged
//! 6. Mismatched table shapes rejected

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{key_label, name_value};
use confdiff_core::{reconcile, CellValue, ChangeStatus, ExErrorKind, PrintModel};

#[test]
fn test_scenario_name_value_added_deleted_unchanged() {
    // Pilot = [(A,1),(B,2)], Production = [(A,1),(C,3)]
    let pilot = name_value(&[("A", 1), ("B", 2)]);
    let production = name_value(&[("A", 1), ("C", 3)]);

    let diffgram = reconcile(&pilot, &production).unwrap();
    let table = diffgram.table("settings").unwrap();
    let rows: Vec<(String, ChangeStatus)> = table
        .rows
        .iter()
        .map(|r| (key_label(&r.key), r.status))
        .collect();

    assert_eq!(
        rows,
        vec![
            ("A".to_string(), ChangeStatus::Unchanged),
            ("B".to_string(), ChangeStatus::Added),
            ("C".to_string(), ChangeStatus::Deleted),
        ]
    );

    let a = &table.rows[0];
    assert_eq!(a.value(1), Some(&CellValue::Integer(1)));
    assert_eq!(a.old_value(1), Some(&CellValue::Integer(1)));

    let b = &table.rows[1];
    assert_eq!(b.value(1), Some(&CellValue::Integer(2)));
    assert!(b.old_values.is_none());

    let c = &table.rows[2];
    assert_eq!(c.old_value(1), Some(&CellValue::Integer(3)));
}

#[test]
fn test_identity_yields_only_unchanged() {
    let snapshot = name_value(&[("A", 1), ("B", 2), ("C", 3)]);
    let diffgram = reconcile(&snapshot, &snapshot).unwrap();

    let summary = diffgram.summary();
    assert_eq!(summary.unchanged, 3);
    assert!(!summary.has_changes());
}

#[test]
fn test_pure_addition_and_reversal() {
    let one = name_value(&[("A", 1)]);
    let none = name_value(&[]);

    let forward = reconcile(&one, &none).unwrap();
    let rows = &forward.tables()[0].rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, ChangeStatus::Added);

    let backward = reconcile(&none, &one).unwrap();
    let rows = &backward.tables()[0].rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, ChangeStatus::Deleted);
}

#[test]
fn test_value_change_is_modified_with_both_sides() {
    let pilot = name_value(&[("A", 10)]);
    let production = name_value(&[("A", 1)]);

    let diffgram = reconcile(&pilot, &production).unwrap();
    let row = &diffgram.tables()[0].rows[0];
    assert_eq!(row.status, ChangeStatus::Modified);
    assert!(row.column_changed(1));
    assert!(!row.column_changed(0));
}

#[test]
fn test_change_ignored_column_keeps_row_unchanged() {
    let pilot = name_value(&[("A", 10)]);
    let production = name_value(&[("A", 1)]);
    let mut print_model = PrintModel::defaults_for(&pilot);
    print_model.ignore_changes(0, 1);

    let diffgram =
        confdiff_core::reconcile_with(&pilot, &production, &print_model.reconcile_options())
            .unwrap();
    let row = &diffgram.tables()[0].rows[0];

    assert_eq!(row.status, ChangeStatus::Unchanged);
    // Both sides are still carried
    assert_eq!(row.value(1), Some(&CellValue::Integer(10)));
    assert_eq!(row.old_value(1), Some(&CellValue::Integer(1)));
}

#[test]
fn test_mismatched_shapes_are_rejected() {
    let pilot = name_value(&[("A", 1)]);
    let production = common::group_item(&[("X", "1")]);

    let err = reconcile(&pilot, &production).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ShapeMismatch);
    assert_eq!(err.code(), "ERR_SHAPE_MISMATCH");
    assert_eq!(err.op(), Some("reconcile"));
}
