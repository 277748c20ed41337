//! Error Facility Tests
//!
//! This test suite checks how domain errors map onto `ExError`.
//!
//! ## Scenarios Covered
//!
//! 1. Domain errors keep their table, column and operation
//! 2. Every kind maps to a stable error code
//! 3. Display lists the error coordinates
//! 4. Duplicate keys and relation cycles rejected at build

use confdiff_core::errors::{DiffError, ExError, ExErrorKind};
use confdiff_core::{build_snapshot, CellValue, Column, Relation, TableBuilder};

#[test]
fn test_shape_mismatch_carries_table() {
    let err: ExError = DiffError::ShapeMismatch {
        table: "connectors".to_string(),
        reason: "column Type differs".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::ShapeMismatch);
    assert_eq!(err.code(), "ERR_SHAPE_MISMATCH");
    assert_eq!(err.table(), Some("connectors"));
    assert!(err.message().contains("column Type differs"));
}

#[test]
fn test_cell_type_maps_to_invalid_row_with_column() {
    let err: ExError = DiffError::CellType {
        table: "rules".to_string(),
        column: "Precedence".to_string(),
        expected: "integer".to_string(),
        actual: "text".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::InvalidRow);
    assert_eq!(err.table(), Some("rules"));
    assert_eq!(err.column(), Some("Precedence"));
}

#[test]
fn test_io_error_keeps_operation() {
    let err: ExError = DiffError::Io {
        op: "commit_report".to_string(),
        message: "disk full".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::Io);
    assert_eq!(err.op(), Some("commit_report"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidSchema, "ERR_INVALID_SCHEMA"),
        (ExErrorKind::DuplicateKey, "ERR_DUPLICATE_KEY"),
        (ExErrorKind::RelationCycle, "ERR_RELATION_CYCLE"),
        (ExErrorKind::ShapeMismatch, "ERR_SHAPE_MISMATCH"),
        (ExErrorKind::InvalidHeaderShape, "ERR_INVALID_HEADER_SHAPE"),
        (ExErrorKind::DuplicateSection, "ERR_DUPLICATE_SECTION"),
        (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_display_lists_coordinates() {
    let err = ExError::new(ExErrorKind::InvalidHeaderShape)
        .with_op("render")
        .with_section("connectors")
        .with_table("connectors")
        .with_message("width 3 does not match 4 visible columns");

    assert_eq!(
        err.to_string(),
        "[ERR_INVALID_HEADER_SHAPE] in operation 'render': width 3 does not match 4 visible \
         columns (section: connectors) (table: connectors)"
    );
}

#[test]
fn test_duplicate_key_rejected_at_build() {
    let err = TableBuilder::new("settings")
        .column(Column::text("Name"))
        .primary_key(["Name"])
        .row(vec![CellValue::from("A")])
        .row(vec![CellValue::from("A")])
        .build()
        .unwrap_err();

    assert_eq!(ExError::from(err).kind(), ExErrorKind::DuplicateKey);
}

#[test]
fn test_relation_cycle_rejected_at_build() {
    let table = |name: &str| {
        TableBuilder::new(name)
            .column(Column::text("Id"))
            .primary_key(["Id"])
            .build()
            .unwrap()
    };
    let err = build_snapshot(
        vec![table("a"), table("b")],
        vec![
            Relation::new("a_b", "a", ["Id"], "b", ["Id"]),
            Relation::new("b_a", "b", ["Id"], "a", ["Id"]),
        ],
    )
    .unwrap_err();

    assert!(matches!(err, DiffError::RelationCycle { .. }));
}
