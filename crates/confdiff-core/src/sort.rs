//! Dataset sorter.
//!
//! Reorders the rows of each Diffgram table by the columns that carry a sort
//! order in the print model. The sort is stable, so tables without sort
//! directives, and ties, keep reconciliation order. Relations are keyed by
//! value, not row position, so reordering never breaks parent/child links.

use crate::diff::Diffgram;
use crate::print_model::PrintModel;
use std::cmp::Ordering;

/// Sort every table of `diffgram` by its sort directives
pub fn sort(mut diffgram: Diffgram, print_model: &PrintModel) -> Diffgram {
    for (t, table) in diffgram.tables.iter_mut().enumerate() {
        let keys = print_model.sort_keys(t);
        if keys.is_empty() {
            continue;
        }
        tracing::trace!(table = %table.name, keys = ?keys, "sorting table");
        table.rows.sort_by(|a, b| {
            keys.iter()
                .map(|&c| match (a.value(c), b.value(c)) {
                    (Some(x), Some(y)) => x.sort_cmp(y),
                    _ => Ordering::Equal,
                })
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }
    diffgram
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::reconcile;
    use crate::model::{build_snapshot, CellValue, Column, Snapshot, TableBuilder};

    fn rules(rows: Vec<Vec<CellValue>>) -> Snapshot {
        let mut builder = TableBuilder::new("rules")
            .column(Column::text("Name"))
            .column(Column::integer("Precedence"))
            .column(Column::text("Group"))
            .primary_key(["Name"]);
        for row in rows {
            builder.push_row(row);
        }
        build_snapshot(vec![builder.build().unwrap()], vec![]).unwrap()
    }

    fn names(diffgram: &Diffgram) -> Vec<String> {
        diffgram.tables()[0]
            .rows
            .iter()
            .map(|r| r.key[0].to_string())
            .collect()
    }

    #[test]
    fn test_numeric_sort_with_blank_first() {
        let snapshot = rules(vec![
            vec!["a".into(), 10i64.into(), "x".into()],
            vec!["b".into(), 9i64.into(), "x".into()],
            vec!["c".into(), CellValue::Null, "x".into()],
        ]);
        let mut model = PrintModel::defaults_for(&snapshot);
        model.sort_by(0, 1, 0);
        let sorted = sort(reconcile(&snapshot, &snapshot).unwrap(), &model);
        assert_eq!(names(&sorted), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_stable_on_ties_and_secondary_key() {
        let snapshot = rules(vec![
            vec!["d".into(), 2i64.into(), "y".into()],
            vec!["a".into(), 1i64.into(), "y".into()],
            vec!["c".into(), 2i64.into(), "x".into()],
            vec!["b".into(), 1i64.into(), "y".into()],
        ]);
        let mut model = PrintModel::defaults_for(&snapshot);
        model.sort_by(0, 2, 0).sort_by(0, 1, 1);
        let sorted = sort(reconcile(&snapshot, &snapshot).unwrap(), &model);
        assert_eq!(names(&sorted), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_no_directives_keeps_order() {
        let snapshot = rules(vec![
            vec!["z".into(), 1i64.into(), "".into()],
            vec!["a".into(), 2i64.into(), "".into()],
        ]);
        let model = PrintModel::defaults_for(&snapshot);
        let sorted = sort(reconcile(&snapshot, &snapshot).unwrap(), &model);
        assert_eq!(names(&sorted), vec!["z", "a"]);
    }
}
