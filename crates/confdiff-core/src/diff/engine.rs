//! Pilot/Production reconciliation.
//!
//! The entry points are [`reconcile`] and [`reconcile_with`], which outer-join
//! two same-shaped snapshots table by table (parents first) and produce a
//! [`Diffgram`].

use crate::diff::model::{ChangeStatus, DiffRow, DiffTable, Diffgram};
use crate::errors::{DiffError, ExError};
use crate::model::{KeyTuple, Snapshot, Table};
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

/// Reconciliation knobs
///
/// Holds the `(table_index, column_index)` pairs excluded from the
/// Modified/Unchanged comparison. Usually derived from a print model via
/// [`PrintModel::reconcile_options`](crate::print_model::PrintModel::reconcile_options).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    ignored: BTreeSet<(usize, usize)>,
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a column from change detection
    pub fn ignore(mut self, table: usize, column: usize) -> Self {
        self.ignored.insert((table, column));
        self
    }

    pub fn is_ignored(&self, table: usize, column: usize) -> bool {
        self.ignored.contains(&(table, column))
    }
}

/// Check that two snapshots declare the same tables, columns, keys and relations
///
/// # Errors
///
/// `ShapeMismatch` naming the first table (or relation) that disagrees.
pub fn check_shape(pilot: &Snapshot, production: &Snapshot) -> Result<(), DiffError> {
    let mismatch = |table: &str, reason: String| DiffError::ShapeMismatch {
        table: table.to_string(),
        reason,
    };

    if pilot.tables().len() != production.tables().len() {
        return Err(mismatch(
            "*",
            format!(
                "pilot has {} tables, production has {}",
                pilot.tables().len(),
                production.tables().len()
            ),
        ));
    }

    for (p, q) in pilot.tables().iter().zip(production.tables()) {
        if p.name() != q.name() {
            return Err(mismatch(
                p.name(),
                format!("production declares '{}' at this position", q.name()),
            ));
        }
        if p.columns() != q.columns() {
            return Err(mismatch(p.name(), "columns differ".to_string()));
        }
        if p.primary_key() != q.primary_key() {
            return Err(mismatch(p.name(), "primary keys differ".to_string()));
        }
    }

    if pilot.relations() != production.relations() {
        let table = pilot
            .relations()
            .iter()
            .zip(production.relations())
            .find(|(a, b)| a != b)
            .map(|(a, _)| a.child_table.as_str())
            .unwrap_or("*");
        return Err(mismatch(table, "relations differ".to_string()));
    }

    Ok(())
}

/// Reconcile with no ignored columns
///
/// # Errors
///
/// `ShapeMismatch` when the snapshots are not the same shape.
pub fn reconcile(pilot: &Snapshot, production: &Snapshot) -> Result<Diffgram, ExError> {
    reconcile_with(pilot, production, &ReconcileOptions::default())
}

/// Reconcile two snapshots into a Diffgram
///
/// Tables are processed in dependency order. Within a table, rows follow
/// Pilot order, then Production-only rows in Production order. Child rows
/// whose relation key does not match a surviving parent row are dropped.
///
/// # Errors
///
/// `ShapeMismatch` when the snapshots are not the same shape.
pub fn reconcile_with(
    pilot: &Snapshot,
    production: &Snapshot,
    options: &ReconcileOptions,
) -> Result<Diffgram, ExError> {
    let start = Instant::now();
    log_op_start!("reconcile", tables = pilot.tables().len());

    if let Err(err) = check_shape(pilot, production) {
        log_op_error!(
            "reconcile",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        return Err(ExError::from(err).with_op("reconcile"));
    }

    let mut tables: Vec<Option<DiffTable>> = vec![None; pilot.tables().len()];
    let mut surviving: Vec<HashSet<KeyTuple>> = vec![HashSet::new(); pilot.tables().len()];
    let mut orphans_dropped = 0usize;

    for &t in pilot.dependency_order() {
        let mut rows = join_table(t, &pilot.tables()[t], &production.tables()[t], options);

        let parents: Vec<_> = pilot
            .resolved_relations()
            .iter()
            .filter(|r| r.child == t)
            .collect();
        if !parents.is_empty() {
            let before = rows.len();
            rows.retain(|row| {
                parents
                    .iter()
                    .all(|r| surviving[r.parent].contains(&row.project(&r.child_key)))
            });
            let dropped = before - rows.len();
            if dropped > 0 {
                tracing::debug!(
                    table = pilot.tables()[t].name(),
                    orphans_dropped = dropped,
                    "dropped child rows without a parent"
                );
                orphans_dropped += dropped;
            }
        }

        let table = &pilot.tables()[t];
        surviving[t] = rows.iter().map(|r| r.project(table.primary_key())).collect();
        tables[t] = Some(DiffTable {
            name: table.name().to_string(),
            columns: table.columns().to_vec(),
            primary_key: table.primary_key().to_vec(),
            rows,
        });
    }

    let tables = tables.into_iter().flatten().collect::<Vec<_>>();
    let diffgram = Diffgram {
        tables,
        relations: pilot.relations().to_vec(),
        resolved: pilot.resolved_relations().to_vec(),
        dependency_order: pilot.dependency_order().to_vec(),
        options: options.clone(),
    };

    let summary = diffgram.summary();
    log_op_end!(
        "reconcile",
        duration_ms = start.elapsed().as_millis() as u64,
        rows_added = summary.added,
        rows_deleted = summary.deleted,
        rows_modified = summary.modified,
        rows_unchanged = summary.unchanged,
        orphans_dropped = orphans_dropped
    );
    Ok(diffgram)
}

/// Outer-join one table
fn join_table(
    table_index: usize,
    pilot: &Table,
    production: &Table,
    options: &ReconcileOptions,
) -> Vec<DiffRow> {
    let key_columns = pilot.primary_key();
    let compared: Vec<usize> = (0..pilot.columns().len())
        .filter(|&c| !pilot.is_key_column(c) && !options.is_ignored(table_index, c))
        .collect();

    let production_by_key: HashMap<KeyTuple, usize> = production
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| (production.key_of(row), i))
        .collect();

    let mut matched = vec![false; production.rows().len()];
    let mut rows = Vec::with_capacity(pilot.rows().len() + production.rows().len());

    for row in pilot.rows() {
        let new_values = row.values().to_vec();
        let key = key_columns.iter().map(|&k| new_values[k].clone()).collect();
        match production_by_key.get(&pilot.key_of(row)) {
            Some(&i) => {
                matched[i] = true;
                let old_values = production.rows()[i].values().to_vec();
                let differs = compared
                    .iter()
                    .any(|&c| !new_values[c].same_as(&old_values[c]));
                rows.push(DiffRow {
                    key,
                    new_values,
                    old_values: Some(old_values),
                    status: if differs {
                        ChangeStatus::Modified
                    } else {
                        ChangeStatus::Unchanged
                    },
                });
            }
            None => rows.push(DiffRow {
                key,
                new_values,
                old_values: None,
                status: ChangeStatus::Added,
            }),
        }
    }

    for (row, _) in production
        .rows()
        .iter()
        .zip(matched)
        .filter(|(_, seen)| !seen)
    {
        let old_values = row.values().to_vec();
        rows.push(DiffRow {
            key: key_columns.iter().map(|&k| old_values[k].clone()).collect(),
            new_values: old_values.clone(),
            old_values: Some(old_values),
            status: ChangeStatus::Deleted,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::model::{build_snapshot, CellValue, Column, Relation, TableBuilder};

    fn name_value(rows: &[(&str, i64)]) -> Snapshot {
        let mut builder = TableBuilder::new("settings")
            .column(Column::text("Name"))
            .column(Column::integer("Value"))
            .primary_key(["Name"]);
        for (name, value) in rows {
            builder.push_row(vec![(*name).into(), (*value).into()]);
        }
        build_snapshot(vec![builder.build().unwrap()], vec![]).unwrap()
    }

    fn statuses(diffgram: &Diffgram) -> Vec<(String, ChangeStatus)> {
        diffgram.tables()[0]
            .rows
            .iter()
            .map(|r| (r.key[0].to_string(), r.status))
            .collect()
    }

    #[test]
    fn test_name_value_scenario() {
        let pilot = name_value(&[("A", 1), ("B", 2)]);
        let production = name_value(&[("A", 1), ("C", 3)]);
        let diffgram = reconcile(&pilot, &production).unwrap();

        assert_eq!(
            statuses(&diffgram),
            vec![
                ("A".to_string(), ChangeStatus::Unchanged),
                ("B".to_string(), ChangeStatus::Added),
                ("C".to_string(), ChangeStatus::Deleted),
            ]
        );
        let c = &diffgram.tables()[0].rows[2];
        assert_eq!(c.new_values, c.old_values.clone().unwrap());
        assert_eq!(c.value(1), Some(&CellValue::Integer(3)));
        assert_eq!(diffgram.tables()[0].rows[1].old_values, None);
    }

    #[test]
    fn test_modified_keeps_both_values() {
        let diffgram = reconcile(&name_value(&[("A", 2)]), &name_value(&[("A", 1)])).unwrap();
        let row = &diffgram.tables()[0].rows[0];
        assert_eq!(row.status, ChangeStatus::Modified);
        assert_eq!(row.value(1), Some(&CellValue::Integer(2)));
        assert_eq!(row.old_value(1), Some(&CellValue::Integer(1)));
    }

    #[test]
    fn test_ignored_column_does_not_modify() {
        let options = ReconcileOptions::new().ignore(0, 1);
        let diffgram =
            reconcile_with(&name_value(&[("A", 2)]), &name_value(&[("A", 1)]), &options).unwrap();
        let row = &diffgram.tables()[0].rows[0];
        assert_eq!(row.status, ChangeStatus::Unchanged);
        assert_eq!(row.old_value(1), Some(&CellValue::Integer(1)));
    }

    #[test]
    fn test_shape_mismatch_on_columns() {
        let other = build_snapshot(
            vec![TableBuilder::new("settings")
                .column(Column::text("Name"))
                .column(Column::text("Value"))
                .primary_key(["Name"])
                .build()
                .unwrap()],
            vec![],
        )
        .unwrap();
        let err = reconcile(&name_value(&[]), &other).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ShapeMismatch);
        assert_eq!(err.table(), Some("settings"));
        assert_eq!(err.op(), Some("reconcile"));
    }

    #[test]
    fn test_orphan_child_dropped() {
        let groups = TableBuilder::new("groups")
            .column(Column::text("Group"))
            .primary_key(["Group"])
            .row(vec!["X".into()])
            .build()
            .unwrap();
        let items = TableBuilder::new("items")
            .column(Column::text("Group"))
            .column(Column::integer("Item"))
            .primary_key(["Group", "Item"])
            .row(vec!["X".into(), 1i64.into()])
            .row(vec!["Z".into(), 2i64.into()])
            .build()
            .unwrap();
        let relation = Relation::new("g_i", "groups", ["Group"], "items", ["Group"]);
        let snapshot = build_snapshot(vec![groups, items], vec![relation]).unwrap();

        let diffgram = reconcile(&snapshot, &snapshot).unwrap();
        let items = diffgram.table("items").unwrap();
        assert_eq!(items.rows.len(), 1);
        assert_eq!(items.rows[0].key[1], CellValue::Integer(1));
    }
}
