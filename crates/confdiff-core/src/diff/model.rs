//! Diffgram types.
//!
//! A [`Diffgram`] has the same shape as the snapshots it was built from, but
//! each row carries a [`ChangeStatus`] and both value sets.

use crate::diff::engine::ReconcileOptions;
use crate::model::{CellValue, Column, KeyTuple, Relation, ResolvedRelation};
use serde::{Deserialize, Serialize};

/// Per-row reconciliation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Unchanged,
    Added,
    Deleted,
    Modified,
}

impl ChangeStatus {
    /// Stable lower-case token used in CSS classes and anchor ids
    pub fn token(&self) -> &'static str {
        match self {
            ChangeStatus::Unchanged => "unchanged",
            ChangeStatus::Added => "added",
            ChangeStatus::Deleted => "deleted",
            ChangeStatus::Modified => "modified",
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, ChangeStatus::Unchanged)
    }
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// One reconciled row
///
/// `new_values` always holds a full row: for `Deleted` it mirrors
/// `old_values`. `old_values` is `None` only for `Added`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRow {
    pub key: Vec<CellValue>,
    pub new_values: Vec<CellValue>,
    pub old_values: Option<Vec<CellValue>>,
    pub status: ChangeStatus,
}

impl DiffRow {
    pub fn value(&self, column: usize) -> Option<&CellValue> {
        self.new_values.get(column)
    }

    pub fn old_value(&self, column: usize) -> Option<&CellValue> {
        self.old_values.as_ref().and_then(|v| v.get(column))
    }

    /// Whether the old and new cells of `column` differ
    ///
    /// Always false for rows without old values.
    pub fn column_changed(&self, column: usize) -> bool {
        match (self.value(column), self.old_value(column)) {
            (Some(new), Some(old)) => !new.same_as(old),
            _ => false,
        }
    }

    /// Normalized projection of the new values
    pub fn project(&self, columns: &[usize]) -> KeyTuple {
        KeyTuple::project(&self.new_values, columns)
    }
}

/// Reconciled rows of one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffTable {
    pub name: String,
    pub columns: Vec<Column>,
    pub primary_key: Vec<usize>,
    pub rows: Vec<DiffRow>,
}

impl DiffTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for row in &self.rows {
            summary.record(row.status);
        }
        summary
    }
}

/// The reconciled snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Diffgram {
    pub(crate) tables: Vec<DiffTable>,
    pub(crate) relations: Vec<Relation>,
    pub(crate) resolved: Vec<ResolvedRelation>,
    pub(crate) dependency_order: Vec<usize>,
    pub(crate) options: ReconcileOptions,
}

impl Diffgram {
    pub fn tables(&self) -> &[DiffTable] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&DiffTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_index(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name == name)
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn resolved_relations(&self) -> &[ResolvedRelation] {
        &self.resolved
    }

    pub fn dependency_order(&self) -> &[usize] {
        &self.dependency_order
    }

    /// Whether `column` of `table` was left out of change detection
    pub fn is_change_ignored(&self, table: usize, column: usize) -> bool {
        self.options.is_ignored(table, column)
    }

    /// Status counts across every table
    pub fn summary(&self) -> DiffSummary {
        self.tables
            .iter()
            .fold(DiffSummary::default(), |acc, t| acc.merge(t.summary()))
    }
}

/// Row counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn record(&mut self, status: ChangeStatus) {
        match status {
            ChangeStatus::Added => self.added += 1,
            ChangeStatus::Deleted => self.deleted += 1,
            ChangeStatus::Modified => self.modified += 1,
            ChangeStatus::Unchanged => self.unchanged += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.added + self.deleted + self.modified + self.unchanged
    }

    pub fn has_changes(&self) -> bool {
        self.added + self.deleted + self.modified > 0
    }

    pub fn merge(self, other: DiffSummary) -> DiffSummary {
        DiffSummary {
            added: self.added + other.added,
            deleted: self.deleted + other.deleted,
            modified: self.modified + other.modified,
            unchanged: self.unchanged + other.unchanged,
        }
    }
}
